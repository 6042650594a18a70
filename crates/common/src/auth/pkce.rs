//! PKCE (Proof Key for Code Exchange) implementation for OAuth 2.0
//!
//! Implements the S256 method of RFC 7636. The verifier and state are kept
//! in the secure store between initiating the flow and handling the
//! redirect; the challenge is only ever sent to the provider.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngCore;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use teamkit_domain::constants::PKCE_CHALLENGE_METHOD;

/// Random bytes behind a code verifier (43 characters once encoded)
pub const CODE_VERIFIER_BYTES: usize = 32;

/// Random bytes behind a state token (22 characters once encoded)
pub const STATE_BYTES: usize = 16;

fn random_urlsafe(len: usize) -> String {
    let mut bytes = vec![0u8; len];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Generate a cryptographically secure code verifier
///
/// Returns 32 random bytes as unpadded URL-safe base64 (43 characters),
/// inside the 43-128 character range RFC 7636 requires.
#[must_use]
pub fn generate_code_verifier() -> String {
    random_urlsafe(CODE_VERIFIER_BYTES)
}

/// Generate code challenge from verifier using SHA256
///
/// Per RFC 7636, the challenge is BASE64URL(SHA256(ASCII(code_verifier)))
/// with padding stripped.
#[must_use]
pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Generate a random state token for CSRF protection
#[must_use]
pub fn generate_state() -> String {
    random_urlsafe(STATE_BYTES)
}

/// Validate that the state token matches
///
/// Exact, constant-time comparison. Strings of different length never match.
#[must_use]
pub fn validate_state(expected: &str, actual: &str) -> bool {
    expected.as_bytes().ct_eq(actual.as_bytes()).into()
}

/// Secrets persisted for the duration of one authorization flow
#[derive(Clone, PartialEq, Eq)]
pub struct PkceTransaction {
    /// Sent only during token exchange
    pub code_verifier: String,

    /// Must come back unchanged on the redirect
    pub state: String,
}

impl PkceTransaction {
    #[must_use]
    pub fn new(code_verifier: String, state: String) -> Self {
        Self { code_verifier, state }
    }
}

impl std::fmt::Debug for PkceTransaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PkceTransaction")
            .field("code_verifier", &"[redacted]")
            .field("state", &self.state)
            .finish()
    }
}

/// PKCE challenge pair for OAuth 2.0 authorization
///
/// Contains the code verifier (sent during token exchange), the code
/// challenge (sent during authorization request) and the CSRF state.
#[derive(Debug, Clone)]
pub struct PKCEChallenge {
    pub transaction: PkceTransaction,

    /// SHA256 hash of code_verifier (base64url encoded)
    pub code_challenge: String,
}

impl PKCEChallenge {
    /// Generate a new PKCE challenge with cryptographically secure random
    /// values
    ///
    /// # Examples
    /// ```
    /// use teamkit_common::auth::pkce::PKCEChallenge;
    ///
    /// let challenge = PKCEChallenge::generate();
    /// assert_eq!(challenge.transaction.code_verifier.len(), 43);
    /// assert_eq!(challenge.challenge_method(), "S256");
    /// ```
    #[must_use]
    pub fn generate() -> Self {
        Self::from_transaction(PkceTransaction::new(generate_code_verifier(), generate_state()))
    }

    /// Derive the challenge for an existing verifier/state pair
    #[must_use]
    pub fn from_transaction(transaction: PkceTransaction) -> Self {
        let code_challenge = generate_code_challenge(&transaction.code_verifier);
        Self { transaction, code_challenge }
    }

    #[must_use]
    pub fn state(&self) -> &str {
        &self.transaction.state
    }

    /// Get the challenge method (always "S256" for SHA256)
    #[must_use]
    pub const fn challenge_method(&self) -> &'static str {
        PKCE_CHALLENGE_METHOD
    }
}
