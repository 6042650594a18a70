//! Session token storage layered on top of [`KeychainTrait`].
//!
//! Storage failures never reach callers: they are logged and degrade to "no
//! token". A broken store is therefore indistinguishable from a signed-out
//! session, and callers must tolerate that.

use std::sync::Arc;

use teamkit_domain::constants::{PKCE_STATE_KEY, PKCE_VERIFIER_KEY};
use tracing::{debug, warn};

use super::pkce::PkceTransaction;
use super::traits::KeychainTrait;
use super::types::{SessionTokens, TokenKind};
use crate::security::KeychainError;

/// Injected session context holding the secure store
///
/// Cheap to clone; clones share the same underlying store. There is no
/// locking here: concurrent writers to the same key race and the last
/// write wins.
#[derive(Clone)]
pub struct TokenStore {
    keychain: Arc<dyn KeychainTrait>,
}

impl TokenStore {
    #[must_use]
    pub fn new(keychain: Arc<dyn KeychainTrait>) -> Self {
        Self { keychain }
    }

    /// Stored token of the given kind, or `None` if absent, empty or
    /// unreadable
    pub async fn get(&self, kind: TokenKind) -> Option<String> {
        self.read(kind.storage_key()).await
    }

    pub async fn set(&self, kind: TokenKind, value: &str) {
        self.write(kind.storage_key(), value).await;
    }

    pub async fn remove(&self, kind: TokenKind) {
        self.delete(kind.storage_key()).await;
    }

    /// Clear both session tokens
    pub async fn clear(&self) {
        self.remove(TokenKind::Access).await;
        self.remove(TokenKind::Refresh).await;
        debug!("Session tokens cleared");
    }

    /// Persist tokens from a successful sign-in or code exchange
    pub async fn store_session(&self, tokens: &SessionTokens) {
        self.set(TokenKind::Access, &tokens.access_token).await;
        if let Some(refresh) = &tokens.refresh_token {
            self.set(TokenKind::Refresh, refresh).await;
        }
    }

    pub async fn has_session(&self) -> bool {
        self.get(TokenKind::Access).await.is_some()
    }

    pub async fn store_pkce(&self, transaction: &PkceTransaction) {
        self.write(PKCE_VERIFIER_KEY, &transaction.code_verifier).await;
        self.write(PKCE_STATE_KEY, &transaction.state).await;
    }

    /// Persisted PKCE transaction; `None` unless both halves are present
    pub async fn load_pkce(&self) -> Option<PkceTransaction> {
        let code_verifier = self.read(PKCE_VERIFIER_KEY).await?;
        let state = self.read(PKCE_STATE_KEY).await?;
        Some(PkceTransaction::new(code_verifier, state))
    }

    pub async fn clear_pkce(&self) {
        self.delete(PKCE_VERIFIER_KEY).await;
        self.delete(PKCE_STATE_KEY).await;
    }

    async fn read(&self, key: &str) -> Option<String> {
        match self.keychain.get_secret(key).await {
            Ok(value) if value.is_empty() => None,
            Ok(value) => Some(value),
            Err(KeychainError::NotFound) => None,
            Err(err) => {
                warn!(key = %key, error = %err, "Secure store read failed; treating as absent");
                None
            }
        }
    }

    async fn write(&self, key: &str, value: &str) {
        if let Err(err) = self.keychain.set_secret(key, value).await {
            warn!(key = %key, error = %err, "Secure store write failed");
        }
    }

    async fn delete(&self, key: &str) {
        if let Err(err) = self.keychain.delete_secret(key).await {
            warn!(key = %key, error = %err, "Secure store delete failed");
        }
    }
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore").field("keychain", &"dyn KeychainTrait").finish()
    }
}
