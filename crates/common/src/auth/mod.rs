//! Session credentials and OAuth 2.0 + PKCE primitives
//!
//! Everything here is transport-free: the HTTP side of sign-in, refresh and
//! code exchange lives in `teamkit-infra`.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   TokenStore    │  Error-swallowing session context
//! └────────┬────────┘
//!          │
//!          └──► KeychainTrait   (Platform secure store, or in-memory mock)
//!
//! PKCE utilities      (verifier, challenge, state)
//! ```
//!
//! # Module Organization
//!
//! - **[`types`]**: Token kinds, session tokens, provider payloads
//! - **[`pkce`]**: PKCE challenge generation and state validation
//! - **[`traits`]**: Secure-store abstraction
//! - **[`token_store`]**: Session token and PKCE persistence
//!
//! # Security Features
//!
//! - **PKCE**: Prevents authorization code interception
//! - **State Validation**: CSRF protection with constant-time comparison
//! - **Redaction**: `Debug` output never includes token or verifier values

pub mod pkce;
pub mod token_store;
pub mod traits;
pub mod types;

// Re-export commonly used types and functions
pub use pkce::{
    generate_code_challenge, generate_code_verifier, generate_state, validate_state,
    PKCEChallenge, PkceTransaction,
};
pub use token_store::TokenStore;
pub use traits::KeychainTrait;
pub use types::{ProviderErrorBody, RefreshResponse, SessionTokens, TokenKind, TokenResponse};
