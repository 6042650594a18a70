//! Secure credential storage
//!
//! Generic secret storage lives here; session-specific helpers are built on
//! top in [`crate::auth::token_store`].

mod error;
#[cfg(feature = "platform")]
pub mod keychain;

pub use error::KeychainError;
#[cfg(feature = "platform")]
pub use keychain::KeychainProvider;
