use thiserror::Error;

/// Keychain error types
#[derive(Debug, Error)]
pub enum KeychainError {
    /// Keychain access failed (permission denied, not available, etc.)
    #[error("Keychain access failed: {0}")]
    AccessFailed(String),

    /// Entry not found in keychain
    #[error("Entry not found")]
    NotFound,

    /// Underlying keyring library error
    #[cfg(feature = "platform")]
    #[error("Keyring error: {0}")]
    Keyring(#[from] keyring::Error),
}

