//! Traits for secure storage
//!
//! Abstracts the platform-provided secure string store so the session client
//! can be tested with in-memory implementations and embedded on platforms
//! that bring their own store.

use async_trait::async_trait;

use crate::security::KeychainError;

/// Trait for keychain operations
///
/// Scoped key-value store of UTF-8 strings. Implementations are expected to
/// keep values encrypted at rest; this crate never does so itself.
#[async_trait]
pub trait KeychainTrait: Send + Sync {
    /// Store a secret, replacing any existing value
    ///
    /// # Errors
    /// Returns error if storage fails
    async fn set_secret(&self, key: &str, value: &str) -> Result<(), KeychainError>;

    /// Retrieve a secret
    ///
    /// # Errors
    /// Returns `KeychainError::NotFound` if the key is absent, or another
    /// variant if the store cannot be read
    async fn get_secret(&self, key: &str) -> Result<String, KeychainError>;

    /// Delete a secret. Deleting an absent key succeeds.
    ///
    /// # Errors
    /// Returns error if deletion fails
    async fn delete_secret(&self, key: &str) -> Result<(), KeychainError>;
}
