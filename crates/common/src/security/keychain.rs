//! Platform keychain provider for secure credential storage
//!
//! Thin wrapper over the platform keychain for storing arbitrary secrets
//! across macOS/iOS (Keychain Services), Windows (Credential Manager), and
//! Linux (Secret Service API).
//!
//! ## Usage
//!
//! ```no_run
//! use teamkit_common::security::KeychainProvider;
//!
//! let keychain = KeychainProvider::new("Teamkit.session");
//! keychain.set_secret("stack_access_token", "token")?;
//! let secret = keychain.get_secret("stack_access_token")?;
//! assert_eq!(secret, "token");
//! # Ok::<(), teamkit_common::security::KeychainError>(())
//! ```

use async_trait::async_trait;
use keyring::Entry;
use tracing::debug;

use super::KeychainError;
use crate::auth::traits::KeychainTrait;

/// Keychain provider scoped to a single service name
///
/// Every key is stored as a separate keychain entry under `service_name`, so
/// two providers with different service names never see each other's data.
///
/// The inherent methods block on the platform keychain. The
/// [`KeychainTrait`] impl runs them on tokio's blocking pool.
#[derive(Debug, Clone)]
pub struct KeychainProvider {
    service_name: String,
}

impl KeychainProvider {
    /// Create a new keychain provider for a specific service
    ///
    /// # Examples
    /// ```
    /// use teamkit_common::security::KeychainProvider;
    ///
    /// let keychain = KeychainProvider::new("Teamkit.session");
    /// assert_eq!(keychain.service_name(), "Teamkit.session");
    /// ```
    pub fn new(service_name: impl Into<String>) -> Self {
        Self { service_name: service_name.into() }
    }

    #[must_use]
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Store a secret value in the platform keychain
    ///
    /// # Errors
    /// Returns `KeychainError::AccessFailed` if keychain access fails
    pub fn set_secret(&self, key: &str, value: &str) -> Result<(), KeychainError> {
        debug!(service = %self.service_name, key = %key, "Storing secret in keychain");

        let entry = self.create_entry(key)?;
        entry.set_password(value).map_err(|e| {
            KeychainError::AccessFailed(format!("Failed to store secret for {key}: {e}"))
        })
    }

    /// Retrieve a secret value from the platform keychain
    ///
    /// # Errors
    /// Returns `KeychainError::NotFound` if secret doesn't exist
    /// Returns `KeychainError::AccessFailed` if keychain access fails
    pub fn get_secret(&self, key: &str) -> Result<String, KeychainError> {
        debug!(service = %self.service_name, key = %key, "Retrieving secret from keychain");

        let entry = self.create_entry(key)?;
        entry.get_password().map_err(|e| {
            if matches!(e, keyring::Error::NoEntry) {
                KeychainError::NotFound
            } else {
                KeychainError::AccessFailed(format!("Failed to retrieve secret for {key}: {e}"))
            }
        })
    }

    /// Delete a secret from the platform keychain (idempotent)
    ///
    /// # Errors
    /// Returns `KeychainError::AccessFailed` if the entry exists but cannot be
    /// removed
    pub fn delete_secret(&self, key: &str) -> Result<(), KeychainError> {
        debug!(service = %self.service_name, key = %key, "Deleting secret from keychain");

        let entry = self.create_entry(key)?;
        match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(KeychainError::AccessFailed(format!(
                "Failed to delete secret for {key}: {e}"
            ))),
        }
    }

    fn create_entry(&self, account: &str) -> Result<Entry, KeychainError> {
        Entry::new(&self.service_name, account).map_err(|e| {
            KeychainError::AccessFailed(format!("Failed to create keychain entry: {e}"))
        })
    }
}

/// Run a keychain call on the blocking pool
async fn run_blocking<T, F>(op: F) -> Result<T, KeychainError>
where
    F: FnOnce() -> Result<T, KeychainError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(op)
        .await
        .map_err(|e| KeychainError::AccessFailed(format!("keychain task failed: {e}")))?
}

#[async_trait]
impl KeychainTrait for KeychainProvider {
    async fn set_secret(&self, key: &str, value: &str) -> Result<(), KeychainError> {
        let provider = self.clone();
        let (key, value) = (key.to_owned(), value.to_owned());
        run_blocking(move || Self::set_secret(&provider, &key, &value)).await
    }

    async fn get_secret(&self, key: &str) -> Result<String, KeychainError> {
        let provider = self.clone();
        let key = key.to_owned();
        run_blocking(move || Self::get_secret(&provider, &key)).await
    }

    async fn delete_secret(&self, key: &str) -> Result<(), KeychainError> {
        let provider = self.clone();
        let key = key.to_owned();
        run_blocking(move || Self::delete_secret(&provider, &key)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keychain_provider_keeps_service_name() {
        let keychain = KeychainProvider::new("test-service");
        assert_eq!(keychain.service_name(), "test-service");
    }

    #[tokio::test(flavor = "current_thread")]
    async fn blocking_calls_run_off_the_runtime_thread() {
        let runtime_thread = std::thread::current().id();
        let ran_on = run_blocking(|| Ok(std::thread::current().id())).await.unwrap();
        assert_ne!(ran_on, runtime_thread);
    }

    #[tokio::test]
    async fn blocking_call_errors_pass_through() {
        let result: Result<(), _> = run_blocking(|| Err(KeychainError::NotFound)).await;
        assert!(matches!(result, Err(KeychainError::NotFound)));
    }

    #[tokio::test]
    async fn panicking_blocking_call_maps_to_access_failure() {
        let result: Result<(), _> = run_blocking(|| panic!("keychain backend crashed")).await;
        assert!(matches!(result, Err(KeychainError::AccessFailed(msg)) if msg.contains("task failed")));
    }
}
