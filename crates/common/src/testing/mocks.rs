//! Mock implementations of common traits
//!
//! Provides mock objects for testing purposes.

// Allow missing error/panic docs for test mocks - they are designed to be simple
// and errors are clearly indicated by their return types
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::auth::KeychainTrait;
use crate::security::KeychainError;

type StorageData = Arc<Mutex<HashMap<String, String>>>;

/// Mock keychain provider that stores credentials in memory.
///
/// This implementation avoids platform keychain prompts and persists data only
/// for the lifetime of the mock (and its clones, which share storage).
/// Reads and writes can be made to fail independently to exercise the
/// error-swallowing paths.
#[derive(Clone, Debug, Default)]
pub struct MockKeychainProvider {
    storage: StorageData,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
    writes: Arc<AtomicUsize>,
}

impl MockKeychainProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a value directly, bypassing failure injection
    pub fn insert(&self, key: &str, value: &str) {
        self.storage.lock().insert(key.to_string(), value.to_string());
    }

    /// Remove a value directly, bypassing failure injection
    pub fn remove(&self, key: &str) {
        self.storage.lock().remove(key);
    }

    #[must_use]
    pub fn value(&self, key: &str) -> Option<String> {
        self.storage.lock().get(key).cloned()
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.storage.lock().contains_key(key)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.storage.lock().is_empty()
    }

    /// Number of successful `set_secret` calls so far
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Make every `get_secret` fail with `AccessFailed`
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every `set_secret` and `delete_secret` fail with `AccessFailed`
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Clear all stored credentials.
    pub fn clear_all(&self) {
        self.storage.lock().clear();
    }
}

#[async_trait]
impl KeychainTrait for MockKeychainProvider {
    async fn set_secret(&self, key: &str, value: &str) -> Result<(), KeychainError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(KeychainError::AccessFailed(format!("mock write failure for {key}")));
        }
        self.insert(key, value);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn get_secret(&self, key: &str) -> Result<String, KeychainError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(KeychainError::AccessFailed(format!("mock read failure for {key}")));
        }
        self.value(key).ok_or(KeychainError::NotFound)
    }

    async fn delete_secret(&self, key: &str) -> Result<(), KeychainError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(KeychainError::AccessFailed(format!("mock delete failure for {key}")));
        }
        self.remove(key);
        Ok(())
    }
}
