//! Testing utilities and helpers
//!
//! - **[`mocks`]**: In-memory secure store with failure injection
//!
//! ## Usage
//!
//! ```rust
//! # #[cfg(feature = "test-utils")]
//! # {
//! use std::sync::Arc;
//!
//! use teamkit_common::testing::MockKeychainProvider;
//! use teamkit_common::TokenStore;
//!
//! let keychain = MockKeychainProvider::new();
//! let store = TokenStore::new(Arc::new(keychain.clone()));
//! # let _ = store;
//! # }
//! ```

pub mod mocks;

pub use mocks::MockKeychainProvider;
