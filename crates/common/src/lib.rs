//! Session primitives shared across Teamkit crates.
//!
//! # Safety and Quality
//!
//! This crate enforces strict safety and quality standards to ensure
//! reliability across all Teamkit components.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - default: PKCE, token types, the secure-store trait and `TokenStore`
//! - `platform`: platform keychain integration via `keyring`
//! - `test-utils`: in-memory mocks for the secure store

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod auth;
pub mod security;

// Testing utilities
// ---------------------------------------------------------------
#[cfg(any(feature = "test-utils", test))]
pub mod testing;

// Re-export commonly used types and traits for convenience
// ------------------------
pub use auth::{KeychainTrait, SessionTokens, TokenKind, TokenStore};
#[cfg(feature = "platform")]
pub use security::KeychainProvider;
pub use security::KeychainError;
