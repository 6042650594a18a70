//! # Teamkit Infrastructure
//!
//! HTTP side of the Teamkit session client.
//!
//! This crate contains:
//! - The authenticated request pipeline with one-shot token refresh
//! - Password and OAuth (PKCE) sign-in
//! - User, team, membership and invitation commands
//! - Configuration loading and logging setup
//!
//! ## Architecture
//! - Session state lives in `teamkit-common`'s `TokenStore`
//! - Data types and constants come from `teamkit-domain`
//! - All network I/O is here

pub mod api;
pub mod config;
pub mod errors;
pub mod http;
pub mod observability;

// Re-export commonly used items
pub use api::{
    ApiClient, ApiError, ApiErrorCategory, AuthOutcome, AuthSessionClient, OAuthCallback,
    OAuthFlowState, OperationResult,
};
pub use errors::InfraError;
pub use http::HttpClient;
pub use observability::{init_tracing, LogFormat};
