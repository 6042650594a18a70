//! # Teamkit Domain
//!
//! Business domain types and models for Teamkit.
//!
//! This crate contains:
//! - Domain data types (User, Team, TeamMember, TeamInvitation, etc.)
//! - Domain error types and Result definitions
//! - Client configuration structure
//! - Endpoint paths, header names and storage keys
//!
//! ## Architecture
//! - No dependencies on other Teamkit crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
