//! Identity service client
//!
//! [`ApiClient`] owns the request pipeline; the service structs wrap it per
//! area. [`AuthSessionClient`] wires them together for one session.

pub mod auth;
pub mod client;
pub mod errors;
pub mod invitations;
pub mod oauth;
pub mod session;
pub mod teams;
pub mod users;

pub use auth::{AuthOutcome, AuthService};
pub use client::{ApiClient, RawResponse};
pub use errors::{ApiError, ApiErrorCategory, OperationError, OperationResult};
pub use invitations::InvitationCommands;
pub use oauth::{OAuthCallback, OAuthFlow, OAuthFlowState};
pub use session::AuthSessionClient;
pub use teams::TeamCommands;
pub use users::UserCommands;
