//! Domain types and models
//!
//! Projections of the identity service's records. Wire shapes (`*Record`)
//! mirror the JSON the service returns; the plain types are what callers
//! render.

pub mod project;
pub mod team;
pub mod user;

use serde::{Deserialize, Serialize};

pub use project::Project;
pub use team::{
    SendTeamInvitation, Team, TeamCreate, TeamInvitation, TeamMemberProfile, TeamPermission,
    TeamUpdate,
};
pub use user::{User, UserRecord, UserUpdate};

/// Envelope the service wraps around every list response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_paginated: Option<bool>,
}

impl<T> ListResponse<T> {
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}
