//! User types
//!
//! Read-mostly projection of the identity provider's user record. Lives in
//! memory only for the duration of a session.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// User record as returned by `users/me` and `users/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    #[serde(default)]
    pub primary_email: Option<String>,
    #[serde(default)]
    pub primary_email_verified: bool,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub profile_image_url: Option<String>,
    #[serde(default)]
    pub signed_up_at_millis: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_metadata: Option<Value>,
}

/// User as shown by the profile screens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
    pub profile_image_url: Option<String>,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            email: record.primary_email.unwrap_or_default(),
            display_name: record.display_name.unwrap_or_default(),
            profile_image_url: record.profile_image_url,
        }
    }
}

/// Partial update for the current user (`PATCH users/me`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_metadata: Option<Value>,
}

impl UserUpdate {
    #[must_use]
    pub fn display_name(name: impl Into<String>) -> Self {
        Self { display_name: Some(name.into()), ..Self::default() }
    }

    #[must_use]
    pub fn profile_image_url(url: impl Into<String>) -> Self {
        Self { profile_image_url: Some(url.into()), ..Self::default() }
    }
}
