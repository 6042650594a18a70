//! Team, membership, permission and invitation types
//!
//! Remote entities only; nothing here is cached beyond the caller's
//! in-memory state.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::user::UserRecord;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub profile_image_url: Option<String>,
    #[serde(default)]
    pub created_at_millis: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_metadata: Option<Value>,
}

/// Body for `POST teams`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamCreate {
    pub display_name: String,
    /// `"me"` adds the signed-in user as the first member
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator_user_id: Option<String>,
}

/// Body for `PATCH teams/{id}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,
}

/// Entry of `team-member-profiles`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMemberProfile {
    pub team_id: String,
    pub user_id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub profile_image_url: Option<String>,
    /// Populated on the privileged listing only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserRecord>,
}

/// Entry of `team-permissions`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamPermission {
    /// Permission identifier, e.g. `$update_team` or `team_admin`
    pub id: String,
    #[serde(default)]
    pub team_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamInvitation {
    pub id: String,
    pub team_id: String,
    #[serde(default)]
    pub recipient_email: Option<String>,
    #[serde(default)]
    pub expires_at_millis: Option<i64>,
}

/// Body for `POST team-invitations/send-code`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendTeamInvitation {
    pub email: String,
    pub team_id: String,
    pub callback_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ListResponse;

    #[test]
    fn member_profiles_decode_from_list_envelope() {
        let json = serde_json::json!({
            "items": [
                { "team_id": "t1", "user_id": "u1", "display_name": "Grace" },
                { "team_id": "t1", "user_id": "u2" }
            ],
            "is_paginated": false
        });

        let list: ListResponse<TeamMemberProfile> = serde_json::from_value(json).unwrap();
        assert_eq!(list.items.len(), 2);
        assert_eq!(list.items[0].display_name.as_deref(), Some("Grace"));
        assert!(list.items[1].user.is_none());
    }

    #[test]
    fn team_create_omits_missing_creator() {
        let body = TeamCreate { display_name: "Ops".into(), creator_user_id: None };
        assert_eq!(serde_json::to_value(body).unwrap(), serde_json::json!({ "display_name": "Ops" }));
    }
}
