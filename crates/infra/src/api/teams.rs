//! Team, membership and permission commands
//!
//! Permission data is relayed as-is; deciding what a permission allows is
//! left to the caller.

use std::sync::Arc;

use teamkit_domain::constants::{endpoints, CURRENT_USER_ID};
use teamkit_domain::{
    ListResponse, Team, TeamCreate, TeamMemberProfile, TeamPermission, TeamUpdate,
};
use tracing::{debug, instrument};

use super::client::{segment, with_query, ApiClient};
use super::errors::ApiError;

#[derive(Debug, Clone)]
pub struct TeamCommands {
    client: Arc<ApiClient>,
}

impl TeamCommands {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Teams the signed-in user belongs to
    #[instrument(skip(self))]
    pub async fn list_teams(&self) -> Result<Vec<Team>, ApiError> {
        let path = with_query(endpoints::TEAMS, &[("user_id", CURRENT_USER_ID)]);
        let teams: ListResponse<Team> = self.client.get(&path).await?;
        debug!(count = teams.items.len(), "Fetched teams");
        Ok(teams.into_items())
    }

    /// Create a team with the signed-in user as creator
    #[instrument(skip(self))]
    pub async fn create_team(&self, display_name: &str) -> Result<Team, ApiError> {
        let body = TeamCreate {
            display_name: display_name.to_string(),
            creator_user_id: Some(CURRENT_USER_ID.to_string()),
        };
        self.client.post(endpoints::TEAMS, &body).await
    }

    #[instrument(skip(self), fields(team_id = %team_id))]
    pub async fn get_team(&self, team_id: &str) -> Result<Team, ApiError> {
        self.client.get(&team_path(team_id)).await
    }

    #[instrument(skip(self, update), fields(team_id = %team_id))]
    pub async fn update_team(&self, team_id: &str, update: &TeamUpdate) -> Result<Team, ApiError> {
        self.client.patch(&team_path(team_id), update).await
    }

    #[instrument(skip(self), fields(team_id = %team_id))]
    pub async fn delete_team(&self, team_id: &str) -> Result<(), ApiError> {
        self.client.delete(&team_path(team_id)).await
    }

    /// The signed-in user's permissions in `team_id`
    #[instrument(skip(self), fields(team_id = %team_id))]
    pub async fn list_permissions(&self, team_id: &str) -> Result<Vec<TeamPermission>, ApiError> {
        let path = with_query(
            endpoints::TEAM_PERMISSIONS,
            &[("team_id", team_id), ("user_id", CURRENT_USER_ID)],
        );
        let permissions: ListResponse<TeamPermission> = self.client.get(&path).await?;
        Ok(permissions.into_items())
    }

    /// Whether the service lists `permission_id` for the signed-in user
    pub async fn has_permission(
        &self,
        team_id: &str,
        permission_id: &str,
    ) -> Result<bool, ApiError> {
        let permissions = self.list_permissions(team_id).await?;
        Ok(permissions.iter().any(|p| p.id == permission_id))
    }

    /// Member profiles visible to the signed-in user
    #[instrument(skip(self), fields(team_id = %team_id))]
    pub async fn list_members(&self, team_id: &str) -> Result<Vec<TeamMemberProfile>, ApiError> {
        let members: ListResponse<TeamMemberProfile> =
            self.client.get(&members_path(team_id)).await?;
        Ok(members.into_items())
    }

    /// Member profiles with server visibility (includes the full user record)
    ///
    /// Callers are expected to have checked the user's admin permission
    /// first.
    #[instrument(skip(self), fields(team_id = %team_id))]
    pub async fn list_members_privileged(
        &self,
        team_id: &str,
    ) -> Result<Vec<TeamMemberProfile>, ApiError> {
        let members: ListResponse<TeamMemberProfile> =
            self.client.server_get(&members_path(team_id)).await?;
        Ok(members.into_items())
    }

    #[instrument(skip(self), fields(team_id = %team_id, user_id = %user_id))]
    pub async fn remove_member(&self, team_id: &str, user_id: &str) -> Result<(), ApiError> {
        self.client.delete(&membership_path(team_id, user_id)).await
    }

    /// Remove the signed-in user from `team_id`
    #[instrument(skip(self), fields(team_id = %team_id))]
    pub async fn leave_team(&self, team_id: &str) -> Result<(), ApiError> {
        self.client.delete(&membership_path(team_id, CURRENT_USER_ID)).await
    }
}

fn team_path(team_id: &str) -> String {
    format!("{}/{}", endpoints::TEAMS, segment(team_id))
}

fn members_path(team_id: &str) -> String {
    with_query(endpoints::TEAM_MEMBER_PROFILES, &[("team_id", team_id)])
}

fn membership_path(team_id: &str, user_id: &str) -> String {
    format!("{}/{}/{}", endpoints::TEAM_MEMBERSHIPS, segment(team_id), segment(user_id))
}
