//! Team invitation commands

use std::sync::Arc;

use serde_json::Value;
use teamkit_domain::constants::endpoints;
use teamkit_domain::{ListResponse, SendTeamInvitation, TeamInvitation};
use tracing::{info, instrument};

use super::client::{segment, with_query, ApiClient};
use super::errors::ApiError;

#[derive(Debug, Clone)]
pub struct InvitationCommands {
    client: Arc<ApiClient>,
}

impl InvitationCommands {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    #[instrument(skip(self), fields(team_id = %team_id))]
    pub async fn list_invitations(&self, team_id: &str) -> Result<Vec<TeamInvitation>, ApiError> {
        let path = with_query(endpoints::TEAM_INVITATIONS, &[("team_id", team_id)]);
        let invitations: ListResponse<TeamInvitation> = self.client.get(&path).await?;
        Ok(invitations.into_items())
    }

    /// Email an invitation code for `team_id` to `email`
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Config` without a network call if no invitation
    /// callback URL is configured.
    #[instrument(skip(self, email), fields(team_id = %team_id))]
    pub async fn send_invitation(&self, team_id: &str, email: &str) -> Result<(), ApiError> {
        let callback_url = self
            .client
            .config()
            .invitation_callback_url
            .clone()
            .ok_or_else(|| ApiError::Config("invitation_callback_url is not configured".into()))?;

        let body = SendTeamInvitation {
            email: email.to_string(),
            team_id: team_id.to_string(),
            callback_url,
        };
        let _: Value = self.client.post(endpoints::TEAM_INVITATIONS_SEND_CODE, &body).await?;

        info!("Team invitation sent");
        Ok(())
    }

    #[instrument(skip(self), fields(team_id = %team_id, invitation_id = %invitation_id))]
    pub async fn revoke_invitation(
        &self,
        team_id: &str,
        invitation_id: &str,
    ) -> Result<(), ApiError> {
        let path = with_query(
            &format!("{}/{}", endpoints::TEAM_INVITATIONS, segment(invitation_id)),
            &[("team_id", team_id)],
        );
        self.client.delete(&path).await
    }
}
