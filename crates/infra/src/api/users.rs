//! Current user, user lookup and project commands

use std::sync::Arc;

use teamkit_domain::constants::endpoints;
use teamkit_domain::{Project, User, UserRecord, UserUpdate};
use tracing::{debug, instrument};

use super::client::{segment, ApiClient};
use super::errors::ApiError;

/// User-facing commands
#[derive(Debug, Clone)]
pub struct UserCommands {
    client: Arc<ApiClient>,
}

impl UserCommands {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Signed-in user, mapped to [`User`]
    #[instrument(skip(self))]
    pub async fn current_user(&self) -> Result<User, ApiError> {
        let record = self.current_user_record().await?;
        debug!(user_id = %record.id, "Fetched current user");
        Ok(record.into())
    }

    /// Signed-in user exactly as the service returns it
    pub async fn current_user_record(&self) -> Result<UserRecord, ApiError> {
        self.client.get(endpoints::USERS_ME).await
    }

    #[instrument(skip(self, update))]
    pub async fn update_current_user(&self, update: &UserUpdate) -> Result<User, ApiError> {
        let record: UserRecord = self.client.patch(endpoints::USERS_ME, update).await?;
        Ok(record.into())
    }

    /// Any user by id (privileged)
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn get_user(&self, user_id: &str) -> Result<User, ApiError> {
        let path = format!("{}/{}", endpoints::USERS, segment(user_id));
        let record: UserRecord = self.client.server_get(&path).await?;
        Ok(record.into())
    }

    #[instrument(skip(self))]
    pub async fn current_project(&self) -> Result<Project, ApiError> {
        self.client.get(endpoints::PROJECT_CURRENT).await
    }
}
