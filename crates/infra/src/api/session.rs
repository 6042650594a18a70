//! Session facade
//!
//! One [`AuthSessionClient`] per signed-in app instance. Everything it hands
//! out shares the same [`ApiClient`] and therefore the same token store and
//! refresh guard.

use std::sync::Arc;

use teamkit_common::{KeychainTrait, TokenStore};
use teamkit_domain::StackConfig;
use tracing::debug;

use super::auth::AuthService;
use super::client::ApiClient;
use super::errors::ApiError;
use super::invitations::InvitationCommands;
use super::oauth::OAuthFlow;
use super::teams::TeamCommands;
use super::users::UserCommands;

#[derive(Debug, Clone)]
pub struct AuthSessionClient {
    api: Arc<ApiClient>,
    auth: AuthService,
    oauth: OAuthFlow,
    users: UserCommands,
    teams: TeamCommands,
    invitations: InvitationCommands,
}

impl AuthSessionClient {
    /// Build a session over `keychain`
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Config` if `config` fails validation.
    pub fn new(config: StackConfig, keychain: Arc<dyn KeychainTrait>) -> Result<Self, ApiError> {
        let api = Arc::new(ApiClient::new(config, TokenStore::new(keychain))?);
        debug!(project_id = %api.config().project_id, "Session client created");

        Ok(Self {
            auth: AuthService::new(Arc::clone(&api)),
            oauth: OAuthFlow::new(Arc::clone(&api)),
            users: UserCommands::new(Arc::clone(&api)),
            teams: TeamCommands::new(Arc::clone(&api)),
            invitations: InvitationCommands::new(Arc::clone(&api)),
            api,
        })
    }

    /// Session backed by the platform keychain under `service_name`
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Config` if `config` fails validation.
    pub fn with_platform_keychain(
        config: StackConfig,
        service_name: &str,
    ) -> Result<Self, ApiError> {
        let keychain = teamkit_common::KeychainProvider::new(service_name);
        Self::new(config, Arc::new(keychain))
    }

    pub const fn auth(&self) -> &AuthService {
        &self.auth
    }

    pub const fn oauth(&self) -> &OAuthFlow {
        &self.oauth
    }

    pub const fn users(&self) -> &UserCommands {
        &self.users
    }

    pub const fn teams(&self) -> &TeamCommands {
        &self.teams
    }

    pub const fn invitations(&self) -> &InvitationCommands {
        &self.invitations
    }

    /// Raw pipeline access for endpoints without a wrapper
    pub fn api(&self) -> &ApiClient {
        &self.api
    }
}
