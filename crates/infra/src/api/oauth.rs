//! OAuth authorization-code flow with PKCE
//!
//! [`OAuthFlow::sign_in_with_oauth`] persists a fresh verifier/state pair and
//! returns the provider URL to open in a browser. The app's deep-link
//! handler later hands the redirect to [`OAuthFlow::complete_from_callback`]
//! (or [`OAuthFlow::handle_oauth_callback`] with the extracted values).
//!
//! ```text
//! Idle ──sign_in_with_oauth──► AwaitingCallback ──callback──► Exchanging
//!                                                               │
//!                                         Authenticated ◄───────┤
//!                                         Failed(reason) ◄──────┘
//! ```
//!
//! The persisted PKCE entries are deleted on every terminal outcome.

use std::sync::Arc;

use serde::Serialize;
use teamkit_common::auth::{validate_state, PKCEChallenge, TokenResponse};
use teamkit_domain::constants::{endpoints, GRANT_TYPE_AUTHORIZATION_CODE};
use tokio::sync::RwLock;
use tracing::{info, instrument, warn};
use url::Url;

use super::auth::AuthOutcome;
use super::client::{segment, ApiClient};
use super::errors::ApiError;

/// Observable progress of the current OAuth sign-in
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum OAuthFlowState {
    Idle,
    AwaitingCallback,
    Exchanging,
    Authenticated,
    Failed(String),
}

/// Query parameters of the provider's redirect back into the app
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OAuthCallback {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

impl OAuthCallback {
    /// Parse a redirect URL such as `teamkit://oauth-callback?code=..&state=..`
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidInput` if `url` is not an absolute URL.
    pub fn from_url(url: &str) -> Result<Self, ApiError> {
        let parsed = Url::parse(url)
            .map_err(|e| ApiError::InvalidInput(format!("invalid OAuth callback URL: {e}")))?;

        let mut callback = Self::default();
        for (key, value) in parsed.query_pairs() {
            let slot = match key.as_ref() {
                "code" => &mut callback.code,
                "state" => &mut callback.state,
                "error" => &mut callback.error,
                "error_description" => &mut callback.error_description,
                _ => continue,
            };
            if !value.is_empty() {
                *slot = Some(value.into_owned());
            }
        }
        Ok(callback)
    }
}

/// OAuth sign-in driver for one session
#[derive(Debug, Clone)]
pub struct OAuthFlow {
    client: Arc<ApiClient>,
    state: Arc<RwLock<OAuthFlowState>>,
}

impl OAuthFlow {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client, state: Arc::new(RwLock::new(OAuthFlowState::Idle)) }
    }

    pub async fn state(&self) -> OAuthFlowState {
        self.state.read().await.clone()
    }

    /// Start a sign-in with `provider` (e.g. `google`, `github`)
    ///
    /// Returns the authorization URL to open in an external browser. Any
    /// previously pending flow is replaced.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidInput` if the provider name is not a
    /// lowercase slug.
    #[instrument(skip(self))]
    pub async fn sign_in_with_oauth(&self, provider: &str) -> Result<String, ApiError> {
        validate_provider(provider)?;

        let challenge = PKCEChallenge::generate();
        let url = self.authorization_url(provider, &challenge)?;

        self.client.tokens().store_pkce(&challenge.transaction).await;
        self.set_state(OAuthFlowState::AwaitingCallback).await;

        info!(provider, "OAuth flow initiated");
        Ok(url.into())
    }

    /// Authorization URL for `provider` carrying `challenge`
    pub fn authorization_url(
        &self,
        provider: &str,
        challenge: &PKCEChallenge,
    ) -> Result<Url, ApiError> {
        let config = self.client.config();
        let mut url = self
            .client
            .endpoint(&format!("{}/{}", endpoints::OAUTH_AUTHORIZE, segment(provider)))?;

        url.query_pairs_mut()
            .append_pair("client_id", &config.project_id)
            .append_pair("client_secret", &config.publishable_client_key)
            .append_pair("redirect_uri", &config.oauth_redirect_uri)
            .append_pair("scope", &config.oauth_scope)
            .append_pair("state", challenge.state())
            .append_pair("grant_type", GRANT_TYPE_AUTHORIZATION_CODE)
            .append_pair("code_challenge", &challenge.code_challenge)
            .append_pair("code_challenge_method", challenge.challenge_method())
            .append_pair("response_type", "code")
            .append_pair("type", "authenticate")
            .append_pair("error_redirect_url", &config.oauth_redirect_uri);

        Ok(url)
    }

    /// Finish the flow from a parsed redirect
    ///
    /// A redirect carrying `error` abandons the flow without contacting the
    /// token endpoint.
    pub async fn complete_from_callback(
        &self,
        callback: &OAuthCallback,
    ) -> Result<AuthOutcome, ApiError> {
        if let Some(error) = &callback.error {
            let reason = callback.error_description.as_ref().unwrap_or(error).clone();
            warn!(error = %error, "OAuth provider returned an error");
            return self.abandon(ApiError::OAuthDenied(reason)).await;
        }

        let Some(code) = callback.code.as_deref() else {
            return self.abandon(ApiError::MissingCallbackParameter("code")).await;
        };
        let Some(state) = callback.state.as_deref() else {
            return self.abandon(ApiError::MissingCallbackParameter("state")).await;
        };

        self.handle_oauth_callback(code, state).await
    }

    /// Validate `state` and exchange `code` for a session
    ///
    /// # Errors
    ///
    /// - `StateMismatch` if `state` differs from the persisted value; the
    ///   token endpoint is not contacted
    /// - `NoPendingFlow` if no verifier/state is persisted
    /// - `Timeout` if the exchange exceeds the configured deadline
    /// - the service's error for a non-2xx exchange
    #[instrument(skip_all)]
    pub async fn handle_oauth_callback(
        &self,
        code: &str,
        state: &str,
    ) -> Result<AuthOutcome, ApiError> {
        self.set_state(OAuthFlowState::Exchanging).await;

        let result = self.exchange(code, state).await;
        self.client.tokens().clear_pkce().await;

        match &result {
            Ok(outcome) => {
                info!(user_id = ?outcome.user_id, "OAuth sign-in completed");
                self.set_state(OAuthFlowState::Authenticated).await;
            }
            Err(err) => {
                warn!(kind = err.category().as_str(), error = %err, "OAuth sign-in failed");
                self.set_state(OAuthFlowState::Failed(err.to_string())).await;
            }
        }
        result
    }

    /// Discard any pending flow
    pub async fn cancel(&self) {
        self.client.tokens().clear_pkce().await;
        self.set_state(OAuthFlowState::Idle).await;
    }

    async fn exchange(&self, code: &str, state: &str) -> Result<AuthOutcome, ApiError> {
        if code.is_empty() {
            return Err(ApiError::MissingCallbackParameter("code"));
        }
        if state.is_empty() {
            return Err(ApiError::MissingCallbackParameter("state"));
        }

        let pending = self.client.tokens().load_pkce().await.ok_or(ApiError::NoPendingFlow)?;
        if !validate_state(&pending.state, state) {
            return Err(ApiError::StateMismatch);
        }

        let config = self.client.config();
        let form = [
            ("grant_type", GRANT_TYPE_AUTHORIZATION_CODE),
            ("code", code),
            ("code_verifier", pending.code_verifier.as_str()),
            ("client_id", config.project_id.as_str()),
            ("client_secret", config.publishable_client_key.as_str()),
            ("redirect_uri", config.oauth_redirect_uri.as_str()),
        ];

        let response = self
            .client
            .post_form(endpoints::OAUTH_TOKEN, &form, config.token_exchange_timeout())
            .await?
            .into_result()?;

        let tokens: TokenResponse = response.json()?;
        if tokens.access_token.is_empty() {
            return Err(ApiError::Parse("token response carried an empty access token".into()));
        }

        self.client.tokens().store_session(&tokens.session_tokens()).await;
        Ok(AuthOutcome { user_id: tokens.user_id })
    }

    async fn abandon(&self, err: ApiError) -> Result<AuthOutcome, ApiError> {
        self.client.tokens().clear_pkce().await;
        self.set_state(OAuthFlowState::Failed(err.to_string())).await;
        Err(err)
    }

    async fn set_state(&self, next: OAuthFlowState) {
        *self.state.write().await = next;
    }
}

fn validate_provider(provider: &str) -> Result<(), ApiError> {
    let valid = !provider.is_empty()
        && provider
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'_');
    if valid {
        Ok(())
    } else {
        Err(ApiError::InvalidInput(format!("invalid OAuth provider name: {provider:?}")))
    }
}
