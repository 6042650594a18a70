//! Email/password authentication and sign-out

use std::sync::Arc;

use reqwest::Method;
use serde::Serialize;
use teamkit_common::auth::{TokenKind, TokenResponse};
use teamkit_domain::constants::endpoints;
use tracing::{info, instrument, warn};

use super::client::ApiClient;
use super::errors::ApiError;

/// Result of a successful sign-in, sign-up or OAuth exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthOutcome {
    /// Identity-service user id, when the response carried one
    pub user_id: Option<String>,
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    verification_callback_url: Option<&'a str>,
}

/// Password sign-in, sign-up and sign-out
#[derive(Debug, Clone)]
pub struct AuthService {
    client: Arc<ApiClient>,
}

impl AuthService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Sign in with email and password and persist the session
    ///
    /// # Errors
    ///
    /// Returns the service's error (e.g. wrong password) verbatim; nothing is
    /// stored on failure.
    #[instrument(skip_all)]
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthOutcome, ApiError> {
        let body = Credentials { email, password, verification_callback_url: None };
        let outcome = self.authenticate(endpoints::PASSWORD_SIGN_IN, &body).await?;
        info!(user_id = ?outcome.user_id, "Signed in with password");
        Ok(outcome)
    }

    /// Create an account and persist its session
    ///
    /// Sends the configured invitation callback URL as the email
    /// verification target when one is set.
    #[instrument(skip_all)]
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<AuthOutcome, ApiError> {
        let body = Credentials {
            email,
            password,
            verification_callback_url: self.client.config().invitation_callback_url.as_deref(),
        };
        let outcome = self.authenticate(endpoints::PASSWORD_SIGN_UP, &body).await?;
        info!(user_id = ?outcome.user_id, "Signed up with password");
        Ok(outcome)
    }

    /// Revoke the current session and clear local credentials
    ///
    /// Local state is cleared even if the service call fails, so this never
    /// reports an error.
    #[instrument(skip_all)]
    pub async fn sign_out(&self) {
        match self.client.request(endpoints::SESSION_CURRENT, Method::DELETE, None).await {
            Ok(response) if !response.is_success() => {
                warn!(status = %response.status(), "Session revocation rejected");
            }
            Ok(_) => {}
            Err(err) => warn!(error = ?err, "Session revocation failed"),
        }

        let tokens = self.client.tokens();
        tokens.clear().await;
        tokens.clear_pkce().await;
        info!("Signed out");
    }

    /// Whether an access token is stored; it may still be expired
    pub async fn is_signed_in(&self) -> bool {
        self.client.tokens().has_session().await
    }

    /// Currently stored access token
    pub async fn access_token(&self) -> Option<String> {
        self.client.tokens().get(TokenKind::Access).await
    }

    async fn authenticate(
        &self,
        path: &str,
        body: &Credentials<'_>,
    ) -> Result<AuthOutcome, ApiError> {
        let tokens: TokenResponse = self.client.post(path, body).await?;
        if tokens.access_token.is_empty() {
            return Err(ApiError::Parse("response carried an empty access token".into()));
        }

        self.client.tokens().store_session(&tokens.session_tokens()).await;
        Ok(AuthOutcome { user_id: tokens.user_id })
    }
}
