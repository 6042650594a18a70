//! Authenticated request pipeline for the identity service
//!
//! Every client-side call goes through [`ApiClient::request`]: identifying
//! headers are attached, the stored access token is sent, and a single `401`
//! triggers one refresh followed by one retry. Nothing else is retried.
//!
//! Privileged calls go through [`ApiClient::server_request`], which sends the
//! secret server key and never refreshes.

use std::borrow::Cow;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use teamkit_common::auth::{RefreshResponse, TokenKind, TokenStore};
use teamkit_domain::constants::{endpoints, headers};
use teamkit_domain::{StackConfig, TeamkitError};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::errors::ApiError;
use crate::errors::InfraError;
use crate::http::HttpClient;

const JSON: &str = "application/json";

/// Slack between a caller's deadline and the transport timeout placed
/// behind it, so the deadline fires first
const DEADLINE_SLACK: Duration = Duration::from_secs(1);

/// Which credential set a request is sent with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AccessType {
    Client,
    Server,
}

impl AccessType {
    const fn header_value(self) -> &'static str {
        match self {
            Self::Client => headers::ACCESS_TYPE_CLIENT,
            Self::Server => headers::ACCESS_TYPE_SERVER,
        }
    }
}

/// Fully buffered response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    status: StatusCode,
    body: String,
}

impl RawResponse {
    #[must_use]
    pub const fn new(status: StatusCode, body: String) -> Self {
        Self { status, body }
    }

    async fn read(response: Response) -> Result<Self, ApiError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| ApiError::from(TeamkitError::from(InfraError::from(err))))?;
        Ok(Self { status, body })
    }

    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Turn a non-2xx response into the matching [`ApiError`]
    pub fn into_result(self) -> Result<Self, ApiError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ApiError::from_response(self.status, &self.body))
        }
    }

    /// Deserialize the body; an empty body is read as JSON `null`
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        if self.body.trim().is_empty() {
            return Ok(serde_json::from_value(Value::Null)?);
        }
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// HTTP client bound to one identity-service project
pub struct ApiClient {
    http: HttpClient,
    config: StackConfig,
    base_url: Url,
    tokens: TokenStore,
    refresh_guard: Mutex<()>,
}

impl ApiClient {
    /// Create a client for `config`, storing session tokens in `tokens`
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Config` if the configuration is invalid or the
    /// HTTP client cannot be built.
    pub fn new(config: StackConfig, tokens: TokenStore) -> Result<Self, ApiError> {
        let config = config.validate()?;
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ApiError::Config(format!("invalid base_url {}: {e}", config.base_url)))?;

        let http = HttpClient::builder()
            .timeout(config.request_timeout())
            .user_agent(concat!("teamkit/", env!("CARGO_PKG_VERSION")))
            .default_headers(identity_headers(&config)?)
            .build()
            .map_err(|e| ApiError::Config(format!("Failed to build HttpClient: {e}")))?;

        Ok(Self { http, config, base_url, tokens, refresh_guard: Mutex::new(()) })
    }

    #[must_use]
    pub const fn config(&self) -> &StackConfig {
        &self.config
    }

    #[must_use]
    pub const fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// Absolute URL for a path relative to the base URL (query allowed)
    pub fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::InvalidInput(format!("invalid request path {path}: {e}")))
    }

    /// Send a client request with the stored session
    ///
    /// A `401` triggers at most one refresh and one retry. If no refresh is
    /// possible the original `401` response is returned as-is. Non-2xx
    /// responses are not errors at this level.
    #[instrument(skip_all, fields(%method, path = %path))]
    pub async fn request(
        &self,
        path: &str,
        method: Method,
        body: Option<&Value>,
    ) -> Result<RawResponse, ApiError> {
        let token = self.tokens.get(TokenKind::Access).await;
        let response =
            self.send_once(path, method.clone(), body, AccessType::Client, token.as_deref()).await?;

        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        debug!("Access token rejected");
        match self.refresh_after_rejection(token.as_deref()).await {
            Some(fresh) => {
                self.send_once(path, method, body, AccessType::Client, Some(&fresh)).await
            }
            None => Ok(response),
        }
    }

    /// Send a privileged request with the secret server key
    ///
    /// # Errors
    ///
    /// Returns `ApiError::MissingServerKey` without touching the network if
    /// no server key is configured.
    #[instrument(skip_all, fields(%method, path = %path))]
    pub async fn server_request(
        &self,
        path: &str,
        method: Method,
        body: Option<&Value>,
    ) -> Result<RawResponse, ApiError> {
        if self.config.secret_server_key.is_none() {
            return Err(ApiError::MissingServerKey);
        }
        self.send_once(path, method, body, AccessType::Server, None).await
    }

    /// POST a form-encoded body without session credentials
    ///
    /// The request and the body read must finish within `deadline`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Timeout(deadline)` when the deadline passes, even
    /// if the client-wide request timeout is shorter.
    pub async fn post_form(
        &self,
        path: &str,
        form: &[(&str, &str)],
        deadline: Duration,
    ) -> Result<RawResponse, ApiError> {
        let request = self
            .http
            .request(Method::POST, self.endpoint(path)?)
            .header(headers::ACCESS_TYPE, AccessType::Client.header_value())
            .timeout(deadline.saturating_add(DEADLINE_SLACK))
            .form(form);

        tokio::time::timeout(deadline, self.execute(request))
            .await
            .map_err(|_| ApiError::Timeout(deadline))?
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(path, Method::GET, None).await?.into_result()?.json()
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = to_body(body)?;
        self.request(path, Method::POST, Some(&body)).await?.into_result()?.json()
    }

    pub async fn patch<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = to_body(body)?;
        self.request(path, Method::PATCH, Some(&body)).await?.into_result()?.json()
    }

    /// DELETE; the response body is ignored
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.request(path, Method::DELETE, None).await?.into_result()?;
        Ok(())
    }

    pub async fn server_get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.server_request(path, Method::GET, None).await?.into_result()?.json()
    }

    /// Exchange the stored refresh token for a new access token
    ///
    /// On success the new access token is persisted. On failure nothing in
    /// the store changes.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotAuthenticated` if no refresh token is stored,
    /// otherwise the service's error for the refresh call.
    #[instrument(skip(self))]
    pub async fn refresh_access_token(&self) -> Result<String, ApiError> {
        let refresh_token =
            self.tokens.get(TokenKind::Refresh).await.ok_or(ApiError::NotAuthenticated)?;

        let request = self
            .http
            .request(Method::POST, self.endpoint(endpoints::SESSION_REFRESH)?)
            .header(headers::ACCESS_TYPE, AccessType::Client.header_value())
            .header(headers::REFRESH_TOKEN, refresh_token)
            .json(&serde_json::json!({}));

        let response = RawResponse::read(self.http.send(request).await?).await?.into_result()?;
        let refreshed: RefreshResponse = response.json()?;
        if refreshed.access_token.is_empty() {
            return Err(ApiError::Parse("refresh response carried an empty access token".into()));
        }

        self.tokens.set(TokenKind::Access, &refreshed.access_token).await;
        info!("Access token refreshed");
        Ok(refreshed.access_token)
    }

    async fn refresh_after_rejection(&self, rejected: Option<&str>) -> Option<String> {
        let _guard = self.refresh_guard.lock().await;

        // A concurrent request may have refreshed while this one waited
        if let Some(current) = self.tokens.get(TokenKind::Access).await {
            if Some(current.as_str()) != rejected {
                debug!("Reusing access token refreshed by a concurrent request");
                return Some(current);
            }
        }

        match self.refresh_access_token().await {
            Ok(token) => Some(token),
            Err(err) => {
                warn!(error = %err, "Token refresh failed; returning original response");
                None
            }
        }
    }

    async fn send_once(
        &self,
        path: &str,
        method: Method,
        body: Option<&Value>,
        access: AccessType,
        access_token: Option<&str>,
    ) -> Result<RawResponse, ApiError> {
        let mut request = self
            .http
            .request(method, self.endpoint(path)?)
            .header(headers::ACCESS_TYPE, access.header_value());

        if access == AccessType::Server {
            let key = self.config.secret_server_key.as_deref().ok_or(ApiError::MissingServerKey)?;
            request = request.header(headers::SECRET_SERVER_KEY, key);
        }

        if let Some(token) = access_token {
            request = request.header(headers::ACCESS_TOKEN, token);
        }

        request = match body {
            Some(body) => request.json(body),
            None => request.header(CONTENT_TYPE, JSON),
        };

        self.execute(request).await
    }

    async fn execute(&self, request: RequestBuilder) -> Result<RawResponse, ApiError> {
        RawResponse::read(self.http.send(request).await?).await
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn identity_headers(config: &StackConfig) -> Result<HeaderMap, ApiError> {
    let mut map = HeaderMap::new();
    map.insert(ACCEPT, HeaderValue::from_static(JSON));
    map.insert(headers::PROJECT_ID, header_value("project_id", &config.project_id)?);
    map.insert(
        headers::PUBLISHABLE_CLIENT_KEY,
        header_value("publishable_client_key", &config.publishable_client_key)?,
    );
    Ok(map)
}

fn header_value(field: &str, value: &str) -> Result<HeaderValue, ApiError> {
    HeaderValue::from_str(value)
        .map_err(|_| ApiError::Config(format!("{field} is not a valid header value")))
}

fn to_body<B: Serialize + ?Sized>(body: &B) -> Result<Value, ApiError> {
    serde_json::to_value(body)
        .map_err(|e| ApiError::InvalidInput(format!("Failed to serialize body: {e}")))
}

/// Percent-encode one path segment
pub(crate) fn segment(value: &str) -> Cow<'_, str> {
    urlencoding::encode(value)
}

/// Append an encoded query string to `path`
pub(crate) fn with_query(path: &str, params: &[(&str, &str)]) -> String {
    if params.is_empty() {
        return path.to_string();
    }
    let query = url::form_urlencoded::Serializer::new(String::new()).extend_pairs(params).finish();
    format!("{path}?{query}")
}
