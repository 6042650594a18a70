//! Session token types and identity-service auth payloads

use std::fmt;

use serde::{Deserialize, Serialize};
use teamkit_domain::constants::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};

/// The two session credentials kept in the secure store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    /// Fixed secure-store key for this kind
    #[must_use]
    pub const fn storage_key(self) -> &'static str {
        match self {
            Self::Access => ACCESS_TOKEN_KEY,
            Self::Refresh => REFRESH_TOKEN_KEY,
        }
    }
}

/// Credentials for the single active session
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTokens {
    pub access_token: String,

    /// Not every response carries a refresh token; an absent one leaves the
    /// stored value untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl SessionTokens {
    #[must_use]
    pub fn new(access_token: impl Into<String>, refresh_token: Option<String>) -> Self {
        Self { access_token: access_token.into(), refresh_token }
    }
}

impl fmt::Debug for SessionTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionTokens")
            .field("access_token", &"[redacted]")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[redacted]"))
            .finish()
    }
}

/// Token response from sign-in, sign-up and OAuth code exchange
#[derive(Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl TokenResponse {
    #[must_use]
    pub fn session_tokens(&self) -> SessionTokens {
        SessionTokens::new(self.access_token.clone(), self.refresh_token.clone())
    }
}

impl fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenResponse").field("user_id", &self.user_id).finish_non_exhaustive()
    }
}

/// Response of `auth/sessions/current/refresh`
#[derive(Deserialize)]
pub struct RefreshResponse {
    pub access_token: String,
}

/// Error body returned by the identity service
///
/// The service reports `{ "code": "...", "error": "..." }`; OAuth endpoints
/// use `error` / `error_description`, and some proxies answer with
/// `message`. [`ProviderErrorBody::message`] picks whichever is present.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct ProviderErrorBody {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ProviderErrorBody {
    /// Parse an error body, tolerating non-JSON payloads
    #[must_use]
    pub fn parse(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_default()
    }

    /// Human-readable message, if the provider supplied one
    #[must_use]
    pub fn message(&self) -> Option<String> {
        [&self.error_description, &self.error, &self.message]
            .into_iter()
            .flatten()
            .find(|m| !m.trim().is_empty())
            .cloned()
    }
}
