//! Client configuration
//!
//! Identifies this app to the hosted identity service. Loaded from the
//! environment or a config file by `teamkit-infra::config`.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BASE_URL, DEFAULT_OAUTH_SCOPE, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_TOKEN_EXCHANGE_TIMEOUT_SECS,
};
use crate::errors::{Result, TeamkitError};

/// Configuration for the identity service client
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackConfig {
    /// Project identifier issued by the identity service
    pub project_id: String,

    /// Publishable client key (safe to ship inside the app)
    pub publishable_client_key: String,

    /// Secret server key for privileged calls. Absent in most builds.
    #[serde(default)]
    pub secret_server_key: Option<String>,

    /// API base URL; always ends with `/` after [`StackConfig::validate`]
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Deep link the OAuth provider redirects back to
    pub oauth_redirect_uri: String,

    /// Base URL embedded in team invitation and verification emails
    #[serde(default)]
    pub invitation_callback_url: Option<String>,

    #[serde(default = "default_oauth_scope")]
    pub oauth_scope: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_token_exchange_timeout")]
    pub token_exchange_timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_oauth_scope() -> String {
    DEFAULT_OAUTH_SCOPE.to_string()
}

const fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

const fn default_token_exchange_timeout() -> u64 {
    DEFAULT_TOKEN_EXCHANGE_TIMEOUT_SECS
}

impl StackConfig {
    /// Create a configuration with defaults for every optional field
    #[must_use]
    pub fn new(
        project_id: impl Into<String>,
        publishable_client_key: impl Into<String>,
        oauth_redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            publishable_client_key: publishable_client_key.into(),
            secret_server_key: None,
            base_url: default_base_url(),
            oauth_redirect_uri: oauth_redirect_uri.into(),
            invitation_callback_url: None,
            oauth_scope: default_oauth_scope(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            token_exchange_timeout_secs: DEFAULT_TOKEN_EXCHANGE_TIMEOUT_SECS,
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn with_secret_server_key(mut self, key: impl Into<String>) -> Self {
        self.secret_server_key = Some(key.into());
        self
    }

    #[must_use]
    pub fn with_invitation_callback_url(mut self, url: impl Into<String>) -> Self {
        self.invitation_callback_url = Some(url.into());
        self
    }

    #[must_use]
    pub const fn with_request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    #[must_use]
    pub const fn with_token_exchange_timeout_secs(mut self, secs: u64) -> Self {
        self.token_exchange_timeout_secs = secs;
        self
    }

    /// Check required fields and normalise the base URL
    ///
    /// # Errors
    /// Returns `TeamkitError::Config` if a required field is empty, the base
    /// URL has no http(s) scheme, or a timeout is zero.
    pub fn validate(mut self) -> Result<Self> {
        require("project_id", &self.project_id)?;
        require("publishable_client_key", &self.publishable_client_key)?;
        require("oauth_redirect_uri", &self.oauth_redirect_uri)?;
        require("base_url", &self.base_url)?;
        require_nonzero("request_timeout_secs", self.request_timeout_secs)?;
        require_nonzero("token_exchange_timeout_secs", self.token_exchange_timeout_secs)?;

        if !(self.base_url.starts_with("https://") || self.base_url.starts_with("http://")) {
            return Err(TeamkitError::Config(format!(
                "base_url must use http or https: {}",
                self.base_url
            )));
        }

        if !self.base_url.ends_with('/') {
            self.base_url.push('/');
        }

        // Blank optional values behave as unset
        if self.secret_server_key.as_deref().is_some_and(str::is_empty) {
            self.secret_server_key = None;
        }
        if self.invitation_callback_url.as_deref().is_some_and(str::is_empty) {
            self.invitation_callback_url = None;
        }

        Ok(self)
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    #[must_use]
    pub const fn token_exchange_timeout(&self) -> Duration {
        Duration::from_secs(self.token_exchange_timeout_secs)
    }
}

fn require_nonzero(field: &str, secs: u64) -> Result<()> {
    if secs == 0 {
        return Err(TeamkitError::Config(format!("{field} must be greater than zero")));
    }
    Ok(())
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(TeamkitError::Config(format!("{field} must not be empty")));
    }
    Ok(())
}

impl fmt::Debug for StackConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StackConfig")
            .field("project_id", &self.project_id)
            .field("publishable_client_key", &self.publishable_client_key)
            .field("secret_server_key", &self.secret_server_key.as_ref().map(|_| "[redacted]"))
            .field("base_url", &self.base_url)
            .field("oauth_redirect_uri", &self.oauth_redirect_uri)
            .field("invitation_callback_url", &self.invitation_callback_url)
            .field("oauth_scope", &self.oauth_scope)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("token_exchange_timeout_secs", &self.token_exchange_timeout_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> StackConfig {
        StackConfig::new("proj_123", "pck_abc", "teamkit://oauth-callback")
    }

    #[test]
    fn validate_appends_trailing_slash() {
        let config = sample().with_base_url("https://example.test/api/v1").validate().unwrap();
        assert_eq!(config.base_url, "https://example.test/api/v1/");
    }

    #[test]
    fn validate_rejects_empty_project_id() {
        let mut config = sample();
        config.project_id = "  ".to_string();
        assert!(matches!(config.validate(), Err(TeamkitError::Config(_))));
    }

    #[test]
    fn validate_rejects_schemeless_base_url() {
        let result = sample().with_base_url("api.example.test").validate();
        assert!(matches!(result, Err(TeamkitError::Config(_))));
    }

    #[test]
    fn validate_rejects_zero_timeouts() {
        let result = sample().with_request_timeout_secs(0).validate();
        assert!(matches!(result, Err(TeamkitError::Config(m)) if m.starts_with("request_timeout")));

        let result = sample().with_token_exchange_timeout_secs(0).validate();
        assert!(matches!(result, Err(TeamkitError::Config(m)) if m.starts_with("token_exchange")));

        let one_second =
            sample().with_request_timeout_secs(1).with_token_exchange_timeout_secs(1).validate();
        assert!(one_second.is_ok());
    }

    #[test]
    fn validate_drops_blank_server_key() {
        let config = sample().with_secret_server_key("").validate().unwrap();
        assert!(config.secret_server_key.is_none());
    }

    #[test]
    fn debug_output_redacts_server_key() {
        let config = sample().with_secret_server_key("ssk_super_secret");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("ssk_super_secret"));
        assert!(rendered.contains("[redacted]"));
    }

    #[test]
    fn serde_defaults_fill_optional_fields() {
        let json = r#"{
            "project_id": "p",
            "publishable_client_key": "k",
            "oauth_redirect_uri": "teamkit://cb"
        }"#;
        let config: StackConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.oauth_scope, "legacy");
        assert_eq!(config.token_exchange_timeout(), Duration::from_secs(30));
    }
}
