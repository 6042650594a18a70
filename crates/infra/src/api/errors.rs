//! API-specific error types
//!
//! Every operation exposed by this crate fails with [`ApiError`]. Callers
//! that cannot consume `Result` directly (UI bindings, IPC bridges) use
//! [`OperationResult`], which serializes to a `{ success, data | error }`
//! envelope.

use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use teamkit_common::auth::ProviderErrorBody;
use teamkit_domain::TeamkitError;
use thiserror::Error;

/// Categories of API errors, used for routing failures to the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorCategory {
    /// 401/403, or an operation that needs a session when none exists
    Authentication,
    /// Other 4xx responses and rejected input
    Client,
    /// 5xx responses
    Server,
    /// Connection failures and unreadable responses
    Network,
    /// A deadline elapsed before the service answered
    Timeout,
    /// Problems with the OAuth redirect itself
    #[serde(rename = "oauth")]
    OAuth,
    /// Missing or invalid local configuration
    Config,
}

impl ApiErrorCategory {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Authentication => "authentication",
            Self::Client => "client",
            Self::Server => "server",
            Self::Network => "network",
            Self::Timeout => "timeout",
            Self::OAuth => "oauth",
            Self::Config => "config",
        }
    }
}

/// API operation errors
///
/// Status-bearing variants display the service's own message verbatim so it
/// can be shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("{message}")]
    Auth { status: u16, message: String },

    #[error("{message}")]
    Client { status: u16, message: String },

    #[error("{message}")]
    Server { status: u16, message: String },

    /// Transport failure; the detail is for logs, not for display
    #[error("Network error")]
    Network(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("OAuth state mismatch; the callback does not belong to this sign-in")]
    StateMismatch,

    #[error("OAuth authorization failed: {0}")]
    OAuthDenied(String),

    #[error("OAuth callback is missing the `{0}` parameter")]
    MissingCallbackParameter(&'static str),

    #[error("No OAuth sign-in is in progress")]
    NoPendingFlow,

    #[error("Not signed in")]
    NotAuthenticated,

    #[error("Secret server key is not configured")]
    MissingServerKey,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Build the error for a non-2xx response
    ///
    /// The message comes from the body's `error_description`, `error` or
    /// `message` field, falling back to `Request failed with status <code>`.
    #[must_use]
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let code = status.as_u16();
        let message = ProviderErrorBody::parse(body)
            .message()
            .unwrap_or_else(|| format!("Request failed with status {code}"));

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Self::Auth { status: code, message },
            s if s.is_server_error() => Self::Server { status: code, message },
            _ => Self::Client { status: code, message },
        }
    }

    /// Get the error category for this error
    #[must_use]
    pub const fn category(&self) -> ApiErrorCategory {
        match self {
            Self::Auth { .. } | Self::NotAuthenticated => ApiErrorCategory::Authentication,
            Self::Client { .. } | Self::InvalidInput(_) => ApiErrorCategory::Client,
            Self::Server { .. } => ApiErrorCategory::Server,
            Self::Network(_) | Self::Parse(_) => ApiErrorCategory::Network,
            Self::Timeout(_) => ApiErrorCategory::Timeout,
            Self::StateMismatch
            | Self::OAuthDenied(_)
            | Self::MissingCallbackParameter(_)
            | Self::NoPendingFlow => ApiErrorCategory::OAuth,
            Self::MissingServerKey | Self::Config(_) | Self::Internal(_) => {
                ApiErrorCategory::Config
            }
        }
    }

    /// HTTP status, for errors that came from a response
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Auth { status, .. } | Self::Client { status, .. } | Self::Server { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Auth { status: 401, .. })
    }
}

impl From<TeamkitError> for ApiError {
    fn from(err: TeamkitError) -> Self {
        match err {
            TeamkitError::Network(message) => Self::Network(message),
            TeamkitError::Auth(message) => Self::Auth { status: 401, message },
            TeamkitError::Config(message) => Self::Config(message),
            TeamkitError::InvalidInput(message) => Self::InvalidInput(message),
            TeamkitError::Storage(message) | TeamkitError::Internal(message) => {
                Self::Internal(message)
            }
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

/// Failure half of [`OperationResult`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationError {
    pub kind: ApiErrorCategory,
    pub message: String,
}

impl From<&ApiError> for OperationError {
    fn from(err: &ApiError) -> Self {
        Self { kind: err.category(), message: err.to_string() }
    }
}

/// Uniform outcome envelope for UI-facing callers
///
/// Serializes as `{"success":true,"data":...}` or
/// `{"success":false,"error":{"kind":"...","message":"..."}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationResult<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<OperationError>,
}

impl<T> OperationResult<T> {
    #[must_use]
    pub const fn ok(data: T) -> Self {
        Self { success: true, data: Some(data), error: None }
    }

    #[must_use]
    pub fn err(error: &ApiError) -> Self {
        Self { success: false, data: None, error: Some(error.into()) }
    }

    /// Message to show the user, if the operation failed
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_ref().map(|e| e.message.as_str())
    }
}

impl<T> From<Result<T, ApiError>> for OperationResult<T> {
    fn from(result: Result<T, ApiError>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(err) => Self::err(&err),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn response_message_is_relayed_verbatim() {
        let err = ApiError::from_response(
            StatusCode::BAD_REQUEST,
            r#"{"code":"EMAIL_PASSWORD_MISMATCH","error":"Wrong e-mail or password."}"#,
        );
        assert_eq!(err.to_string(), "Wrong e-mail or password.");
        assert_eq!(err.category(), ApiErrorCategory::Client);
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn response_without_message_uses_status_fallback() {
        let err = ApiError::from_response(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>");
        assert_eq!(err.to_string(), "Request failed with status 502");
        assert_eq!(err.category(), ApiErrorCategory::Server);
    }

    #[test]
    fn unauthorized_maps_to_authentication() {
        let err = ApiError::from_response(StatusCode::UNAUTHORIZED, "");
        assert!(err.is_unauthorized());
        assert_eq!(err.category(), ApiErrorCategory::Authentication);

        let forbidden = ApiError::from_response(StatusCode::FORBIDDEN, "");
        assert!(!forbidden.is_unauthorized());
        assert_eq!(forbidden.category(), ApiErrorCategory::Authentication);
    }

    #[test]
    fn test_error_categories() {
        assert_eq!(ApiError::StateMismatch.category(), ApiErrorCategory::OAuth);
        assert_eq!(ApiError::NoPendingFlow.category(), ApiErrorCategory::OAuth);
        assert_eq!(
            ApiError::Timeout(Duration::from_secs(30)).category(),
            ApiErrorCategory::Timeout
        );
        assert_eq!(ApiError::Network("down".into()).category(), ApiErrorCategory::Network);
        assert_eq!(ApiError::MissingServerKey.category(), ApiErrorCategory::Config);
    }

    #[test]
    fn teamkit_errors_convert() {
        assert_eq!(
            ApiError::from(TeamkitError::Network("refused".into())),
            ApiError::Network("refused".into())
        );
        assert!(matches!(
            ApiError::from(TeamkitError::Config("bad".into())),
            ApiError::Config(_)
        ));
    }

    #[test]
    fn operation_result_success_shape() {
        let result: OperationResult<u32> = Ok(7).into();
        assert_eq!(serde_json::to_value(&result).unwrap(), json!({"success": true, "data": 7}));
    }

    #[test]
    fn operation_result_failure_shape() {
        let result: OperationResult<u32> = Err(ApiError::StateMismatch).into();
        let value = serde_json::to_value(&result).unwrap();

        assert_eq!(value["success"], json!(false));
        assert_eq!(value["error"]["kind"], json!("oauth"));
        assert!(value.get("data").is_none());
        assert!(result.error_message().is_some_and(|m| m.contains("state mismatch")));
    }
}
