//! Conversions from external infrastructure errors into domain errors.

use reqwest::Error as HttpError;
use teamkit_domain::TeamkitError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub TeamkitError);

impl From<InfraError> for TeamkitError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

trait IntoTeamkitError {
    fn into_teamkit(self) -> TeamkitError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → TeamkitError */
/* -------------------------------------------------------------------------- */

impl IntoTeamkitError for HttpError {
    fn into_teamkit(self) -> TeamkitError {
        if self.is_timeout() {
            return TeamkitError::Network("HTTP request timed out".into());
        }

        #[cfg(not(target_arch = "wasm32"))]
        if self.is_connect() {
            return TeamkitError::Network("HTTP connection failure".into());
        }

        if self.is_builder() {
            return TeamkitError::InvalidInput(format!("invalid HTTP request: {self}"));
        }

        if self.is_decode() || self.is_body() {
            return TeamkitError::Network("failed to read HTTP response body".into());
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                401 | 403 => TeamkitError::Auth(message),
                400..=499 => TeamkitError::InvalidInput(message),
                _ => TeamkitError::Network(message),
            };
        }

        TeamkitError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_teamkit())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use std::net::TcpListener;

    use reqwest::{Client, StatusCode};
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[tokio::test]
    async fn http_status_401_maps_to_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(StatusCode::UNAUTHORIZED))
            .mount(&server)
            .await;

        let client = Client::builder().no_proxy().build().unwrap();
        let error = client.get(server.uri()).send().await.unwrap().error_for_status().unwrap_err();

        let mapped: TeamkitError = InfraError::from(error).into();
        match mapped {
            TeamkitError::Auth(msg) => assert!(msg.contains("401")),
            other => panic!("expected auth error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn refused_connection_maps_to_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = Client::builder().no_proxy().build().unwrap();
        let error = client.get(format!("http://{addr}")).send().await.unwrap_err();

        let mapped: TeamkitError = InfraError::from(error).into();
        assert!(matches!(mapped, TeamkitError::Network(_)));
    }
}
