use std::sync::Arc;

use serde_json::json;
use teamkit_common::testing::MockKeychainProvider;
use teamkit_domain::constants::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
use teamkit_domain::StackConfig;
use teamkit_infra::AuthSessionClient;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const PROJECT_ID: &str = "proj_integration";
pub const CLIENT_KEY: &str = "pck_integration";
pub const REDIRECT_URI: &str = "teamkit://oauth-callback";

/// Session client wired to a mock identity service and an in-memory
/// secure store.
pub struct TestSession {
    pub server: MockServer,
    pub keychain: MockKeychainProvider,
    pub client: AuthSessionClient,
}

impl TestSession {
    pub async fn start() -> Self {
        Self::start_with(|config| config).await
    }

    /// Start with a customised configuration; the base URL is always the
    /// mock server.
    pub async fn start_with(customise: impl FnOnce(StackConfig) -> StackConfig) -> Self {
        let server = MockServer::start().await;
        let keychain = MockKeychainProvider::new();
        let config = customise(StackConfig::new(PROJECT_ID, CLIENT_KEY, REDIRECT_URI))
            .with_base_url(server.uri());
        let client = AuthSessionClient::new(config, Arc::new(keychain.clone()))
            .expect("session client should be created");

        Self { server, keychain, client }
    }

    /// Seed the store as if a previous sign-in had happened
    pub fn seed_session(&self, access: &str, refresh: &str) {
        self.keychain.insert(ACCESS_TOKEN_KEY, access);
        self.keychain.insert(REFRESH_TOKEN_KEY, refresh);
    }

    pub fn access_token(&self) -> Option<String> {
        self.keychain.value(ACCESS_TOKEN_KEY)
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.keychain.value(REFRESH_TOKEN_KEY)
    }

    /// Mount a refresh endpoint answering with `new_access`, expected
    /// `times` times
    pub async fn mount_refresh(&self, new_access: &str, times: u64) {
        Mock::given(method("POST"))
            .and(path("/auth/sessions/current/refresh"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "access_token": new_access })),
            )
            .expect(times)
            .mount(&self.server)
            .await;
    }
}
