//! Integration tests for the session client
//!
//! Drives `AuthSessionClient` end to end against a WireMock identity
//! service and an in-memory secure store.
//!
//! **Coverage:**
//! - Token refresh: one refresh per 401, failure leaves tokens untouched
//! - Sign-in → current user mapping
//! - Transport failures surface as a generic network error
//! - Sign-out with an unreachable service
//! - OAuth: URL parameters, CSRF rejection, exchange timeout
//! - Invitation revoke across a token refresh

#![allow(dead_code)]

#[path = "support.rs"]
mod support;

use std::time::Duration;

use reqwest::{Method, StatusCode};
use serde_json::json;
use support::TestSession;
use teamkit_domain::constants::{ACCESS_TOKEN_KEY, PKCE_STATE_KEY, PKCE_VERIFIER_KEY};
use teamkit_infra::{ApiError, OAuthCallback, OAuthFlowState, OperationResult};
use url::Url;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

// ============================================================================
// Refresh pipeline
// ============================================================================

#[tokio::test]
async fn expired_token_triggers_exactly_one_refresh() {
    let session = TestSession::start().await;
    session.seed_session("at-old", "rt-1");

    Mock::given(method("GET"))
        .and(path("/users/me"))
        .and(header("x-stack-access-token", "at-old"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&session.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/me"))
        .and(header("x-stack-access-token", "at-new"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "u1",
            "primary_email": "ada@example.com",
            "display_name": "Ada"
        })))
        .expect(1)
        .mount(&session.server)
        .await;
    session.mount_refresh("at-new", 1).await;

    let user = session.client.users().current_user().await.unwrap();

    assert_eq!(user.id, "u1");
    assert_eq!(session.access_token().as_deref(), Some("at-new"));
    assert_eq!(session.refresh_token().as_deref(), Some("rt-1"));
}

#[tokio::test]
async fn failed_refresh_returns_original_401_and_keeps_tokens() {
    let session = TestSession::start().await;
    session.seed_session("at-old", "rt-revoked");

    Mock::given(method("GET"))
        .and(path("/teams"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"error": "Access token expired"})),
        )
        .expect(1)
        .mount(&session.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/sessions/current/refresh"))
        .and(header("x-stack-refresh-token", "rt-revoked"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "Refresh revoked"})))
        .expect(1)
        .mount(&session.server)
        .await;

    let raw = session.client.api().request("teams?user_id=me", Method::GET, None).await.unwrap();
    assert_eq!(raw.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(raw.body(), r#"{"error":"Access token expired"}"#);

    assert_eq!(session.access_token().as_deref(), Some("at-old"));
    assert_eq!(session.refresh_token().as_deref(), Some("rt-revoked"));
}

#[tokio::test]
async fn typed_call_surfaces_original_401_message() {
    let session = TestSession::start().await;
    session.keychain.insert(ACCESS_TOKEN_KEY, "at-old");

    Mock::given(method("GET"))
        .and(path("/teams"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"error": "Access token expired"})),
        )
        .expect(1)
        .mount(&session.server)
        .await;

    let err = session.client.teams().list_teams().await.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.to_string(), "Access token expired");
}

// ============================================================================
// Password sign-in / sign-out
// ============================================================================

#[tokio::test]
async fn sign_in_then_current_user_returns_mapped_user() {
    let session = TestSession::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/password/sign-in"))
        .and(body_json(json!({"email": "ada@example.com", "password": "hunter22"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "at-1",
            "refresh_token": "rt-1",
            "user_id": "u1"
        })))
        .expect(1)
        .mount(&session.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/me"))
        .and(header("x-stack-access-token", "at-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "u1",
            "primary_email": "ada@example.com",
            "primary_email_verified": true,
            "display_name": "Ada Lovelace",
            "profile_image_url": "https://cdn.example/ada.png"
        })))
        .expect(1)
        .mount(&session.server)
        .await;

    let outcome = session.client.auth().sign_in("ada@example.com", "hunter22").await.unwrap();
    assert_eq!(outcome.user_id.as_deref(), Some("u1"));

    let user = session.client.users().current_user().await.unwrap();
    assert_eq!(
        serde_json::to_value(&user).unwrap(),
        json!({
            "id": "u1",
            "email": "ada@example.com",
            "displayName": "Ada Lovelace",
            "profile_image_url": "https://cdn.example/ada.png"
        })
    );
}

#[tokio::test]
async fn sign_out_clears_tokens_when_network_fails() {
    let session = TestSession::start().await;
    session.seed_session("at-1", "rt-1");

    // Dropping the server makes the revocation call fail at the transport
    let TestSession { server, keychain, client } = session;
    drop(server);

    client.auth().sign_out().await;

    assert!(keychain.is_empty());
    assert!(!client.auth().is_signed_in().await);
}

// ============================================================================
// OAuth PKCE
// ============================================================================

#[tokio::test]
async fn oauth_url_state_matches_persisted_state() {
    let session = TestSession::start().await;

    let url = session.client.oauth().sign_in_with_oauth("google").await.unwrap();
    let parsed = Url::parse(&url).unwrap();
    let state = parsed.query_pairs().find(|(k, _)| k == "state").map(|(_, v)| v.into_owned());

    assert!(url.contains("code_challenge_method=S256"));
    assert_eq!(state, session.keychain.value(PKCE_STATE_KEY));
    assert!(session.keychain.contains(PKCE_VERIFIER_KEY));
    assert_eq!(session.client.oauth().state().await, OAuthFlowState::AwaitingCallback);
}

#[tokio::test]
async fn mismatched_state_never_reaches_token_endpoint() {
    let session = TestSession::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/oauth/token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&session.server)
        .await;

    session.client.oauth().sign_in_with_oauth("github").await.unwrap();
    let callback =
        OAuthCallback::from_url("teamkit://oauth-callback?code=abc&state=not-the-state").unwrap();

    let err = session.client.oauth().complete_from_callback(&callback).await.unwrap_err();

    assert_eq!(err, ApiError::StateMismatch);
    assert!(!session.keychain.contains(PKCE_STATE_KEY));
    assert!(!session.keychain.contains(PKCE_VERIFIER_KEY));
}

#[tokio::test]
async fn slow_token_exchange_resolves_as_timeout() {
    let session = TestSession::start_with(|c| c.with_token_exchange_timeout_secs(1)).await;
    Mock::given(method("POST"))
        .and(path("/auth/oauth/token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access_token": "too-late"}))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&session.server)
        .await;

    let url = session.client.oauth().sign_in_with_oauth("google").await.unwrap();
    let state = Url::parse(&url)
        .unwrap()
        .query_pairs()
        .find(|(k, _)| k == "state")
        .map(|(_, v)| v.into_owned())
        .unwrap();

    let started = std::time::Instant::now();
    let err = session.client.oauth().handle_oauth_callback("code-1", &state).await.unwrap_err();

    assert!(matches!(err, ApiError::Timeout(_)));
    assert!(started.elapsed() < Duration::from_secs(4));
    assert!(session.access_token().is_none());
    assert!(matches!(session.client.oauth().state().await, OAuthFlowState::Failed(_)));
}

// ============================================================================
// Resource operations
// ============================================================================

#[tokio::test]
async fn invitation_delete_refreshes_and_succeeds() {
    let session = TestSession::start().await;
    session.seed_session("at-old", "rt-1");

    Mock::given(method("DELETE"))
        .and(path("/team-invitations/inv-1"))
        .and(query_param("team_id", "team-1"))
        .and(header("x-stack-access-token", "at-old"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&session.server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/team-invitations/inv-1"))
        .and(query_param("team_id", "team-1"))
        .and(header("x-stack-access-token", "at-new"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&session.server)
        .await;
    session.mount_refresh("at-new", 1).await;

    let result: OperationResult<()> =
        session.client.invitations().revoke_invitation("team-1", "inv-1").await.into();

    assert!(result.success);
    assert_eq!(serde_json::to_value(&result).unwrap()["success"], json!(true));
}

#[tokio::test]
async fn unreachable_service_reports_generic_network_error() {
    let session = TestSession::start().await;
    session.seed_session("at-1", "rt-1");
    let TestSession { server, keychain, client } = session;
    drop(server);

    let result: OperationResult<_> = client.users().current_user().await.into();
    let value = serde_json::to_value(&result).unwrap();

    assert_eq!(
        value,
        json!({"success": false, "error": {"kind": "network", "message": "Network error"}})
    );
    assert_eq!(keychain.value(ACCESS_TOKEN_KEY).as_deref(), Some("at-1"));

    let err = client.teams().delete_team("team-1").await.unwrap_err();
    assert!(matches!(err, ApiError::Network(_)));
    assert_eq!(err.to_string(), "Network error");
}

#[tokio::test]
async fn member_listing_failure_uses_uniform_error_shape() {
    let session = TestSession::start().await;
    Mock::given(method("GET"))
        .and(path("/team-member-profiles"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&session.server)
        .await;

    let result: OperationResult<_> = session.client.teams().list_members("team-1").await.into();
    let value = serde_json::to_value(&result).unwrap();

    assert_eq!(value["success"], json!(false));
    assert_eq!(value["error"]["kind"], json!("server"));
    assert_eq!(value["error"]["message"], json!("Request failed with status 500"));
}
