//! Application constants
//!
//! Centralized location for the identity service endpoints, header names and
//! secure-store keys used throughout the application.

// Configuration defaults
pub const DEFAULT_BASE_URL: &str = "https://api.stack-auth.com/api/v1/";
pub const DEFAULT_OAUTH_SCOPE: &str = "legacy";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_TOKEN_EXCHANGE_TIMEOUT_SECS: u64 = 30;

// Secure-store keys
pub const ACCESS_TOKEN_KEY: &str = "stack_access_token";
pub const REFRESH_TOKEN_KEY: &str = "stack_refresh_token";
pub const PKCE_VERIFIER_KEY: &str = "stack_pkce_code_verifier";
pub const PKCE_STATE_KEY: &str = "stack_pkce_state";

/// Request headers understood by the identity service.
pub mod headers {
    pub const PROJECT_ID: &str = "x-stack-project-id";
    pub const ACCESS_TYPE: &str = "x-stack-access-type";
    pub const PUBLISHABLE_CLIENT_KEY: &str = "x-stack-publishable-client-key";
    pub const SECRET_SERVER_KEY: &str = "x-stack-secret-server-key";
    pub const ACCESS_TOKEN: &str = "x-stack-access-token";
    pub const REFRESH_TOKEN: &str = "x-stack-refresh-token";

    pub const ACCESS_TYPE_CLIENT: &str = "client";
    pub const ACCESS_TYPE_SERVER: &str = "server";
}

/// Endpoint paths, relative to the configured base URL.
pub mod endpoints {
    pub const PASSWORD_SIGN_IN: &str = "auth/password/sign-in";
    pub const PASSWORD_SIGN_UP: &str = "auth/password/sign-up";
    pub const SESSION_REFRESH: &str = "auth/sessions/current/refresh";
    pub const SESSION_CURRENT: &str = "auth/sessions/current";
    pub const OAUTH_AUTHORIZE: &str = "auth/oauth/authorize";
    pub const OAUTH_TOKEN: &str = "auth/oauth/token";
    pub const USERS: &str = "users";
    pub const USERS_ME: &str = "users/me";
    pub const PROJECT_CURRENT: &str = "projects/current";
    pub const TEAMS: &str = "teams";
    pub const TEAM_PERMISSIONS: &str = "team-permissions";
    pub const TEAM_MEMBER_PROFILES: &str = "team-member-profiles";
    pub const TEAM_MEMBERSHIPS: &str = "team-memberships";
    pub const TEAM_INVITATIONS: &str = "team-invitations";
    pub const TEAM_INVITATIONS_SEND_CODE: &str = "team-invitations/send-code";
}

// Special identifiers
pub const CURRENT_USER_ID: &str = "me";
pub const PKCE_CHALLENGE_METHOD: &str = "S256";
pub const GRANT_TYPE_AUTHORIZATION_CODE: &str = "authorization_code";
