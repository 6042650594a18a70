//! Configuration loader
//!
//! Loads [`StackConfig`] from environment variables or files.
//!
//! ## Loading Strategy
//! 1. Reads a `.env` file into the environment if one is present
//! 2. Attempts to load from environment variables
//! 3. If a required variable is missing, falls back to a config file
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `STACK_PROJECT_ID` (required)
//! - `STACK_PUBLISHABLE_CLIENT_KEY` (required)
//! - `STACK_OAUTH_REDIRECT_URI` (required)
//! - `STACK_SECRET_SERVER_KEY`
//! - `STACK_API_URL`
//! - `STACK_INVITATION_CALLBACK_URL`
//! - `STACK_OAUTH_SCOPE`
//! - `STACK_REQUEST_TIMEOUT_SECS`
//! - `STACK_TOKEN_EXCHANGE_TIMEOUT_SECS`
//!
//! ## File Locations
//! `teamkit.toml`, `teamkit.json`, `config.toml` and `config.json` are probed
//! in the working directory, then its parent and grandparent.

use std::path::{Path, PathBuf};

use teamkit_domain::constants::{
    DEFAULT_BASE_URL, DEFAULT_OAUTH_SCOPE, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_TOKEN_EXCHANGE_TIMEOUT_SECS,
};
use teamkit_domain::{Result, StackConfig, TeamkitError};
use url::Url;

const CONFIG_FILE_NAMES: [&str; 4] = ["teamkit.toml", "teamkit.json", "config.toml", "config.json"];

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `TeamkitError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - A field fails validation
pub fn load() -> Result<StackConfig> {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!(path = %path.display(), "Loaded .env file");
    }

    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// # Errors
/// Returns `TeamkitError::Config` if a required variable is missing or a
/// value is invalid.
pub fn load_from_env() -> Result<StackConfig> {
    let config = StackConfig {
        project_id: env_var("STACK_PROJECT_ID")?,
        publishable_client_key: env_var("STACK_PUBLISHABLE_CLIENT_KEY")?,
        secret_server_key: env_opt("STACK_SECRET_SERVER_KEY"),
        base_url: env_opt("STACK_API_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        oauth_redirect_uri: env_var("STACK_OAUTH_REDIRECT_URI")?,
        invitation_callback_url: env_opt("STACK_INVITATION_CALLBACK_URL"),
        oauth_scope: env_opt("STACK_OAUTH_SCOPE")
            .unwrap_or_else(|| DEFAULT_OAUTH_SCOPE.to_string()),
        request_timeout_secs: env_u64("STACK_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?,
        token_exchange_timeout_secs: env_u64(
            "STACK_TOKEN_EXCHANGE_TIMEOUT_SECS",
            DEFAULT_TOKEN_EXCHANGE_TIMEOUT_SECS,
        )?,
    };

    finalize(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations. Format is detected
/// by extension.
///
/// # Errors
/// Returns `TeamkitError::Config` if the file is missing, unreadable,
/// malformed or fails validation.
pub fn load_from_file(path: Option<PathBuf>) -> Result<StackConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(TeamkitError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            TeamkitError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| TeamkitError::Config(format!("Failed to read config file: {e}")))?;

    finalize(parse_config(&contents, &config_path)?)
}

fn parse_config(contents: &str, path: &Path) -> Result<StackConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| TeamkitError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| TeamkitError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(TeamkitError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Validate and check that the base URL parses
fn finalize(config: StackConfig) -> Result<StackConfig> {
    let config = config.validate()?;
    Url::parse(&config.base_url)
        .map_err(|e| TeamkitError::Config(format!("Invalid base_url {}: {e}", config.base_url)))?;
    Ok(config)
}

/// Probe the standard locations for a configuration file
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    probe_from(&cwd)
}

fn probe_from(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .take(3)
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.is_file())
}

fn env_var(key: &str) -> Result<String> {
    env_opt(key).ok_or_else(|| {
        TeamkitError::Config(format!("Missing required environment variable: {key}"))
    })
}

/// Set and non-blank
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_u64(key: &str, default: u64) -> Result<u64> {
    env_opt(key).map_or(Ok(default), |raw| {
        raw.trim().parse::<u64>().map_err(|e| TeamkitError::Config(format!("Invalid {key}: {e}")))
    })
}
