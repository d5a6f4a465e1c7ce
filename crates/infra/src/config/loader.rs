//! Configuration loader
//!
//! Loads application configuration from environment variables or a file.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to a config file (`LINKER_CONFIG`, then
//!    `./linker.toml` / `./linker.json`)
//!
//! ## Environment Variables
//! - `LINKER_BIND_ADDR`: listen address (default `0.0.0.0:8080`)
//! - `LINKER_SITE_URL`: externally visible base URL (required)
//! - `LINKER_API_KEY`: shared bearer key (required)
//! - `LINKER_ALLOWED_ORIGINS`: comma-separated CORS origins
//! - `LINKER_DB_PATH`: database file path (required)
//! - `LINKER_DB_POOL_SIZE`: connection pool size (default 4)
//! - `LINKER_WD_AUTH_API_URL`: identity provider base URL (required)
//! - `LINKER_WD_AUTH_CLIENT_ID`: provider client id (required)
//! - `LINKER_WD_AUTH_CLIENT_SECRET`: provider client secret (required)
//! - `LINKER_WD_AUTH_SCOPE`: authorize scope (default `identify`)
//! - `LINKER_EXCHANGE_TIMEOUT_SECS`: code exchange timeout (default 10)
//! - `LINKER_MEMBERSHIP_API_URL`: membership lookup endpoint (required)
//! - `LINKER_MEMBERSHIP_TIMEOUT_SECS`: membership timeout (default 10)
//! - `LINKER_SESSION_TTL_SECS`: session idle TTL (default 3600)

use std::path::{Path, PathBuf};

use linker_domain::constants::{
    DEFAULT_EXCHANGE_TIMEOUT_SECS, DEFAULT_MEMBERSHIP_TIMEOUT_SECS, DEFAULT_PROVIDER_SCOPE,
    DEFAULT_SESSION_TTL_SECS,
};
use linker_domain::{
    AuthConfig, Config, DatabaseConfig, LinkerError, MembershipConfig, Result, ServerConfig,
    SessionConfig,
};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_POOL_SIZE: u32 = 4;

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If any required
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `LinkerError::Config` if configuration cannot be loaded from
/// either source, the file format is invalid, or required fields are
/// missing.
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// All required environment variables must be present; missing ones fail
/// the load as a whole.
pub fn load_from_env() -> Result<Config> {
    let bind_addr = env_or("LINKER_BIND_ADDR", DEFAULT_BIND_ADDR);
    let site_url = env_var("LINKER_SITE_URL")?;
    let api_key = env_var("LINKER_API_KEY")?;
    let allowed_origins = std::env::var("LINKER_ALLOWED_ORIGINS")
        .map(|raw| {
            raw.split(',').map(str::trim).filter(|s| !s.is_empty()).map(String::from).collect()
        })
        .unwrap_or_default();

    let db_path = env_var("LINKER_DB_PATH")?;
    let db_pool_size = env_parse("LINKER_DB_POOL_SIZE", DEFAULT_POOL_SIZE)?;

    let auth_api_url = env_var("LINKER_WD_AUTH_API_URL")?;
    let client_id = env_var("LINKER_WD_AUTH_CLIENT_ID")?;
    let client_secret = env_var("LINKER_WD_AUTH_CLIENT_SECRET")?;
    let scope = env_or("LINKER_WD_AUTH_SCOPE", DEFAULT_PROVIDER_SCOPE);
    let exchange_timeout_secs =
        env_parse("LINKER_EXCHANGE_TIMEOUT_SECS", DEFAULT_EXCHANGE_TIMEOUT_SECS)?;

    let membership_api_url = env_var("LINKER_MEMBERSHIP_API_URL")?;
    let membership_timeout_secs =
        env_parse("LINKER_MEMBERSHIP_TIMEOUT_SECS", DEFAULT_MEMBERSHIP_TIMEOUT_SECS)?;

    let session_ttl_secs = env_parse("LINKER_SESSION_TTL_SECS", DEFAULT_SESSION_TTL_SECS)?;

    Ok(Config {
        server: ServerConfig { bind_addr, site_url, api_key, allowed_origins },
        database: DatabaseConfig { path: db_path, pool_size: db_pool_size },
        auth: AuthConfig { api_url: auth_api_url, client_id, client_secret, scope, exchange_timeout_secs },
        membership: MembershipConfig {
            api_url: membership_api_url,
            timeout_secs: membership_timeout_secs,
        },
        session: SessionConfig { ttl_secs: session_ttl_secs },
    })
}

/// Load configuration from a file
///
/// If `path` is `None`, consults `LINKER_CONFIG` and then probes
/// `./linker.toml` and `./linker.json`. The format is detected by the
/// file extension.
pub fn load_from_file(path: Option<&Path>) -> Result<Config> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => probe_config_paths()
            .ok_or_else(|| LinkerError::Config("no config file found".into()))?,
    };

    let raw = std::fs::read_to_string(&path)
        .map_err(|err| LinkerError::Config(format!("cannot read {}: {err}", path.display())))?;

    let config = match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => toml::from_str(&raw)
            .map_err(|err| LinkerError::Config(format!("invalid TOML config: {err}")))?,
        Some("json") => serde_json::from_str(&raw)
            .map_err(|err| LinkerError::Config(format!("invalid JSON config: {err}")))?,
        other => {
            return Err(LinkerError::Config(format!(
                "unsupported config extension: {other:?}"
            )))
        }
    };

    tracing::info!(path = %path.display(), "configuration loaded from file");
    Ok(config)
}

fn probe_config_paths() -> Option<PathBuf> {
    if let Ok(explicit) = std::env::var("LINKER_CONFIG") {
        return Some(PathBuf::from(explicit));
    }

    ["linker.toml", "linker.json"].into_iter().map(PathBuf::from).find(|p| p.exists())
}

fn env_var(name: &str) -> Result<String> {
    std::env::var(name)
        .map_err(|_| LinkerError::Config(format!("missing environment variable {name}")))
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|err| LinkerError::Config(format!("invalid value for {name}: {err}"))),
        Err(_) => Ok(default),
    }
}
