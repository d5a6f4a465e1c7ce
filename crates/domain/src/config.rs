//! Application configuration structures
//!
//! Built once at startup by the infra config loader and passed by
//! reference to every component. A missing required setting fails at
//! construction, not at first use.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_EXCHANGE_TIMEOUT_SECS, DEFAULT_MEMBERSHIP_TIMEOUT_SECS, DEFAULT_PROVIDER_SCOPE,
    DEFAULT_SESSION_TTL_SECS,
};

/// Top-level application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub membership: MembershipConfig,
    pub session: SessionConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the listener binds to, e.g. `0.0.0.0:8080`
    pub bind_addr: String,
    /// Externally visible base URL of this service (no trailing slash)
    pub site_url: String,
    /// Shared API key checked against `Authorization: Bearer <key>`
    pub api_key: String,
    /// Origins allowed by the CORS layer
    pub allowed_origins: Vec<String>,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
    pub pool_size: u32,
}

/// Identity provider (authorization-code + PKCE) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Base URL of the provider, e.g. `https://auth.example.org`
    pub api_url: String,
    pub client_id: String,
    pub client_secret: String,
    /// Scope requested in the authorize redirect
    pub scope: String,
    /// Timeout for the code exchange call
    pub exchange_timeout_secs: u64,
}

impl AuthConfig {
    /// Provider authorize endpoint.
    pub fn authorize_url(&self) -> String {
        format!("{}/authorize", self.api_url)
    }

    /// Provider identity exchange endpoint.
    pub fn exchange_url(&self) -> String {
        format!("{}/user", self.api_url)
    }
}

/// Membership lookup service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MembershipConfig {
    /// Endpoint answering "is this wikidot user a site member?"
    pub api_url: String,
    pub timeout_secs: u64,
}

/// Session store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Idle lifetime of a session entry, in seconds
    pub ttl_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { ttl_secs: DEFAULT_SESSION_TTL_SECS }
    }
}

impl Config {
    /// Redirect URI registered with the identity provider.
    pub fn redirect_uri(&self) -> String {
        format!("{}/v1/callback", self.server.site_url)
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            client_id: String::new(),
            client_secret: String::new(),
            scope: DEFAULT_PROVIDER_SCOPE.to_string(),
            exchange_timeout_secs: DEFAULT_EXCHANGE_TIMEOUT_SECS,
        }
    }
}

impl Default for MembershipConfig {
    fn default() -> Self {
        Self { api_url: String::new(), timeout_secs: DEFAULT_MEMBERSHIP_TIMEOUT_SECS }
    }
}
