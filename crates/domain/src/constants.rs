//! Application constants
//!
//! Centralized location for domain-level constants used throughout the
//! service.

// Linking flow configuration
pub const LINK_TOKEN_TTL_SECS: i64 = 600;
pub const LINK_TOKEN_BYTES: usize = 32;
pub const CODE_VERIFIER_BYTES: usize = 32;
pub const DEFAULT_PROVIDER_SCOPE: &str = "identify";

// Session configuration
pub const SESSION_COOKIE_NAME: &str = "linker_session";
pub const DEFAULT_SESSION_TTL_SECS: u64 = 3600;

// External service defaults
pub const DEFAULT_EXCHANGE_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_MEMBERSHIP_TIMEOUT_SECS: u64 = 10;
pub const WIKIDOT_AVATAR_URL: &str = "https://www.wikidot.com/avatar.php?userid=";

// Shutdown behaviour
pub const REVALIDATION_DRAIN_TIMEOUT_SECS: u64 = 30;
