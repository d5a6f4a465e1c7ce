//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for the linker service
#[derive(Error, Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum LinkerError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Invalid link token: {0}")]
    InvalidToken(String),

    #[error("Invalid session: {0}")]
    InvalidSession(String),

    #[error("State mismatch: {0}")]
    StateMismatch(String),

    #[error("Unsupported code challenge method: {0}")]
    UnsupportedChallengeMethod(String),

    #[error("Upstream exchange failed: {0}")]
    UpstreamExchange(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for linker operations
pub type Result<T> = std::result::Result<T, LinkerError>;
