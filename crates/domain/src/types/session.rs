//! Session-scoped state for the linking flow
//!
//! A session key maps to exactly one [`SessionValue`]. The value is an
//! explicit tagged union serialized with a fixed tag enumeration; there is
//! no dynamic name-to-type registry involved in decoding.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::LinkerError;

/// PKCE code challenge transformation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CodeChallengeMethod {
    /// Challenge equals the verifier
    Plain,
    /// Challenge is base64url(SHA-256(verifier)), RFC 7636 §4.2
    S256,
}

impl CodeChallengeMethod {
    /// Wire representation used in authorize URLs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::S256 => "S256",
        }
    }
}

impl fmt::Display for CodeChallengeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CodeChallengeMethod {
    type Err = LinkerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plain" => Ok(Self::Plain),
            "S256" => Ok(Self::S256),
            other => Err(LinkerError::UnsupportedChallengeMethod(other.to_string())),
        }
    }
}

/// In-flight PKCE/linking context tied to one authorization-code exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingAuth {
    pub discord_id: i64,
    pub code_verifier: String,
    pub code_challenge_method: CodeChallengeMethod,
    pub state: String,
}

/// The single tagged value stored per session key
///
/// Only two shapes exist: no pending auth, or one [`PendingAuth`]. The
/// serde tag is serialized alongside the payload and selects the shape on
/// decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum SessionValue {
    Empty,
    PendingAuth(PendingAuth),
}

impl SessionValue {
    /// Extract the pending auth context, if one is set.
    pub fn pending_auth(&self) -> Option<&PendingAuth> {
        match self {
            Self::PendingAuth(ctx) => Some(ctx),
            Self::Empty => None,
        }
    }
}

impl Default for SessionValue {
    fn default() -> Self {
        Self::Empty
    }
}
