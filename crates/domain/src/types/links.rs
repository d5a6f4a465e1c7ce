//! Link and link-token types

use serde::{Deserialize, Serialize};

/// Durable, soft-deletable association between a Discord account and a
/// Wikidot account.
///
/// One row exists per `(discord_id, wikidot_id)` pair across all time;
/// the row is reused across unlink/relink cycles. The link is active iff
/// `unlinked_at` is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountLink {
    pub discord_id: i64,
    pub wikidot_id: i64,
    pub created_at: i64,
    pub updated_at: i64,
    pub unlinked_at: Option<i64>,
}

impl AccountLink {
    /// Whether the association is currently in force.
    pub fn is_active(&self) -> bool {
        self.unlinked_at.is_none()
    }
}

/// Short-lived credential authorizing one linking attempt for a specific
/// Discord account.
///
/// Valid while `now - created_at` is below the token TTL. Consumption is
/// not tracked; a token stays usable until it expires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkToken {
    pub token: String,
    pub discord_id: i64,
    pub created_at: i64,
}
