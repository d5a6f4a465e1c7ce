//! Account types for both sides of a link
//!
//! Discord accounts are created on first reference during a linking flow;
//! Wikidot accounts on the first successful provider exchange. Neither is
//! ever hard-deleted.

use serde::{Deserialize, Serialize};

/// Discord account stored in the local database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscordAccount {
    pub discord_id: i64,
    pub username: String,
    pub avatar: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Discord profile data as supplied by the bot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscordProfile {
    pub id: i64,
    pub username: String,
    pub avatar: Option<String>,
}

/// Wikidot account stored in the local database
///
/// `is_site_member` is refreshed from the external membership service,
/// independent of the linking protocol itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WikidotAccount {
    pub wikidot_id: i64,
    pub username: String,
    pub unix_name: String,
    pub is_site_member: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Wikidot identity as returned by the provider exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WikidotProfile {
    pub id: i64,
    pub username: String,
    pub unix_name: String,
}
