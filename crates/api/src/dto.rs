//! Wire schemas for the JSON API
//!
//! Discord ids travel as strings on the wire (snowflakes overflow common
//! JSON number handling) and are parsed into i64 at the boundary.

use std::collections::BTreeMap;

use linker_domain::{
    AccountLink, DiscordAccount, DiscordProfile, LinkerError, Result, WikidotAccount,
};
use serde::{Deserialize, Serialize};

/// Parse a wire-side id string into a numeric handle.
pub fn parse_id(raw: &str) -> Result<i64> {
    raw.parse().map_err(|_| LinkerError::InvalidInput(format!("invalid id: {raw}")))
}

/// Discord profile as supplied by the bot
#[derive(Debug, Clone, Deserialize)]
pub struct DiscordProfileDto {
    pub id: String,
    pub username: String,
    pub avatar: Option<String>,
}

impl DiscordProfileDto {
    /// Convert into the domain profile, validating the id.
    pub fn into_profile(self) -> Result<DiscordProfile> {
        Ok(DiscordProfile { id: parse_id(&self.id)?, username: self.username, avatar: self.avatar })
    }
}

/// Discord account as returned to the bot
#[derive(Debug, Clone, Serialize)]
pub struct DiscordDto {
    pub id: String,
    pub username: String,
    pub avatar: Option<String>,
}

impl From<&DiscordAccount> for DiscordDto {
    fn from(account: &DiscordAccount) -> Self {
        Self {
            id: account.discord_id.to_string(),
            username: account.username.clone(),
            avatar: account.avatar.clone(),
        }
    }
}

/// Wikidot account with its membership attribute
#[derive(Debug, Clone, Serialize)]
pub struct WikidotMemberDto {
    pub id: i64,
    pub username: String,
    pub unix_name: String,
    pub is_site_member: bool,
}

impl From<&WikidotAccount> for WikidotMemberDto {
    fn from(account: &WikidotAccount) -> Self {
        Self {
            id: account.wikidot_id,
            username: account.username.clone(),
            unix_name: account.unix_name.clone(),
            is_site_member: account.is_site_member,
        }
    }
}

/// Wikidot account plus the timestamps of the link row, for management
/// listings
#[derive(Debug, Clone, Serialize)]
pub struct WikidotManageDto {
    pub id: i64,
    pub username: String,
    pub unix_name: String,
    pub is_site_member: bool,
    pub created_at: i64,
    pub updated_at: i64,
    pub unlinked_at: Option<i64>,
}

impl WikidotManageDto {
    pub fn from_link(account: &WikidotAccount, link: &AccountLink) -> Self {
        Self {
            id: account.wikidot_id,
            username: account.username.clone(),
            unix_name: account.unix_name.clone(),
            is_site_member: account.is_site_member,
            created_at: link.created_at,
            updated_at: link.updated_at,
            unlinked_at: link.unlinked_at,
        }
    }
}

/// Discord account plus the timestamps of the link row, for management
/// listings
#[derive(Debug, Clone, Serialize)]
pub struct DiscordManageDto {
    pub id: String,
    pub username: String,
    pub avatar: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
    pub unlinked_at: Option<i64>,
}

impl DiscordManageDto {
    pub fn from_link(account: &DiscordAccount, link: &AccountLink) -> Self {
        Self {
            id: account.discord_id.to_string(),
            username: account.username.clone(),
            avatar: account.avatar.clone(),
            created_at: link.created_at,
            updated_at: link.updated_at,
            unlinked_at: link.unlinked_at,
        }
    }
}

/* -------------------------------------------------------------------------- */
/* Request / response bodies */
/* -------------------------------------------------------------------------- */

#[derive(Debug, Deserialize)]
pub struct FlowStartRequest {
    pub discord: DiscordProfileDto,
}

#[derive(Debug, Serialize)]
pub struct FlowStartResponse {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct RecheckRequest {
    pub discord: DiscordProfileDto,
}

#[derive(Debug, Serialize)]
pub struct RecheckResponse {
    pub discord: DiscordDto,
    pub wikidot: Vec<WikidotMemberDto>,
}

#[derive(Debug, Deserialize)]
pub struct ListRequest {
    pub discord_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct AccountsFromDiscord {
    pub discord: DiscordDto,
    pub wikidot: Vec<WikidotMemberDto>,
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub result: BTreeMap<String, AccountsFromDiscord>,
}

#[derive(Debug, Serialize)]
pub struct ListDiscordItem {
    pub discord: DiscordDto,
    pub wikidot: Vec<WikidotManageDto>,
}

#[derive(Debug, Serialize)]
pub struct ListDiscordResponse {
    pub result: Vec<ListDiscordItem>,
}

#[derive(Debug, Serialize)]
pub struct ListWikidotItem {
    pub discord: Vec<DiscordManageDto>,
    pub wikidot: WikidotMemberDto,
}

#[derive(Debug, Serialize)]
pub struct ListWikidotResponse {
    pub result: Vec<ListWikidotItem>,
}

#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub result: bool,
}

/* -------------------------------------------------------------------------- */
/* Query strings */
/* -------------------------------------------------------------------------- */

#[derive(Debug, Deserialize)]
pub struct AuthQuery {
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: String,
    pub state: String,
}

#[derive(Debug, Deserialize)]
pub struct LinkPairQuery {
    pub discord_id: String,
    pub wikidot_id: String,
}

#[derive(Debug, Deserialize)]
pub struct IncludeInactiveQuery {
    #[serde(default)]
    pub include_inactive: bool,
}
