//! Port interface for link persistence

use async_trait::async_trait;
use linker_domain::{AccountLink, Result};

/// Persistence for account links
///
/// The `(discord_id, wikidot_id)` pair is unique across all time; the
/// store's uniqueness constraint is authoritative under concurrent
/// inserts.
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Find the row for a pair, active or not
    async fn find(&self, discord_id: i64, wikidot_id: i64) -> Result<Option<AccountLink>>;

    /// Insert a new link row
    async fn insert(&self, link: AccountLink) -> Result<()>;

    /// Stamp or clear `unlinked_at` on an existing row
    async fn set_unlinked_at(
        &self,
        discord_id: i64,
        wikidot_id: i64,
        unlinked_at: Option<i64>,
        updated_at: i64,
    ) -> Result<()>;

    /// Links for a Discord account, insertion order
    async fn links_for_discord(
        &self,
        discord_id: i64,
        include_inactive: bool,
    ) -> Result<Vec<AccountLink>>;

    /// Links for a Wikidot account, insertion order
    async fn links_for_wikidot(
        &self,
        wikidot_id: i64,
        include_inactive: bool,
    ) -> Result<Vec<AccountLink>>;
}
