//! Link registry - idempotent create/unlink/relink semantics

use std::sync::Arc;

use chrono::Utc;
use linker_domain::{AccountLink, Result};

use super::ports::LinkRepository;

/// Registry for `(discord, wikidot)` associations
///
/// A link row is reused across unlink/relink cycles rather than
/// duplicated; "already in the desired state" is a no-op, never an error.
pub struct LinkRegistry {
    links: Arc<dyn LinkRepository>,
}

impl LinkRegistry {
    /// Create a new registry over a link repository
    pub fn new(links: Arc<dyn LinkRepository>) -> Self {
        Self { links }
    }

    /// Create a link, or restore a previously unlinked one.
    ///
    /// Returns the created/restored link, or `None` when the pair is
    /// already actively linked. The check-then-act window here is narrow
    /// and resolved by the store's uniqueness constraint under true
    /// concurrency.
    pub async fn create_or_restore(
        &self,
        discord_id: i64,
        wikidot_id: i64,
    ) -> Result<Option<AccountLink>> {
        let now = Utc::now().timestamp();

        match self.links.find(discord_id, wikidot_id).await? {
            None => {
                let link = AccountLink {
                    discord_id,
                    wikidot_id,
                    created_at: now,
                    updated_at: now,
                    unlinked_at: None,
                };
                self.links.insert(link.clone()).await?;
                Ok(Some(link))
            }
            Some(link) if link.is_active() => Ok(None),
            Some(mut link) => {
                self.links.set_unlinked_at(discord_id, wikidot_id, None, now).await?;
                link.unlinked_at = None;
                link.updated_at = now;
                Ok(Some(link))
            }
        }
    }

    /// Deactivate a link.
    ///
    /// Returns `false` when no row exists for the pair. An already
    /// unlinked row is restamped with the current time, not treated as an
    /// error.
    pub async fn unlink(&self, discord_id: i64, wikidot_id: i64) -> Result<bool> {
        let now = Utc::now().timestamp();

        match self.links.find(discord_id, wikidot_id).await? {
            None => Ok(false),
            Some(_) => {
                self.links.set_unlinked_at(discord_id, wikidot_id, Some(now), now).await?;
                Ok(true)
            }
        }
    }

    /// Reactivate a previously unlinked pair.
    ///
    /// Returns `false` when no row exists or the row is already active.
    pub async fn relink(&self, discord_id: i64, wikidot_id: i64) -> Result<bool> {
        let now = Utc::now().timestamp();

        match self.links.find(discord_id, wikidot_id).await? {
            Some(link) if !link.is_active() => {
                self.links.set_unlinked_at(discord_id, wikidot_id, None, now).await?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Currently active links for a Discord account
    pub async fn active_links_for(&self, discord_id: i64) -> Result<Vec<AccountLink>> {
        self.links.links_for_discord(discord_id, false).await
    }

    /// All links for a Discord account, optionally including unlinked rows
    pub async fn links_for(
        &self,
        discord_id: i64,
        include_inactive: bool,
    ) -> Result<Vec<AccountLink>> {
        self.links.links_for_discord(discord_id, include_inactive).await
    }

    /// All links for a Wikidot account, optionally including unlinked rows
    pub async fn links_for_wikidot(
        &self,
        wikidot_id: i64,
        include_inactive: bool,
    ) -> Result<Vec<AccountLink>> {
        self.links.links_for_wikidot(wikidot_id, include_inactive).await
    }
}
