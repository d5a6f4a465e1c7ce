//! Account link repository implementation
//!
//! The `(discord_id, wikidot_id)` primary key makes the store the
//! authority for concurrent double-inserts.

use std::sync::Arc;

use async_trait::async_trait;
use linker_core::links::ports::LinkRepository;
use linker_domain::{AccountLink, Result};
use rusqlite::{params, Row};
use tokio::task;

use super::manager::{map_sql_error, DbManager};
use super::map_join_error;

/// SQLite-backed implementation of [`LinkRepository`]
pub struct SqliteLinkRepository {
    db: Arc<DbManager>,
}

impl SqliteLinkRepository {
    /// Create a new repository instance
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LinkRepository for SqliteLinkRepository {
    async fn find(&self, discord_id: i64, wikidot_id: i64) -> Result<Option<AccountLink>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<Option<AccountLink>> {
            let conn = db.get_connection()?;

            let result = conn.query_row(
                "SELECT discord_id, wikidot_id, created_at, updated_at, unlinked_at
                 FROM account_links WHERE discord_id = ?1 AND wikidot_id = ?2",
                params![discord_id, wikidot_id],
                map_link_row,
            );

            match result {
                Ok(link) => Ok(Some(link)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(err) => Err(map_sql_error(err)),
            }
        })
        .await
        .map_err(map_join_error)?
    }

    async fn insert(&self, link: AccountLink) -> Result<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<()> {
            let conn = db.get_connection()?;
            conn.execute(
                "INSERT INTO account_links (discord_id, wikidot_id, created_at, updated_at, unlinked_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    link.discord_id,
                    link.wikidot_id,
                    link.created_at,
                    link.updated_at,
                    link.unlinked_at
                ],
            )
            .map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn set_unlinked_at(
        &self,
        discord_id: i64,
        wikidot_id: i64,
        unlinked_at: Option<i64>,
        updated_at: i64,
    ) -> Result<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<()> {
            let conn = db.get_connection()?;
            conn.execute(
                "UPDATE account_links SET unlinked_at = ?1, updated_at = ?2
                 WHERE discord_id = ?3 AND wikidot_id = ?4",
                params![unlinked_at, updated_at, discord_id, wikidot_id],
            )
            .map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn links_for_discord(
        &self,
        discord_id: i64,
        include_inactive: bool,
    ) -> Result<Vec<AccountLink>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<Vec<AccountLink>> {
            let conn = db.get_connection()?;
            let sql = if include_inactive {
                "SELECT discord_id, wikidot_id, created_at, updated_at, unlinked_at
                 FROM account_links WHERE discord_id = ?1 ORDER BY rowid"
            } else {
                "SELECT discord_id, wikidot_id, created_at, updated_at, unlinked_at
                 FROM account_links WHERE discord_id = ?1 AND unlinked_at IS NULL ORDER BY rowid"
            };

            let mut stmt = conn.prepare(sql).map_err(map_sql_error)?;
            let links = stmt
                .query_map(params![discord_id], map_link_row)
                .map_err(map_sql_error)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(map_sql_error)?;

            Ok(links)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn links_for_wikidot(
        &self,
        wikidot_id: i64,
        include_inactive: bool,
    ) -> Result<Vec<AccountLink>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<Vec<AccountLink>> {
            let conn = db.get_connection()?;
            let sql = if include_inactive {
                "SELECT discord_id, wikidot_id, created_at, updated_at, unlinked_at
                 FROM account_links WHERE wikidot_id = ?1 ORDER BY rowid"
            } else {
                "SELECT discord_id, wikidot_id, created_at, updated_at, unlinked_at
                 FROM account_links WHERE wikidot_id = ?1 AND unlinked_at IS NULL ORDER BY rowid"
            };

            let mut stmt = conn.prepare(sql).map_err(map_sql_error)?;
            let links = stmt
                .query_map(params![wikidot_id], map_link_row)
                .map_err(map_sql_error)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(map_sql_error)?;

            Ok(links)
        })
        .await
        .map_err(map_join_error)?
    }
}

fn map_link_row(row: &Row<'_>) -> rusqlite::Result<AccountLink> {
    Ok(AccountLink {
        discord_id: row.get(0)?,
        wikidot_id: row.get(1)?,
        created_at: row.get(2)?,
        updated_at: row.get(3)?,
        unlinked_at: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use linker_core::linking::ports::{DiscordAccountRepository, WikidotAccountRepository};
    use linker_domain::{DiscordAccount, WikidotAccount};
    use tempfile::TempDir;

    use super::super::{SqliteDiscordAccountRepository, SqliteWikidotAccountRepository};
    use super::*;

    async fn setup_linked_accounts() -> (Arc<DbManager>, TempDir) {
        let temp_dir = TempDir::new().expect("create temp dir");
        let db_path = temp_dir.path().join("test.db");
        let manager = DbManager::new(db_path.to_str().unwrap(), 4).expect("create db manager");
        manager.run_migrations().expect("run migrations");
        let db = Arc::new(manager);

        let now = Utc::now().timestamp();
        SqliteDiscordAccountRepository::new(Arc::clone(&db))
            .insert(DiscordAccount {
                discord_id: 1,
                username: "alice".into(),
                avatar: None,
                created_at: now,
                updated_at: now,
            })
            .await
            .expect("insert discord account");
        for wikidot_id in [100, 200] {
            SqliteWikidotAccountRepository::new(Arc::clone(&db))
                .insert(WikidotAccount {
                    wikidot_id,
                    username: format!("user-{wikidot_id}"),
                    unix_name: format!("user-{wikidot_id}"),
                    is_site_member: false,
                    created_at: now,
                    updated_at: now,
                })
                .await
                .expect("insert wikidot account");
        }

        (db, temp_dir)
    }

    fn link(discord_id: i64, wikidot_id: i64) -> AccountLink {
        let now = Utc::now().timestamp();
        AccountLink { discord_id, wikidot_id, created_at: now, updated_at: now, unlinked_at: None }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn insert_and_find() {
        let (db, _temp_dir) = setup_linked_accounts().await;
        let repo = SqliteLinkRepository::new(db);

        repo.insert(link(1, 100)).await.expect("insert link");

        let found = repo.find(1, 100).await.expect("find link").unwrap();
        assert!(found.is_active());
        assert!(repo.find(1, 999).await.expect("find link").is_none());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn duplicate_pair_violates_primary_key() {
        let (db, _temp_dir) = setup_linked_accounts().await;
        let repo = SqliteLinkRepository::new(db);

        repo.insert(link(1, 100)).await.expect("insert link");
        assert!(repo.insert(link(1, 100)).await.is_err());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn unlinked_rows_are_filtered_unless_requested() {
        let (db, _temp_dir) = setup_linked_accounts().await;
        let repo = SqliteLinkRepository::new(db);

        repo.insert(link(1, 100)).await.expect("insert link");
        repo.insert(link(1, 200)).await.expect("insert link");
        let now = Utc::now().timestamp();
        repo.set_unlinked_at(1, 200, Some(now), now).await.expect("unlink");

        assert_eq!(repo.links_for_discord(1, false).await.expect("active").len(), 1);
        assert_eq!(repo.links_for_discord(1, true).await.expect("all").len(), 2);

        assert!(repo.links_for_wikidot(200, false).await.expect("active").is_empty());
        assert_eq!(repo.links_for_wikidot(200, true).await.expect("all").len(), 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn clearing_unlinked_at_restores_the_row() {
        let (db, _temp_dir) = setup_linked_accounts().await;
        let repo = SqliteLinkRepository::new(db);

        repo.insert(link(1, 100)).await.expect("insert link");
        let now = Utc::now().timestamp();
        repo.set_unlinked_at(1, 100, Some(now), now).await.expect("unlink");
        repo.set_unlinked_at(1, 100, None, now + 1).await.expect("relink");

        let found = repo.find(1, 100).await.expect("find link").unwrap();
        assert!(found.is_active());
        assert_eq!(found.updated_at, now + 1);
    }
}
