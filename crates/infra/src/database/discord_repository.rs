//! Discord account repository implementation

use std::sync::Arc;

use async_trait::async_trait;
use linker_core::linking::ports::DiscordAccountRepository;
use linker_domain::{DiscordAccount, Result};
use rusqlite::{params, Row};
use tokio::task;

use super::manager::{map_sql_error, DbManager};
use super::map_join_error;

/// SQLite-backed implementation of [`DiscordAccountRepository`]
pub struct SqliteDiscordAccountRepository {
    db: Arc<DbManager>,
}

impl SqliteDiscordAccountRepository {
    /// Create a new repository instance
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DiscordAccountRepository for SqliteDiscordAccountRepository {
    async fn get(&self, discord_id: i64) -> Result<Option<DiscordAccount>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<Option<DiscordAccount>> {
            let conn = db.get_connection()?;

            let result = conn.query_row(
                "SELECT discord_id, username, avatar, created_at, updated_at
                 FROM discord_accounts WHERE discord_id = ?1",
                params![discord_id],
                map_discord_row,
            );

            match result {
                Ok(account) => Ok(Some(account)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(err) => Err(map_sql_error(err)),
            }
        })
        .await
        .map_err(map_join_error)?
    }

    async fn insert(&self, account: DiscordAccount) -> Result<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<()> {
            let conn = db.get_connection()?;
            conn.execute(
                "INSERT INTO discord_accounts (discord_id, username, avatar, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    account.discord_id,
                    account.username,
                    account.avatar,
                    account.created_at,
                    account.updated_at
                ],
            )
            .map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn update(&self, account: DiscordAccount) -> Result<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<()> {
            let conn = db.get_connection()?;
            conn.execute(
                "UPDATE discord_accounts SET username = ?1, avatar = ?2, updated_at = ?3
                 WHERE discord_id = ?4",
                params![account.username, account.avatar, account.updated_at, account.discord_id],
            )
            .map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn list_all(&self) -> Result<Vec<DiscordAccount>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<Vec<DiscordAccount>> {
            let conn = db.get_connection()?;
            let mut stmt = conn
                .prepare(
                    "SELECT discord_id, username, avatar, created_at, updated_at
                     FROM discord_accounts ORDER BY rowid",
                )
                .map_err(map_sql_error)?;

            let accounts = stmt
                .query_map([], map_discord_row)
                .map_err(map_sql_error)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(map_sql_error)?;

            Ok(accounts)
        })
        .await
        .map_err(map_join_error)?
    }
}

fn map_discord_row(row: &Row<'_>) -> rusqlite::Result<DiscordAccount> {
    Ok(DiscordAccount {
        discord_id: row.get(0)?,
        username: row.get(1)?,
        avatar: row.get(2)?,
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
    })
}
