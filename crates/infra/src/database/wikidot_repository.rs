//! Wikidot account repository implementation

use std::sync::Arc;

use async_trait::async_trait;
use linker_core::linking::ports::WikidotAccountRepository;
use linker_domain::{Result, WikidotAccount};
use rusqlite::{params, Row};
use tokio::task;

use super::manager::{map_sql_error, DbManager};
use super::map_join_error;

/// SQLite-backed implementation of [`WikidotAccountRepository`]
pub struct SqliteWikidotAccountRepository {
    db: Arc<DbManager>,
}

impl SqliteWikidotAccountRepository {
    /// Create a new repository instance
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl WikidotAccountRepository for SqliteWikidotAccountRepository {
    async fn get(&self, wikidot_id: i64) -> Result<Option<WikidotAccount>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<Option<WikidotAccount>> {
            let conn = db.get_connection()?;

            let result = conn.query_row(
                "SELECT wikidot_id, username, unix_name, is_site_member, created_at, updated_at
                 FROM wikidot_accounts WHERE wikidot_id = ?1",
                params![wikidot_id],
                map_wikidot_row,
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

    async fn insert(&self, account: WikidotAccount) -> Result<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<()> {
            let conn = db.get_connection()?;
            conn.execute(
                "INSERT INTO wikidot_accounts (wikidot_id, username, unix_name, is_site_member, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    account.wikidot_id,
                    account.username,
                    account.unix_name,
                    i64::from(account.is_site_member),
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

    async fn update(&self, account: WikidotAccount) -> Result<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<()> {
            let conn = db.get_connection()?;
            conn.execute(
                "UPDATE wikidot_accounts SET username = ?1, unix_name = ?2, is_site_member = ?3, updated_at = ?4
                 WHERE wikidot_id = ?5",
                params![
                    account.username,
                    account.unix_name,
                    i64::from(account.is_site_member),
                    account.updated_at,
                    account.wikidot_id
                ],
            )
            .map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn list_all(&self) -> Result<Vec<WikidotAccount>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<Vec<WikidotAccount>> {
            let conn = db.get_connection()?;
            let mut stmt = conn
                .prepare(
                    "SELECT wikidot_id, username, unix_name, is_site_member, created_at, updated_at
                     FROM wikidot_accounts ORDER BY rowid",
                )
                .map_err(map_sql_error)?;

            let accounts = stmt
                .query_map([], map_wikidot_row)
                .map_err(map_sql_error)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(map_sql_error)?;

            Ok(accounts)
        })
        .await
        .map_err(map_join_error)?
    }
}

fn map_wikidot_row(row: &Row<'_>) -> rusqlite::Result<WikidotAccount> {
    let is_site_member: i64 = row.get(3)?;
    Ok(WikidotAccount {
        wikidot_id: row.get(0)?,
        username: row.get(1)?,
        unix_name: row.get(2)?,
        is_site_member: is_site_member != 0,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}
