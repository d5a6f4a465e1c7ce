//! Link token repository implementation
//!
//! Expiry is enforced in the query: a token row only resolves while its
//! `created_at` lies strictly after the caller's cutoff. Unknown and
//! expired tokens are indistinguishable.

use std::sync::Arc;

use async_trait::async_trait;
use linker_core::linking::ports::LinkTokenRepository;
use linker_domain::{LinkToken, Result};
use rusqlite::{params, Row};
use tokio::task;

use super::manager::{map_sql_error, DbManager};
use super::map_join_error;

/// SQLite-backed implementation of [`LinkTokenRepository`]
pub struct SqliteLinkTokenRepository {
    db: Arc<DbManager>,
}

impl SqliteLinkTokenRepository {
    /// Create a new repository instance
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LinkTokenRepository for SqliteLinkTokenRepository {
    async fn insert(&self, token: LinkToken) -> Result<()> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> Result<()> {
            let conn = db.get_connection()?;
            conn.execute(
                "INSERT INTO link_tokens (token, discord_id, created_at) VALUES (?1, ?2, ?3)",
                params![token.token, token.discord_id, token.created_at],
            )
            .map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn find_created_after(&self, token: &str, cutoff: i64) -> Result<Option<LinkToken>> {
        let db = Arc::clone(&self.db);
        let token = token.to_string();

        task::spawn_blocking(move || -> Result<Option<LinkToken>> {
            let conn = db.get_connection()?;

            let result = conn.query_row(
                "SELECT token, discord_id, created_at
                 FROM link_tokens WHERE token = ?1 AND created_at > ?2",
                params![token, cutoff],
                map_token_row,
            );

            match result {
                Ok(row) => Ok(Some(row)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(err) => Err(map_sql_error(err)),
            }
        })
        .await
        .map_err(map_join_error)?
    }
}

fn map_token_row(row: &Row<'_>) -> rusqlite::Result<LinkToken> {
    Ok(LinkToken { token: row.get(0)?, discord_id: row.get(1)?, created_at: row.get(2)? })
}
