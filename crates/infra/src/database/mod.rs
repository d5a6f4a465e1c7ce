//! SQLite-backed repository implementations.

pub mod discord_repository;
pub mod link_repository;
pub mod manager;
pub mod token_repository;
pub mod wikidot_repository;

pub use discord_repository::SqliteDiscordAccountRepository;
pub use link_repository::SqliteLinkRepository;
pub use manager::{DbConnection, DbManager};
pub use token_repository::SqliteLinkTokenRepository;
pub use wikidot_repository::SqliteWikidotAccountRepository;

use linker_domain::LinkerError;
use tokio::task;

pub(crate) fn map_join_error(err: task::JoinError) -> LinkerError {
    LinkerError::Internal(format!("task join error: {err}"))
}
