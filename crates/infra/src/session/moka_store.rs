//! TTL-backed session store
//!
//! Values are serialized as the tagged JSON form of
//! [`linker_domain::SessionValue`], mirroring what a networked session
//! backend would hold. Entries expire after the configured idle TTL; the
//! api layer re-touches the session on every browser request.

use std::time::Duration;

use async_trait::async_trait;
use linker_core::linking::ports::SessionStore;
use linker_domain::{LinkerError, Result, SessionValue};
use moka::future::Cache;

/// In-process session store with idle expiry
pub struct MokaSessionStore {
    cache: Cache<String, String>,
}

impl MokaSessionStore {
    /// Create a store whose entries expire after `ttl` of inactivity.
    pub fn new(ttl: Duration) -> Self {
        let cache = Cache::builder().time_to_idle(ttl).build();
        Self { cache }
    }
}

#[async_trait]
impl SessionStore for MokaSessionStore {
    async fn get(&self, key: &str) -> Result<Option<SessionValue>> {
        match self.cache.get(key).await {
            Some(raw) => {
                let value = serde_json::from_str(&raw).map_err(|err| {
                    LinkerError::Internal(format!("corrupt session payload: {err}"))
                })?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: SessionValue) -> Result<()> {
        let raw = serde_json::to_string(&value)
            .map_err(|err| LinkerError::Internal(format!("session serialization failed: {err}")))?;
        self.cache.insert(key.to_string(), raw).await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.cache.invalidate(key).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use linker_domain::{CodeChallengeMethod, PendingAuth};

    use super::*;

    fn pending() -> SessionValue {
        SessionValue::PendingAuth(PendingAuth {
            discord_id: 42,
            code_verifier: "verifier".into(),
            code_challenge_method: CodeChallengeMethod::S256,
            state: "token".into(),
        })
    }

    #[tokio::test]
    async fn set_then_get_round_trips() {
        let store = MokaSessionStore::new(Duration::from_secs(60));

        store.set("key", pending()).await.unwrap();
        let value = store.get("key").await.unwrap().unwrap();
        assert_eq!(value, pending());
    }

    #[tokio::test]
    async fn missing_key_returns_none() {
        let store = MokaSessionStore::new(Duration::from_secs(60));
        assert!(store.get("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_removes_the_value() {
        let store = MokaSessionStore::new(Duration::from_secs(60));

        store.set("key", pending()).await.unwrap();
        store.delete("key").await.unwrap();
        assert!(store.get("key").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn overwrite_replaces_the_value() {
        let store = MokaSessionStore::new(Duration::from_secs(60));

        store.set("key", pending()).await.unwrap();
        store.set("key", SessionValue::Empty).await.unwrap();

        let value = store.get("key").await.unwrap().unwrap();
        assert!(value.pending_auth().is_none());
    }
}
