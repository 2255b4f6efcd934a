//! In-memory store backend.

use crate::error::StoreResult;
use crate::traits::StatusStore;
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Process-local store backed by a `HashMap`.
///
/// Entries written without a TTL live as long as the process; a multi-
/// instance deployment needs a shared backend behind [`StatusStore`]
/// instead. Expired entries are evicted lazily on read.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Entry>>,
}

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| at <= Instant::now())
    }
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries (test/diagnostic use)
    pub async fn len(&self) -> usize {
        let entries = self.entries.read().await;
        entries.values().filter(|e| !e.is_expired()).count()
    }

    /// Whether the store holds no live entries
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl StatusStore for MemoryStore {
    async fn put(&self, key: &str, value: String, ttl: Option<Duration>) -> StoreResult<()> {
        let entry = Entry {
            value,
            expires_at: ttl.map(|ttl| Instant::now() + ttl),
        };
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), entry);
        Ok(())
    }

    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                None => return Ok(None),
                Some(entry) if !entry.is_expired() => return Ok(Some(entry.value.clone())),
                Some(_) => {}
            }
        }

        // Expired: evict under the write lock, re-checking in case of a
        // racing overwrite
        let mut entries = self.entries.write().await;
        if entries.get(key).is_some_and(|e| e.is_expired()) {
            entries.remove(key);
        }
        Ok(entries.get(key).map(|e| e.value.clone()))
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        let mut entries = self.entries.write().await;
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_returns_last_put() {
        let store = MemoryStore::new();
        store.put("INV-1", "first".into(), None).await.unwrap();
        store.put("INV-1", "second".into(), None).await.unwrap();

        assert_eq!(store.get("INV-1").await.unwrap().as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let store = MemoryStore::new();
        assert!(store.get("INV-404").await.unwrap().is_none());
        assert!(!store.exists("INV-404").await.unwrap());
    }

    #[tokio::test]
    async fn test_remove_deletes() {
        let store = MemoryStore::new();
        store.put("INV-1", "record".into(), None).await.unwrap();
        store.remove("INV-1").await.unwrap();

        assert!(store.get("INV-1").await.unwrap().is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_ttl_evicts() {
        let store = MemoryStore::new();
        store
            .put("INV-1", "record".into(), Some(Duration::from_millis(10)))
            .await
            .unwrap();
        assert!(store.exists("INV-1").await.unwrap());

        tokio::time::sleep(Duration::from_millis(25)).await;
        assert!(store.get("INV-1").await.unwrap().is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_overwrite_resets_ttl() {
        let store = MemoryStore::new();
        store
            .put("INV-1", "short".into(), Some(Duration::from_millis(10)))
            .await
            .unwrap();
        store.put("INV-1", "kept".into(), None).await.unwrap();

        tokio::time::sleep(Duration::from_millis(25)).await;
        assert_eq!(store.get("INV-1").await.unwrap().as_deref(), Some("kept"));
    }
}
