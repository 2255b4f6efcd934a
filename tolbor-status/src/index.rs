//! Typed, prefixed view over a status store.

use crate::error::{StoreError, StoreResult};
use crate::traits::StatusStore;
use serde::{Serialize, de::DeserializeOwned};
use std::sync::Arc;
use std::time::Duration;

/// Typed index over a [`StatusStore`], prefixing every key.
///
/// Several indexes can share one backend: the reconciliation flow keeps
/// payment records under `payment:` and checkout contexts under
/// `checkout:` in the same store.
pub struct StatusIndex<S: StatusStore> {
    store: Arc<S>,
    prefix: String,
}

impl<S: StatusStore> Clone for StatusIndex<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            prefix: self.prefix.clone(),
        }
    }
}

impl<S: StatusStore> StatusIndex<S> {
    /// Create an index over `store` with the given key prefix
    pub fn new(store: Arc<S>, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into(),
        }
    }

    fn build_key(&self, key: &str) -> String {
        format!("{}:{}", self.prefix, key)
    }

    /// Overwrite the value at `key`. Last write wins.
    pub async fn put<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        ttl: Option<Duration>,
    ) -> StoreResult<()> {
        let json = serde_json::to_string(value)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.store.put(&self.build_key(key), json, ttl).await
    }

    /// Get the value at `key`, or `None` if absent
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> StoreResult<Option<T>> {
        match self.store.get(&self.build_key(key)).await? {
            Some(json) => {
                let value = serde_json::from_str(&json)
                    .map_err(|e| StoreError::Deserialization(e.to_string()))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Delete the value at `key`
    pub async fn remove(&self, key: &str) -> StoreResult<()> {
        self.store.remove(&self.build_key(key)).await
    }

    /// Check whether `key` holds a value
    pub async fn exists(&self, key: &str) -> StoreResult<bool> {
        self.store.exists(&self.build_key(key)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Record {
        status: String,
    }

    #[tokio::test]
    async fn test_typed_roundtrip() {
        let index = StatusIndex::new(Arc::new(MemoryStore::new()), "payment");
        index
            .put(
                "INV-1",
                &Record {
                    status: "PAID".into(),
                },
                None,
            )
            .await
            .unwrap();

        let record: Option<Record> = index.get("INV-1").await.unwrap();
        assert_eq!(
            record,
            Some(Record {
                status: "PAID".into()
            })
        );
    }

    #[tokio::test]
    async fn test_prefixes_keep_indexes_apart() {
        let store = Arc::new(MemoryStore::new());
        let payments = StatusIndex::new(Arc::clone(&store), "payment");
        let checkouts = StatusIndex::new(Arc::clone(&store), "checkout");

        payments
            .put(
                "INV-1",
                &Record {
                    status: "PAID".into(),
                },
                None,
            )
            .await
            .unwrap();

        assert!(payments.exists("INV-1").await.unwrap());
        assert!(!checkouts.exists("INV-1").await.unwrap());
        assert_eq!(payments.build_key("INV-1"), "payment:INV-1");
    }

    #[tokio::test]
    async fn test_corrupt_value_is_deserialization_error() {
        let store = Arc::new(MemoryStore::new());
        store
            .put("payment:INV-1", "not json".into(), None)
            .await
            .unwrap();

        let index = StatusIndex::new(store, "payment");
        let err = index.get::<Record>("INV-1").await.unwrap_err();
        assert!(matches!(err, StoreError::Deserialization(_)));
    }
}
