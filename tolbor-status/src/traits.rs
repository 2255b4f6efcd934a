//! Store trait definition.

use crate::error::StoreResult;
use async_trait::async_trait;
use std::time::Duration;

/// Keyed store for payment-status records.
///
/// The contract is deliberately narrow (`put`, `get`, `remove`) so the
/// in-memory backend can be swapped for a shared, durable one (Redis, a
/// database table) without touching the callback receiver or the poller.
///
/// `put` is an unconditional overwrite: last write wins, with no merge
/// logic and no ordering guarantee against out-of-order delivery. That is
/// the documented behavior of the reconciliation flow, not an oversight.
#[async_trait]
pub trait StatusStore: Send + Sync {
    /// Overwrite the value at `key`. `ttl = None` keeps the entry for the
    /// life of the store.
    async fn put(&self, key: &str, value: String, ttl: Option<Duration>) -> StoreResult<()>;

    /// Get the value at `key`, or `None` if absent or expired.
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Delete the value at `key`. Used by test and manual flows only, not
    /// in steady-state operation.
    async fn remove(&self, key: &str) -> StoreResult<()>;

    /// Check whether `key` holds a live value.
    async fn exists(&self, key: &str) -> StoreResult<bool> {
        Ok(self.get(key).await?.is_some())
    }
}
