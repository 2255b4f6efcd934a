//! Entitlement grants.
//!
//! The consistency boundary between payment and access: a purchase exists
//! only because a PAID payment record was observed for its invoice. The
//! platform's database-backed sink lives behind [`EntitlementSink`]; the
//! in-memory implementation here serves tests and single-instance runs.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// What was purchased
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub kind: ItemKind,
    pub id: String,
}

/// Purchasable content kinds on the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Course,
    Test,
}

impl ItemKind {
    /// Lowercase name, matching the wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Course => "course",
            Self::Test => "test",
        }
    }
}

/// A recorded entitlement: user, item, and the payment that granted it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Purchase {
    pub user_id: String,
    pub item: Item,
    pub invoice_id: String,
    pub payment_id: String,
    pub purchased_at: DateTime<Utc>,
}

/// Sink for entitlement grants.
///
/// Implementations must be idempotent per invoice: the gateway retries
/// callbacks, and a duplicate PAID delivery must not double-grant.
#[async_trait]
pub trait EntitlementSink: Send + Sync {
    /// Record a purchase. Returns `true` if the grant was new, `false` if
    /// the invoice was already granted.
    async fn grant(&self, purchase: Purchase) -> Result<bool, String>;

    /// Whether an invoice has already produced a grant
    async fn granted(&self, invoice_id: &str) -> bool;
}

/// In-memory entitlement sink
#[derive(Debug, Default)]
pub struct MemoryEntitlements {
    purchases: RwLock<Vec<Purchase>>,
}

impl MemoryEntitlements {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of recorded purchases (test/diagnostic use)
    pub async fn purchases(&self) -> Vec<Purchase> {
        self.purchases.read().await.clone()
    }
}

#[async_trait]
impl EntitlementSink for MemoryEntitlements {
    async fn grant(&self, purchase: Purchase) -> Result<bool, String> {
        let mut purchases = self.purchases.write().await;
        if purchases
            .iter()
            .any(|p| p.invoice_id == purchase.invoice_id)
        {
            return Ok(false);
        }
        purchases.push(purchase);
        Ok(true)
    }

    async fn granted(&self, invoice_id: &str) -> bool {
        self.purchases
            .read()
            .await
            .iter()
            .any(|p| p.invoice_id == invoice_id)
    }
}
