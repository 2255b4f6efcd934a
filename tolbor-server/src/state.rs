//! Shared application state

use crate::config::Config;
use crate::entitlements::EntitlementSink;
use crate::signature::CallbackVerifier;
use secrecy::ExposeSecret;
use std::sync::Arc;
use std::time::Duration;
use tolbor_qpay::{QPayClient, QPayConfig, QPayResult};
use tolbor_status::{MemoryStore, StatusIndex};

/// Everything the handlers share. Cheap to clone; all heavy parts are
/// behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Gateway client
    pub gateway: Arc<QPayClient>,
    /// Latest payment record per invoice, written by the callback
    /// receiver, read by the poller
    pub records: StatusIndex<MemoryStore>,
    /// Checkout context per invoice, written at invoice creation, read by
    /// the callback receiver to grant entitlement
    pub checkouts: StatusIndex<MemoryStore>,
    /// Entitlement sink
    pub entitlements: Arc<dyn EntitlementSink>,
    /// Callback signature verifier
    pub verifier: CallbackVerifier,
    /// URL the gateway calls back on
    pub callback_url: String,
    /// TTL applied to stored records and checkout contexts
    pub record_ttl: Option<Duration>,
    /// Retry hint for pollers when no record exists yet
    pub retry_after_ms: u64,
}

impl AppState {
    /// Build state from configuration with the in-memory store and sink
    pub fn from_config(
        config: &Config,
        entitlements: Arc<dyn EntitlementSink>,
    ) -> QPayResult<Self> {
        let gateway = QPayClient::new(QPayConfig::new(
            config.gateway_base_url.clone(),
            config.gateway_username.clone(),
            config.gateway_password.expose_secret().to_string(),
            config.invoice_code.clone(),
        ))?;

        let store = Arc::new(MemoryStore::new());
        Ok(Self {
            gateway: Arc::new(gateway),
            records: StatusIndex::new(Arc::clone(&store), "payment"),
            checkouts: StatusIndex::new(store, "checkout"),
            entitlements,
            verifier: CallbackVerifier::new(config.callback_secret.clone())
                .with_tolerance(config.signature_tolerance_secs),
            callback_url: config.callback_url(),
            record_ttl: config.record_ttl,
            retry_after_ms: config.retry_after_ms,
        })
    }
}
