//! Callback receiver: the gateway's asynchronous payment notification.
//!
//! Per invoice this is a two-state machine, unseen to recorded. A well-
//! formed, authenticated payload transitions it by overwriting the status
//! store entry; anything else leaves state untouched. The overwrite is
//! last-write-wins with no ordering guarantee: a stale PENDING retry
//! arriving after PAID regresses the observable state. That gap is
//! documented and pinned by tests, pending a product decision on merge
//! policy.

use crate::checkout::CheckoutContext;
use crate::entitlements::Purchase;
use crate::error::ApiError;
use crate::signature::SIGNATURE_HEADER;
use crate::state::AppState;
use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use chrono::Utc;
use serde::Serialize;
use tolbor_qpay::PaymentRecord;
use tracing::{info, warn};

/// Acknowledgement returned to the gateway
#[derive(Debug, Serialize)]
pub struct CallbackAck {
    pub recorded: bool,
}

pub async fn callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<CallbackAck>, ApiError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok());
    state.verifier.verify(&body, signature)?;

    // payment_id, payment_status and object_id are required fields;
    // deserialization rejects a payload missing any of them
    let record: PaymentRecord = serde_json::from_slice(&body)
        .map_err(|e| ApiError::Validation(e.to_string()))?;
    if record.payment_id.is_empty() || record.invoice_id.is_empty() {
        return Err(ApiError::Validation(
            "payment_id and object_id must be non-empty".into(),
        ));
    }

    state
        .records
        .put(&record.invoice_id, &record, state.record_ttl)
        .await?;
    info!(
        invoice_id = %record.invoice_id,
        payment_id = %record.payment_id,
        status = ?record.status,
        "payment recorded"
    );

    if record.status.is_paid() {
        grant_entitlement(&state, &record).await?;
    }

    Ok(Json(CallbackAck { recorded: true }))
}

/// Grant access for a PAID record, once per invoice.
///
/// A PAID callback without a stored checkout context is recorded (the
/// poller must still see it) but cannot grant anything.
async fn grant_entitlement(state: &AppState, record: &PaymentRecord) -> Result<(), ApiError> {
    let Some(context) = state
        .checkouts
        .get::<CheckoutContext>(&record.invoice_id)
        .await?
    else {
        warn!(
            invoice_id = %record.invoice_id,
            "PAID callback for unknown checkout, no entitlement granted"
        );
        return Ok(());
    };

    let purchase = Purchase {
        user_id: context.user_id,
        item: context.item,
        invoice_id: record.invoice_id.clone(),
        payment_id: record.payment_id.clone(),
        purchased_at: record.paid_at.unwrap_or_else(Utc::now),
    };

    match state.entitlements.grant(purchase).await {
        Ok(true) => info!(invoice_id = %record.invoice_id, "entitlement granted"),
        Ok(false) => info!(
            invoice_id = %record.invoice_id,
            "entitlement already granted, duplicate callback"
        ),
        Err(reason) => return Err(ApiError::Internal(reason)),
    }
    Ok(())
}
