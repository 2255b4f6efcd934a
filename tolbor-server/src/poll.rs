//! Status poller: "has this invoice been paid yet".
//!
//! Reads local cached state only. The flow deliberately trusts the
//! callback channel; if a callback is lost the poller keeps answering
//! "processing" rather than querying the gateway synchronously.

use crate::error::ApiError;
use crate::state::AppState;
use axum::Json;
use axum::extract::{Path, State};
use serde::Serialize;
use tolbor_qpay::PaymentRecord;

/// Poll response. An unknown invoice is "still processing", never an
/// error.
#[derive(Debug, Serialize)]
pub struct PollResponse {
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<PaymentRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after_ms: Option<u64>,
}

pub async fn poll(
    State(state): State<AppState>,
    Path(invoice_id): Path<String>,
) -> Result<Json<PollResponse>, ApiError> {
    let response = match state.records.get::<PaymentRecord>(&invoice_id).await? {
        // The stored record is authoritative for this flow, staleness
        // and all
        Some(record) => PollResponse {
            found: true,
            record: Some(record),
            retry_after_ms: None,
        },
        None => PollResponse {
            found: false,
            record: None,
            retry_after_ms: Some(state.retry_after_ms),
        },
    };

    Ok(Json(response))
}
