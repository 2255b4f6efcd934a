//! Refund route (ops use)

use crate::error::ApiError;
use crate::state::AppState;
use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;
use tolbor_qpay::Refund;
use tracing::info;

#[derive(Debug, Default, Deserialize)]
pub struct RefundRequest {
    #[serde(default)]
    pub note: Option<String>,
}

pub async fn refund(
    State(state): State<AppState>,
    Path(payment_id): Path<String>,
    Json(req): Json<RefundRequest>,
) -> Result<Json<Refund>, ApiError> {
    // Gateway refusal (already refunded, disputed) surfaces as a gateway
    // error with the gateway's body, never as silent success
    let refund = state
        .gateway
        .refund_payment(&payment_id, &state.callback_url, req.note.as_deref())
        .await?;

    info!(payment_id = %payment_id, "refund requested");
    Ok(Json(refund))
}
