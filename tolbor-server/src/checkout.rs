//! Checkout: create a gateway invoice for a purchasable item

use crate::entitlements::Item;
use crate::error::ApiError;
use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tolbor_qpay::{Currency, DeepLink, InvoiceRequest};
use tracing::info;

/// Checkout request from the front end
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub user_id: String,
    pub item: Item,
    pub amount: Decimal,
    #[serde(default)]
    pub currency: Currency,
}

/// Payable references the front end renders
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub invoice_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qr_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qr_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_url: Option<String>,
    pub urls: Vec<DeepLink>,
}

/// What we need to grant entitlement once the callback arrives. Written
/// at invoice creation, keyed by invoice id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutContext {
    pub user_id: String,
    pub item: Item,
    pub amount: Decimal,
    pub currency: Currency,
    pub created_at: DateTime<Utc>,
}

pub async fn checkout(
    State(state): State<AppState>,
    Json(req): Json<CheckoutRequest>,
) -> Result<Json<CheckoutResponse>, ApiError> {
    if req.amount <= Decimal::ZERO {
        return Err(ApiError::Validation("amount must be positive".into()));
    }
    if req.user_id.is_empty() || req.item.id.is_empty() {
        return Err(ApiError::Validation(
            "user_id and item.id must be non-empty".into(),
        ));
    }

    let sender_invoice_no = format!("CHK-{}", uuid::Uuid::new_v4());
    let description = format!("{} {}", req.item.kind.as_str(), req.item.id);

    let invoice = state
        .gateway
        .create_invoice(InvoiceRequest::new(
            sender_invoice_no,
            req.user_id.as_str(),
            description,
            req.amount,
            state.callback_url.as_str(),
        ))
        .await?;

    let context = CheckoutContext {
        user_id: req.user_id,
        item: req.item,
        amount: req.amount,
        currency: req.currency,
        created_at: Utc::now(),
    };
    state
        .checkouts
        .put(&invoice.invoice_id, &context, state.record_ttl)
        .await?;

    info!(
        invoice_id = %invoice.invoice_id,
        user_id = %context.user_id,
        amount = %context.amount,
        "invoice created"
    );

    Ok(Json(CheckoutResponse {
        invoice_id: invoice.invoice_id,
        qr_text: invoice.qr_text,
        qr_image: invoice.qr_image,
        short_url: invoice.short_url,
        urls: invoice.urls,
    }))
}
