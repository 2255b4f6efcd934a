//! Payment reconciliation service for the tolbor e-learning platform.
//!
//! The flow, end to end: the front end `POST`s a checkout, we create a
//! QPay invoice and remember the checkout context; the user pays in their
//! banking app; the gateway calls `POST /payments/callback`; the receiver
//! verifies the signature, records the payment (last write wins), and on
//! PAID grants the entitlement; meanwhile the front end polls
//! `GET /payments/{invoice_id}` until it sees the record.
//!
//! The status store is process-local. A callback landing on one instance
//! is invisible to a poll on another, so multi-instance deployments must
//! put a shared backend behind the store trait.

pub mod callback;
pub mod checkout;
pub mod config;
pub mod entitlements;
pub mod error;
pub mod poll;
pub mod refund;
pub mod signature;
pub mod state;

use axum::Router;
use axum::routing::{get, post};
use state::AppState;

/// Build the service router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/checkout", post(checkout::checkout))
        .route("/payments/callback", post(callback::callback))
        .route("/payments/{id}", get(poll::poll))
        .route("/payments/{id}/refund", post(refund::refund))
        .with_state(state)
}
