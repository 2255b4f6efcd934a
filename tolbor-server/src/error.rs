//! API error types and their HTTP mapping

use crate::signature::SignatureError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tolbor_qpay::QPayError;
use tolbor_status::StoreError;

/// Request-scoped errors. Nothing here is fatal to the process.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed request or callback payload
    #[error("malformed payload: {0}")]
    Validation(String),

    /// Callback signature rejected
    #[error("callback rejected: {0}")]
    Signature(#[from] SignatureError),

    /// Gateway call failed
    #[error(transparent)]
    Gateway(#[from] QPayError),

    /// Status store failure
    #[error("store failure: {0}")]
    Store(#[from] StoreError),

    /// Anything else
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Signature(_) => StatusCode::UNAUTHORIZED,
            ApiError::Gateway(QPayError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Gateway(QPayError::Validation(_)) => StatusCode::BAD_REQUEST,
            ApiError::Gateway(QPayError::Network(_)) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Gateway(_) => StatusCode::BAD_GATEWAY,
            ApiError::Store(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Validation(_) | ApiError::Signature(_) => {
                tracing::warn!(%status, error = %self, "request rejected")
            }
            _ => tracing::error!(%status, error = %self, "request failed"),
        }

        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::Validation("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Signature(SignatureError::Missing).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Gateway(QPayError::NotFound("INV-1".into())).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Gateway(QPayError::Gateway {
                status: 400,
                body: String::new()
            })
            .status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::Gateway(QPayError::Network("timeout".into())).status(),
            StatusCode::GATEWAY_TIMEOUT
        );
    }
}
