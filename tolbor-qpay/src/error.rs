//! Error types for gateway operations

use thiserror::Error;

/// Gateway error types
#[derive(Error, Debug)]
pub enum QPayError {
    /// Credentials rejected by the token endpoint
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Non-2xx response from the gateway, with its error body
    #[error("Gateway error (status {status}): {body}")]
    Gateway { status: u16, body: String },

    /// Invoice or payment absent on the gateway side
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed request or payload
    #[error("Validation error: {0}")]
    Validation(String),

    /// Transport-level failure
    #[error("Network error: {0}")]
    Network(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<reqwest::Error> for QPayError {
    fn from(err: reqwest::Error) -> Self {
        QPayError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for QPayError {
    fn from(err: serde_json::Error) -> Self {
        QPayError::Serialization(err.to_string())
    }
}

impl From<url::ParseError> for QPayError {
    fn from(err: url::ParseError) -> Self {
        QPayError::Validation(format!("invalid gateway URL: {err}"))
    }
}

/// Result type for gateway operations
pub type QPayResult<T> = Result<T, QPayError>;
