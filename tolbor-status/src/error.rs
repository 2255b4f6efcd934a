//! Store error types

use thiserror::Error;

/// Status store errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// Value could not be encoded
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Stored value could not be decoded
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// Backend failure (network, connection) for non-memory backends
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
