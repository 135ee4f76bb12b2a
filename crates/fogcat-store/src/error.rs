//! Error types for the tuple-space store.

use thiserror::Error;

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to open database: {0}")]
    Open(String),

    #[error("transaction error: {0}")]
    Transaction(String),

    #[error("table error: {0}")]
    Table(String),

    #[error("read error: {0}")]
    Read(String),

    #[error("write error: {0}")]
    Write(String),

    #[error("invalid selector: {0}")]
    InvalidSelector(String),

    #[error("unknown subscription: {0}")]
    UnknownSubscription(u64),

    #[error("change delivery stopped")]
    Closed,
}
