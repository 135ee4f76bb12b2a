//! Catalog error types.

use fogcat_store::StoreError;
use thiserror::Error;

/// Errors that can occur during catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid path segment {segment:?}: {reason}")]
    InvalidSegment { segment: String, reason: &'static str },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("failed to decode value at {key}: {source}")]
    Decode {
        key: String,
        source: serde_json::Error,
    },

    #[error("failed to encode value for {key}: {source}")]
    Encode {
        key: String,
        source: serde_json::Error,
    },

    #[error("path does not match any catalog template: {0}")]
    UnrecognizedPath(String),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

pub type CatalogResult<T> = Result<T, CatalogError>;
