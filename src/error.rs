//! Error types for the collection and its backing store.

use crate::types::DocId;
use thiserror::Error;

/// Errors surfaced by a [`DocumentStore`](crate::docstore::DocumentStore).
///
/// These pass through the collection layer unmodified.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Document not found: {0}")]
    NotFound(DocId),

    #[error("Schema validation failed: {0}")]
    Validation(String),

    #[error("Malformed document content: {0}")]
    Content(String),
}

/// Main error type for collection operations.
#[derive(Debug, Error)]
pub enum CollectionError {
    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Invalid collection: {0}")]
    InvalidCollection(String),

    #[error("Cursor decode error: {0}")]
    CursorDecode(String),

    #[error("Cursor item index {0} out of range (max 255)")]
    CursorRange(usize),

    #[error("Slice capacity {0} outside allowed range 10..=256")]
    Capacity(usize),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl From<serde_json::Error> for CollectionError {
    fn from(e: serde_json::Error) -> Self {
        CollectionError::InvalidCollection(e.to_string())
    }
}

/// Result type for collection operations.
pub type Result<T> = std::result::Result<T, CollectionError>;

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
