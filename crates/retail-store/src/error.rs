//! Error type for table-store operations.
//!
//! Lookup misses are not represented here: `get` returns `Ok(None)` and
//! `delete` returns `Ok(false)` for absent rows. These variants cover
//! write-path failures a caller must explicitly handle, plus the
//! catch-all for transport/storage faults.

use crate::storage_trait::StorageError;

pub type Result<T> = std::result::Result<T, TableStoreError>;

#[derive(Debug, thiserror::Error)]
pub enum TableStoreError {
    /// Update target does not exist.
    #[error("entity not found: {partition_key}/{row_key}")]
    NotFound {
        partition_key: String,
        row_key: String,
    },

    /// Create collision: a row with this (partition, row) pair already
    /// exists and the store is configured to reject.
    #[error("entity already exists: {partition_key}/{row_key}")]
    Conflict {
        partition_key: String,
        row_key: String,
    },

    /// Stale or missing version token on update. Signals a real
    /// concurrent write; never retried blindly.
    #[error("version token mismatch for {partition_key}/{row_key}")]
    ConcurrencyConflict {
        partition_key: String,
        row_key: String,
    },

    /// Malformed partition or row key.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    /// The operation was cancelled before completing.
    #[error("operation cancelled")]
    Cancelled,

    /// Unclassified storage failure, original cause attached.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}
