//! Error type for file-share and blob operations.
//!
//! Lookup misses are not errors: `download_file` returns `Ok(None)` and
//! the deletes report `Ok(false)` / no-op success for absent targets.

pub type Result<T> = std::result::Result<T, FileStoreError>;

#[derive(Debug, thiserror::Error)]
pub enum FileStoreError {
    /// The named directory does not exist on the share. Distinct from a
    /// missing file, which is a legitimate non-error state.
    #[error("directory not found: {0}")]
    DirectoryNotFound(String),

    /// Malformed directory or file name (empty, separators, traversal).
    #[error("invalid name: {0}")]
    InvalidName(String),

    /// A blob URL that cannot be reverse-parsed to an object name.
    #[error("invalid object url: {0}")]
    InvalidUrl(String),

    /// The operation deadline expired before the backend answered.
    #[error("operation cancelled")]
    Cancelled,

    #[error("configuration error: {0}")]
    Config(String),

    /// Unclassified backend failure, original cause attached.
    #[error("object store error: {0}")]
    ObjectStore(#[from] object_store::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_backend_cause_is_preserved() {
        let inner = object_store::Error::Generic {
            store: "test",
            source: "connection reset".into(),
        };
        let err: FileStoreError = inner.into();

        assert!(matches!(err, FileStoreError::ObjectStore(_)));
        let source = err.source().expect("cause should be attached");
        assert!(source.to_string().contains("connection reset"));
    }
}
