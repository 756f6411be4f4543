//! Storage backend abstraction for pluggable key-value implementations.
//!
//! The table store talks to storage exclusively through the
//! `StorageBackend` trait: get/put/delete plus the two conditional
//! writes (`put_if_absent`, `compare_and_swap`) that make optimistic
//! concurrency atomic at the storage tier rather than a client-side
//! compare-then-write race.
//!
//! ## Partition Model
//!
//! A `Partition` is a logical table. Backends map it to their native
//! concept:
//! - **RocksDB**: column family
//! - **In-memory**: map namespace
//!
//! ## Example Usage
//!
//! ```rust
//! use retail_store::storage_trait::{Partition, StorageBackend};
//! use retail_store::test_utils::InMemoryBackend;
//!
//! let backend = InMemoryBackend::new();
//! let partition = Partition::new("categories");
//! backend.create_partition(&partition).unwrap();
//! backend.put(&partition, b"Categories:1", b"{}").unwrap();
//! assert!(backend.get(&partition, b"Categories:1").unwrap().is_some());
//! ```

use std::any::Any;
use std::fmt;

/// Result type for backend operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during backend operations.
#[derive(Debug, Clone)]
pub enum StorageError {
    /// Partition (column family, namespace) not found
    PartitionNotFound(String),

    /// Conditional write rejected: the stored value did not match the
    /// expected one (or the key vanished mid-flight)
    PreconditionFailed(String),

    /// `put_if_absent` rejected: the key already exists
    KeyExists(String),

    /// Generic I/O error from underlying storage
    IoError(String),

    /// Internal lock poisoning
    LockPoisoned(String),

    /// Other errors
    Other(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::PartitionNotFound(p) => write!(f, "Partition not found: {}", p),
            StorageError::PreconditionFailed(msg) => write!(f, "Precondition failed: {}", msg),
            StorageError::KeyExists(key) => write!(f, "Key already exists: {}", key),
            StorageError::IoError(msg) => write!(f, "I/O error: {}", msg),
            StorageError::LockPoisoned(msg) => write!(f, "Lock poisoned: {}", msg),
            StorageError::Other(msg) => write!(f, "Storage error: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}

/// A logical table within a storage backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Partition {
    name: String,
}

impl Partition {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl From<&str> for Partition {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Partition {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

/// Trait for pluggable storage backend implementations.
///
/// Implementations must be thread-safe (Send + Sync); a single backend
/// handle is shared by every store instance in the process.
///
/// ## Conditional writes
///
/// `put_if_absent` and `compare_and_swap` must be atomic with respect
/// to all other writes through the same backend. They are the sole
/// correctness mechanism for concurrent writers racing on one key.
pub trait StorageBackend: Send + Sync {
    /// Retrieves a value by key. `Ok(None)` when the key doesn't exist.
    fn get(&self, partition: &Partition, key: &[u8]) -> Result<Option<Vec<u8>>>;

    /// Stores a key-value pair, overwriting any existing value.
    fn put(&self, partition: &Partition, key: &[u8], value: &[u8]) -> Result<()>;

    /// Stores a key-value pair only if the key does not exist yet.
    ///
    /// Fails with `StorageError::KeyExists` otherwise.
    fn put_if_absent(&self, partition: &Partition, key: &[u8], value: &[u8]) -> Result<()>;

    /// Replaces the value stored under `key` only if the current value
    /// is byte-identical to `expected`.
    ///
    /// Fails with `StorageError::PreconditionFailed` when the stored
    /// value differs or the key is absent.
    fn compare_and_swap(
        &self,
        partition: &Partition,
        key: &[u8],
        expected: &[u8],
        value: &[u8],
    ) -> Result<()>;

    /// Deletes a key. `Ok(())` even if the key doesn't exist (idempotent).
    fn delete(&self, partition: &Partition, key: &[u8]) -> Result<()>;

    /// Scans keys in a partition, optionally filtered by prefix and
    /// capped by `limit`.
    ///
    /// Returns a memory-efficient iterator of (key, value) pairs in
    /// storage-native key order. The iterator is finite and not
    /// restartable mid-iteration.
    fn scan(
        &self,
        partition: &Partition,
        prefix: Option<&[u8]>,
        limit: Option<usize>,
    ) -> Result<Box<dyn Iterator<Item = (Vec<u8>, Vec<u8>)> + '_>>;

    /// Checks if a partition exists.
    fn partition_exists(&self, partition: &Partition) -> bool;

    /// Creates a partition. `Ok(())` if it already exists (idempotent);
    /// store construction uses this for create-if-absent provisioning.
    fn create_partition(&self, partition: &Partition) -> Result<()>;

    /// Downcast support for integration paths that need a concrete
    /// backend handle. Prefer the trait methods above.
    fn as_any(&self) -> &dyn Any;
}

/// Extension trait providing async versions of StorageBackend methods.
///
/// These methods offload the synchronous storage calls to the blocking
/// thread pool via `tokio::task::spawn_blocking` so the async runtime
/// is never blocked on disk I/O.
#[async_trait::async_trait]
pub trait StorageBackendAsync: Send + Sync {
    async fn get_async(&self, partition: &Partition, key: &[u8]) -> Result<Option<Vec<u8>>>;

    async fn put_async(&self, partition: &Partition, key: &[u8], value: &[u8]) -> Result<()>;

    async fn delete_async(&self, partition: &Partition, key: &[u8]) -> Result<()>;

    /// Async scan. Returns collected results since iterators can't
    /// cross the `spawn_blocking` boundary.
    async fn scan_async(
        &self,
        partition: &Partition,
        prefix: Option<Vec<u8>>,
        limit: Option<usize>,
    ) -> Result<Vec<(Vec<u8>, Vec<u8>)>>;
}

fn join_error(e: tokio::task::JoinError) -> StorageError {
    StorageError::Other(format!("spawn_blocking join error: {}", e))
}

// Blanket implementation for Arc<dyn StorageBackend>
#[async_trait::async_trait]
impl StorageBackendAsync for std::sync::Arc<dyn StorageBackend> {
    async fn get_async(&self, partition: &Partition, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let backend = self.clone();
        let partition = partition.clone();
        let key = key.to_vec();
        tokio::task::spawn_blocking(move || backend.get(&partition, &key))
            .await
            .map_err(join_error)?
    }

    async fn put_async(&self, partition: &Partition, key: &[u8], value: &[u8]) -> Result<()> {
        let backend = self.clone();
        let partition = partition.clone();
        let key = key.to_vec();
        let value = value.to_vec();
        tokio::task::spawn_blocking(move || backend.put(&partition, &key, &value))
            .await
            .map_err(join_error)?
    }

    async fn delete_async(&self, partition: &Partition, key: &[u8]) -> Result<()> {
        let backend = self.clone();
        let partition = partition.clone();
        let key = key.to_vec();
        tokio::task::spawn_blocking(move || backend.delete(&partition, &key))
            .await
            .map_err(join_error)?
    }

    async fn scan_async(
        &self,
        partition: &Partition,
        prefix: Option<Vec<u8>>,
        limit: Option<usize>,
    ) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        let backend = self.clone();
        let partition = partition.clone();
        tokio::task::spawn_blocking(move || {
            let iter = backend.scan(&partition, prefix.as_deref(), limit)?;
            Ok(iter.collect())
        })
        .await
        .map_err(join_error)?
    }
}
