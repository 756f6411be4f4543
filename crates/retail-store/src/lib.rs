//! # retail-store
//!
//! Partition/row-addressed entity storage with optimistic concurrency.
//! This crate isolates all direct key-value storage interactions so the
//! API and server layers stay free of engine-specific dependencies.
//!
//! ## Architecture
//!
//! ```text
//! TableStore<E>            ← Typed entity CRUD + version-token checks (table_store.rs)
//!     ↓
//! StorageBackend           ← Generic K/V operations incl. conditional writes (storage_trait.rs)
//!     ↓
//! RocksDB / in-memory      ← Actual storage implementation
//! ```
//!
//! Entities are addressed by a `(partition key, row key)` pair encoded
//! into a single composite key per backing table. Updates are
//! conditional: the caller's version token must match the stored row or
//! the write is rejected with a concurrency conflict.

pub mod error;
pub mod key_encoding;
pub mod rocksdb_impl;
pub mod storage_trait;
pub mod table_store;
pub mod test_utils;

pub use error::{Result, TableStoreError};
pub use rocksdb_impl::RocksDbBackend;
pub use storage_trait::{Partition, StorageBackend, StorageBackendAsync, StorageError};
pub use table_store::{CollisionPolicy, TableStore};
