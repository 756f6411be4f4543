//! Typed entity CRUD with optimistic concurrency.
//!
//! `TableStore<E>` provides partition/row-addressed CRUD for one entity
//! type over a [`StorageBackend`]. The store owns the write discipline:
//! it assigns row keys, version tokens, and last-modified timestamps,
//! and rejects updates whose token no longer matches the stored row.
//! The stale-token check rides on the backend's atomic compare-and-swap
//! rather than a client-side compare-then-write.
//!
//! ## Example Usage
//!
//! ```rust
//! use retail_commons::models::Category;
//! use retail_store::table_store::{CollisionPolicy, TableStore};
//! use retail_store::test_utils::InMemoryBackend;
//! use std::sync::Arc;
//!
//! let backend = Arc::new(InMemoryBackend::new());
//! let store: TableStore<Category> =
//!     TableStore::new(backend, "categories", CollisionPolicy::Reject).unwrap();
//!
//! let stored = store.add(Category::new("Categories", "Shoes")).unwrap();
//! assert!(!stored.meta.row_key.is_empty());
//! let found = store.get("Categories", &stored.meta.row_key).unwrap();
//! assert!(found.is_some());
//! ```

use crate::error::{Result, TableStoreError};
use crate::key_encoding::{entity_key, is_valid_partition_key, partition_prefix};
use crate::storage_trait::{Partition, StorageBackend, StorageError};
use chrono::Utc;
use log::debug;
use retail_commons::entity::{new_row_key, ETag, TableEntity};
use std::marker::PhantomData;
use std::sync::Arc;

/// What `add` does when a row with the same (partition, row) pair
/// already exists. One policy per store instance, applied uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionPolicy {
    /// Fail the add with [`TableStoreError::Conflict`].
    #[default]
    Reject,
    /// Replace the existing row unconditionally.
    Overwrite,
}

/// Partition/row-addressed CRUD for one entity type.
pub struct TableStore<E: TableEntity> {
    backend: Arc<dyn StorageBackend>,
    table: Partition,
    on_collision: CollisionPolicy,
    _marker: PhantomData<fn() -> E>,
}

impl<E: TableEntity> Clone for TableStore<E> {
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
            table: self.table.clone(),
            on_collision: self.on_collision,
            _marker: PhantomData,
        }
    }
}

impl<E: TableEntity> TableStore<E> {
    /// Opens the store over `table`, provisioning the backing partition
    /// if it does not exist yet.
    pub fn new(
        backend: Arc<dyn StorageBackend>,
        table: impl Into<String>,
        on_collision: CollisionPolicy,
    ) -> Result<Self> {
        let table = Partition::new(table);
        backend.create_partition(&table)?;
        debug!("table store ready: {}", table.name());
        Ok(Self {
            backend,
            table,
            on_collision,
            _marker: PhantomData,
        })
    }

    /// The backing table name.
    pub fn table(&self) -> &str {
        self.table.name()
    }

    fn serialize(&self, entity: &E) -> Result<Vec<u8>> {
        serde_json::to_vec(entity).map_err(|e| TableStoreError::Serialization(e.to_string()))
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<E> {
        serde_json::from_slice(bytes).map_err(|e| TableStoreError::Serialization(e.to_string()))
    }

    fn check_keys(&self, partition_key: &str, row_key: &str) -> Result<()> {
        if !is_valid_partition_key(partition_key) {
            return Err(TableStoreError::InvalidKey(format!(
                "partition key '{}' is empty or contains ':'",
                partition_key
            )));
        }
        if row_key.is_empty() {
            return Err(TableStoreError::InvalidKey("row key is empty".into()));
        }
        Ok(())
    }

    /// Retrieves an entity. `Ok(None)` when the row is absent; a miss
    /// is a legitimate state, never an error.
    pub fn get(&self, partition_key: &str, row_key: &str) -> Result<Option<E>> {
        self.check_keys(partition_key, row_key)?;
        let key = entity_key(partition_key, row_key);
        match self.backend.get(&self.table, &key)? {
            Some(bytes) => Ok(Some(self.deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Inserts an entity, assigning a generated row key when the
    /// incoming one is empty, plus a fresh version token and timestamp.
    ///
    /// Collision behavior follows the store's [`CollisionPolicy`].
    /// Returns the entity as persisted.
    pub fn add(&self, mut entity: E) -> Result<E> {
        if entity.row_key().is_empty() {
            entity.meta_mut().row_key = new_row_key();
        }
        let partition_key = entity.partition_key().to_string();
        let row_key = entity.row_key().to_string();
        self.check_keys(&partition_key, &row_key)?;

        entity.meta_mut().etag = Some(ETag::generate());
        entity.meta_mut().last_modified = Some(Utc::now());

        let key = entity_key(&partition_key, &row_key);
        let value = self.serialize(&entity)?;

        match self.on_collision {
            CollisionPolicy::Reject => {
                match self.backend.put_if_absent(&self.table, &key, &value) {
                    Ok(()) => {}
                    Err(StorageError::KeyExists(_)) => {
                        return Err(TableStoreError::Conflict {
                            partition_key,
                            row_key,
                        })
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            CollisionPolicy::Overwrite => self.backend.put(&self.table, &key, &value)?,
        }

        Ok(entity)
    }

    /// Replaces a stored entity (full replace, not a partial patch).
    ///
    /// The entity must carry the version token obtained from a prior
    /// read; a stale or missing token fails with `ConcurrencyConflict`,
    /// an absent row with `NotFound`. Returns the refreshed entity with
    /// its new token and timestamp.
    pub fn update(&self, mut entity: E) -> Result<E> {
        let partition_key = entity.partition_key().to_string();
        let row_key = entity.row_key().to_string();
        self.check_keys(&partition_key, &row_key)?;

        let conflict = || TableStoreError::ConcurrencyConflict {
            partition_key: partition_key.clone(),
            row_key: row_key.clone(),
        };

        let caller_etag = entity.etag().cloned().ok_or_else(conflict)?;

        let key = entity_key(&partition_key, &row_key);
        let current = match self.backend.get(&self.table, &key)? {
            Some(bytes) => bytes,
            None => {
                return Err(TableStoreError::NotFound {
                    partition_key,
                    row_key,
                })
            }
        };

        let stored: E = self.deserialize(&current)?;
        match stored.etag() {
            Some(tag) if *tag == caller_etag => {}
            _ => return Err(conflict()),
        }

        entity.meta_mut().etag = Some(ETag::generate());
        entity.meta_mut().last_modified = Some(Utc::now());
        let value = self.serialize(&entity)?;

        // The swap is conditional on the exact bytes read above, so a
        // writer that slipped in after the token check still loses.
        match self
            .backend
            .compare_and_swap(&self.table, &key, &current, &value)
        {
            Ok(()) => Ok(entity),
            Err(StorageError::PreconditionFailed(_)) => Err(conflict()),
            Err(e) => Err(e.into()),
        }
    }

    /// Deletes a row. Idempotent: `Ok(false)` when it was already
    /// absent, `Ok(true)` when a row was removed.
    pub fn delete(&self, partition_key: &str, row_key: &str) -> Result<bool> {
        self.check_keys(partition_key, row_key)?;
        let key = entity_key(partition_key, row_key);
        let existed = self.backend.get(&self.table, &key)?.is_some();
        self.backend.delete(&self.table, &key)?;
        Ok(existed)
    }

    /// Lazily iterates every entity in the table, in storage-native key
    /// order (no global ordering guarantee across partitions). The
    /// iterator is finite and not restartable mid-iteration.
    pub fn list_all(&self) -> Result<impl Iterator<Item = Result<E>> + '_> {
        let iter = self.backend.scan(&self.table, None, None)?;
        Ok(iter.map(move |(_key, value)| self.deserialize(&value)))
    }

    /// Lazily iterates the entities of one partition.
    pub fn list_partition(
        &self,
        partition_key: &str,
    ) -> Result<impl Iterator<Item = Result<E>> + '_> {
        if !is_valid_partition_key(partition_key) {
            return Err(TableStoreError::InvalidKey(format!(
                "partition key '{}' is empty or contains ':'",
                partition_key
            )));
        }
        let prefix = partition_prefix(partition_key);
        let iter = self.backend.scan(&self.table, Some(&prefix), None)?;
        Ok(iter.map(move |(_key, value)| self.deserialize(&value)))
    }

    /// Returns the first entity matching `predicate`, scanning in
    /// storage order.
    pub fn find(&self, predicate: impl Fn(&E) -> bool) -> Result<Option<E>> {
        for entity in self.list_all()? {
            let entity = entity?;
            if predicate(&entity) {
                return Ok(Some(entity));
            }
        }
        Ok(None)
    }
}

fn join_error(e: tokio::task::JoinError) -> TableStoreError {
    if e.is_cancelled() {
        TableStoreError::Cancelled
    } else {
        TableStoreError::Storage(StorageError::Other(format!(
            "spawn_blocking join error: {}",
            e
        )))
    }
}

/// Async variants. Each call offloads the blocking storage work via
/// `tokio::task::spawn_blocking`; listing collects since iterators
/// can't cross the blocking boundary.
impl<E: TableEntity> TableStore<E> {
    pub async fn get_async(&self, partition_key: &str, row_key: &str) -> Result<Option<E>> {
        let store = self.clone();
        let partition_key = partition_key.to_string();
        let row_key = row_key.to_string();
        tokio::task::spawn_blocking(move || store.get(&partition_key, &row_key))
            .await
            .map_err(join_error)?
    }

    pub async fn add_async(&self, entity: E) -> Result<E> {
        let store = self.clone();
        tokio::task::spawn_blocking(move || store.add(entity))
            .await
            .map_err(join_error)?
    }

    pub async fn update_async(&self, entity: E) -> Result<E> {
        let store = self.clone();
        tokio::task::spawn_blocking(move || store.update(entity))
            .await
            .map_err(join_error)?
    }

    pub async fn delete_async(&self, partition_key: &str, row_key: &str) -> Result<bool> {
        let store = self.clone();
        let partition_key = partition_key.to_string();
        let row_key = row_key.to_string();
        tokio::task::spawn_blocking(move || store.delete(&partition_key, &row_key))
            .await
            .map_err(join_error)?
    }

    pub async fn list_all_async(&self) -> Result<Vec<E>> {
        let store = self.clone();
        tokio::task::spawn_blocking(move || store.list_all()?.collect())
            .await
            .map_err(join_error)?
    }

    pub async fn find_async(
        &self,
        predicate: impl Fn(&E) -> bool + Send + 'static,
    ) -> Result<Option<E>> {
        let store = self.clone();
        tokio::task::spawn_blocking(move || store.find(predicate))
            .await
            .map_err(join_error)?
    }
}
