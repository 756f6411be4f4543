//! Test utilities for retail-store.
//!
//! Provides an in-memory `StorageBackend` for dependency-free tests and
//! a `TestDb` helper for tests that need a real RocksDB instance.

use crate::storage_trait::{Partition, Result, StorageBackend, StorageError};
use anyhow::Result as AnyResult;
use rocksdb::{Options, DB};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

type PartitionMap = BTreeMap<Vec<u8>, Vec<u8>>;

/// In-memory implementation of [`StorageBackend`].
///
/// Partitions map to named `BTreeMap`s behind a single mutex, which
/// also makes the conditional writes trivially atomic. Scans collect a
/// snapshot of the partition so the iterator does not hold the lock.
#[derive(Default)]
pub struct InMemoryBackend {
    partitions: Mutex<HashMap<String, PartitionMap>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_partition<T>(
        &self,
        partition: &Partition,
        f: impl FnOnce(&mut PartitionMap) -> Result<T>,
    ) -> Result<T> {
        let mut guard = self
            .partitions
            .lock()
            .map_err(|e| StorageError::LockPoisoned(e.to_string()))?;
        let map = guard
            .get_mut(partition.name())
            .ok_or_else(|| StorageError::PartitionNotFound(partition.name().to_string()))?;
        f(map)
    }
}

impl StorageBackend for InMemoryBackend {
    fn get(&self, partition: &Partition, key: &[u8]) -> Result<Option<Vec<u8>>> {
        self.with_partition(partition, |map| Ok(map.get(key).cloned()))
    }

    fn put(&self, partition: &Partition, key: &[u8], value: &[u8]) -> Result<()> {
        self.with_partition(partition, |map| {
            map.insert(key.to_vec(), value.to_vec());
            Ok(())
        })
    }

    fn put_if_absent(&self, partition: &Partition, key: &[u8], value: &[u8]) -> Result<()> {
        self.with_partition(partition, |map| {
            if map.contains_key(key) {
                return Err(StorageError::KeyExists(
                    String::from_utf8_lossy(key).into_owned(),
                ));
            }
            map.insert(key.to_vec(), value.to_vec());
            Ok(())
        })
    }

    fn compare_and_swap(
        &self,
        partition: &Partition,
        key: &[u8],
        expected: &[u8],
        value: &[u8],
    ) -> Result<()> {
        self.with_partition(partition, |map| match map.get(key) {
            Some(current) if current.as_slice() == expected => {
                map.insert(key.to_vec(), value.to_vec());
                Ok(())
            }
            _ => Err(StorageError::PreconditionFailed(
                String::from_utf8_lossy(key).into_owned(),
            )),
        })
    }

    fn delete(&self, partition: &Partition, key: &[u8]) -> Result<()> {
        self.with_partition(partition, |map| {
            map.remove(key);
            Ok(())
        })
    }

    fn scan(
        &self,
        partition: &Partition,
        prefix: Option<&[u8]>,
        limit: Option<usize>,
    ) -> Result<Box<dyn Iterator<Item = (Vec<u8>, Vec<u8>)> + '_>> {
        let prefix = prefix.map(|p| p.to_vec());
        let entries: Vec<(Vec<u8>, Vec<u8>)> = self.with_partition(partition, |map| {
            Ok(map
                .iter()
                .filter(|(k, _)| prefix.as_deref().map_or(true, |p| k.starts_with(p)))
                .take(limit.unwrap_or(usize::MAX))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect())
        })?;
        Ok(Box::new(entries.into_iter()))
    }

    fn partition_exists(&self, partition: &Partition) -> bool {
        self.partitions
            .lock()
            .map(|guard| guard.contains_key(partition.name()))
            .unwrap_or(false)
    }

    fn create_partition(&self, partition: &Partition) -> Result<()> {
        let mut guard = self
            .partitions
            .lock()
            .map_err(|e| StorageError::LockPoisoned(e.to_string()))?;
        guard.entry(partition.name().to_string()).or_default();
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

/// Test database wrapper that automatically cleans up on drop.
pub struct TestDb {
    /// RocksDB instance
    pub db: Arc<DB>,
    /// Temporary directory (kept alive for the duration of the test)
    #[allow(dead_code)]
    temp_dir: TempDir,
}

impl TestDb {
    /// Create a new test database with the specified column families.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use retail_store::test_utils::TestDb;
    ///
    /// let test_db = TestDb::new(&["categories", "products"]).unwrap();
    /// // Use test_db.db for testing...
    /// ```
    pub fn new(cf_names: &[&str]) -> AnyResult<Self> {
        let temp_dir = TempDir::new()?;
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let db = DB::open_cf(&opts, temp_dir.path(), cf_names)?;

        Ok(Self {
            db: Arc::new(db),
            temp_dir,
        })
    }

    /// Create a test database with the three retail tables.
    pub fn with_retail_tables() -> AnyResult<Self> {
        Self::new(&["categories", "products", "users"])
    }
}
