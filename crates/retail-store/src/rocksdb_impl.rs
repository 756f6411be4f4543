//! RocksDB implementation of the StorageBackend trait.
//!
//! Maps partitions to RocksDB column families. Conditional writes
//! (`put_if_absent`, `compare_and_swap`) are serialized under an
//! internal mutex: RocksDB has no native compare-and-swap, and the
//! single handle owned by this process is the only writer, so holding
//! the mutex across read-check-write makes the condition atomic with
//! respect to every other conditional write.

use crate::storage_trait::{Partition, Result, StorageBackend, StorageError};
use rocksdb::{ColumnFamily, IteratorMode, Options, DB};
use std::sync::{Arc, Mutex};

/// RocksDB-backed implementation of [`StorageBackend`].
///
/// ## Example
///
/// ```rust,ignore
/// use retail_store::{Partition, RocksDbBackend, StorageBackend};
/// use std::sync::Arc;
///
/// let db = Arc::new(DB::open_default("/tmp/retail.db").unwrap());
/// let backend = RocksDbBackend::new(db);
///
/// let partition = Partition::new("categories");
/// backend.create_partition(&partition).unwrap();
/// backend.put(&partition, b"Categories:1", b"{}").unwrap();
/// ```
pub struct RocksDbBackend {
    db: Arc<DB>,
    // Serializes conditional writes; plain puts/deletes bypass it.
    write_lock: Mutex<()>,
}

impl RocksDbBackend {
    /// Creates a new backend over an already-open database handle.
    pub fn new(db: Arc<DB>) -> Self {
        Self {
            db,
            write_lock: Mutex::new(()),
        }
    }

    /// Returns the underlying database handle.
    pub fn db(&self) -> &Arc<DB> {
        &self.db
    }

    fn get_cf(&self, partition: &Partition) -> Result<&ColumnFamily> {
        self.db
            .cf_handle(partition.name())
            .ok_or_else(|| StorageError::PartitionNotFound(partition.name().to_string()))
    }
}

impl StorageBackend for RocksDbBackend {
    fn get(&self, partition: &Partition, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let cf = self.get_cf(partition)?;
        self.db
            .get_cf(cf, key)
            .map_err(|e| StorageError::IoError(e.to_string()))
    }

    fn put(&self, partition: &Partition, key: &[u8], value: &[u8]) -> Result<()> {
        let cf = self.get_cf(partition)?;
        self.db
            .put_cf(cf, key, value)
            .map_err(|e| StorageError::IoError(e.to_string()))
    }

    fn put_if_absent(&self, partition: &Partition, key: &[u8], value: &[u8]) -> Result<()> {
        let cf = self.get_cf(partition)?;
        let _guard = self
            .write_lock
            .lock()
            .map_err(|e| StorageError::LockPoisoned(e.to_string()))?;

        let current = self
            .db
            .get_cf(cf, key)
            .map_err(|e| StorageError::IoError(e.to_string()))?;
        if current.is_some() {
            return Err(StorageError::KeyExists(
                String::from_utf8_lossy(key).into_owned(),
            ));
        }

        self.db
            .put_cf(cf, key, value)
            .map_err(|e| StorageError::IoError(e.to_string()))
    }

    fn compare_and_swap(
        &self,
        partition: &Partition,
        key: &[u8],
        expected: &[u8],
        value: &[u8],
    ) -> Result<()> {
        let cf = self.get_cf(partition)?;
        let _guard = self
            .write_lock
            .lock()
            .map_err(|e| StorageError::LockPoisoned(e.to_string()))?;

        let current = self
            .db
            .get_cf(cf, key)
            .map_err(|e| StorageError::IoError(e.to_string()))?;
        match current {
            Some(bytes) if bytes == expected => self
                .db
                .put_cf(cf, key, value)
                .map_err(|e| StorageError::IoError(e.to_string())),
            _ => Err(StorageError::PreconditionFailed(
                String::from_utf8_lossy(key).into_owned(),
            )),
        }
    }

    fn delete(&self, partition: &Partition, key: &[u8]) -> Result<()> {
        let cf = self.get_cf(partition)?;
        self.db
            .delete_cf(cf, key)
            .map_err(|e| StorageError::IoError(e.to_string()))
    }

    fn scan(
        &self,
        partition: &Partition,
        prefix: Option<&[u8]>,
        limit: Option<usize>,
    ) -> Result<Box<dyn Iterator<Item = (Vec<u8>, Vec<u8>)> + '_>> {
        use rocksdb::Direction;

        let cf = self.get_cf(partition)?;

        // Take a consistent snapshot for the duration of the iterator
        let snapshot = self.db.snapshot();

        let prefix_vec = prefix.map(|p| p.to_vec());

        let iter_mode = if let Some(p) = &prefix_vec {
            IteratorMode::From(p.as_slice(), Direction::Forward)
        } else {
            IteratorMode::Start
        };

        let mut readopts = rocksdb::ReadOptions::default();
        readopts.set_snapshot(&snapshot);
        let inner = self.db.iterator_cf_opt(cf, readopts, iter_mode);

        struct SnapshotScanIter<'a, D: rocksdb::DBAccess> {
            // Hold the snapshot to keep it alive for 'a
            _snapshot: rocksdb::SnapshotWithThreadMode<'a, D>,
            inner: rocksdb::DBIteratorWithThreadMode<'a, D>,
            prefix: Option<Vec<u8>>,
            remaining: Option<usize>,
        }

        impl<'a, D: rocksdb::DBAccess> Iterator for SnapshotScanIter<'a, D> {
            type Item = (Vec<u8>, Vec<u8>);
            fn next(&mut self) -> Option<Self::Item> {
                if let Some(0) = self.remaining {
                    return None;
                }

                match self.inner.next()? {
                    Ok((k, v)) => {
                        if let Some(ref p) = self.prefix {
                            if !k.starts_with(p) {
                                return None;
                            }
                        }
                        if let Some(ref mut left) = self.remaining {
                            *left -= 1;
                        }
                        Some((k.to_vec(), v.to_vec()))
                    }
                    Err(_) => None,
                }
            }
        }

        Ok(Box::new(SnapshotScanIter::<DB> {
            _snapshot: snapshot,
            inner,
            prefix: prefix_vec,
            remaining: limit,
        }))
    }

    fn partition_exists(&self, partition: &Partition) -> bool {
        self.db.cf_handle(partition.name()).is_some()
    }

    fn create_partition(&self, partition: &Partition) -> Result<()> {
        if self.partition_exists(partition) {
            return Ok(());
        }

        let opts = Options::default();
        unsafe {
            // SAFETY: create_cf requires &mut DB while we hold Arc<DB>.
            // RocksDB's create_cf is internally thread-safe and no column
            // family handles are being resolved during the call; the Arc
            // keeps the DB alive for the duration.
            let db_ptr = Arc::as_ptr(&self.db) as *mut DB;
            match (*db_ptr).create_cf(partition.name(), &opts) {
                Ok(()) => {}
                Err(e) => {
                    let msg = e.to_string();
                    // Benign race: another thread created the CF between
                    // the exists-check and create.
                    if msg.to_lowercase().contains("column family already exists") {
                        return Ok(());
                    }
                    return Err(StorageError::IoError(msg));
                }
            }
        }

        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_db() -> (Arc<DB>, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let db = DB::open(&opts, temp_dir.path()).unwrap();
        (Arc::new(db), temp_dir)
    }

    #[test]
    fn test_create_and_get_partition() {
        let (db, _temp) = create_test_db();
        let backend = RocksDbBackend::new(db);

        let partition = Partition::new("categories");
        backend.create_partition(&partition).unwrap();

        assert!(backend.partition_exists(&partition));
    }

    #[test]
    fn test_put_and_get() {
        let (db, _temp) = create_test_db();
        let backend = RocksDbBackend::new(db);

        let partition = Partition::new("categories");
        backend.create_partition(&partition).unwrap();

        backend.put(&partition, b"key1", b"value1").unwrap();
        let value = backend.get(&partition, b"key1").unwrap();

        assert_eq!(value, Some(b"value1".to_vec()));
    }

    #[test]
    fn test_delete_is_idempotent() {
        let (db, _temp) = create_test_db();
        let backend = RocksDbBackend::new(db);

        let partition = Partition::new("categories");
        backend.create_partition(&partition).unwrap();

        backend.put(&partition, b"key1", b"value1").unwrap();
        backend.delete(&partition, b"key1").unwrap();
        backend.delete(&partition, b"key1").unwrap();

        assert_eq!(backend.get(&partition, b"key1").unwrap(), None);
    }

    #[test]
    fn test_put_if_absent_rejects_existing() {
        let (db, _temp) = create_test_db();
        let backend = RocksDbBackend::new(db);

        let partition = Partition::new("categories");
        backend.create_partition(&partition).unwrap();

        backend.put_if_absent(&partition, b"key1", b"v1").unwrap();
        let err = backend.put_if_absent(&partition, b"key1", b"v2").unwrap_err();
        assert!(matches!(err, StorageError::KeyExists(_)));

        assert_eq!(backend.get(&partition, b"key1").unwrap(), Some(b"v1".to_vec()));
    }

    #[test]
    fn test_compare_and_swap() {
        let (db, _temp) = create_test_db();
        let backend = RocksDbBackend::new(db);

        let partition = Partition::new("categories");
        backend.create_partition(&partition).unwrap();

        backend.put(&partition, b"key1", b"v1").unwrap();

        backend
            .compare_and_swap(&partition, b"key1", b"v1", b"v2")
            .unwrap();
        assert_eq!(backend.get(&partition, b"key1").unwrap(), Some(b"v2".to_vec()));

        // Stale expected value is rejected
        let err = backend
            .compare_and_swap(&partition, b"key1", b"v1", b"v3")
            .unwrap_err();
        assert!(matches!(err, StorageError::PreconditionFailed(_)));

        // Absent key is rejected too
        let err = backend
            .compare_and_swap(&partition, b"missing", b"v1", b"v3")
            .unwrap_err();
        assert!(matches!(err, StorageError::PreconditionFailed(_)));
    }

    #[test]
    fn test_scan_with_prefix() {
        let (db, _temp) = create_test_db();
        let backend = RocksDbBackend::new(db);

        let partition = Partition::new("categories");
        backend.create_partition(&partition).unwrap();

        backend.put(&partition, b"Categories:1", b"a").unwrap();
        backend.put(&partition, b"Categories:2", b"b").unwrap();
        backend.put(&partition, b"Archive:1", b"c").unwrap();

        let results: Vec<_> = backend
            .scan(&partition, Some(b"Categories:"), None)
            .unwrap()
            .collect();

        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_scan_with_limit() {
        let (db, _temp) = create_test_db();
        let backend = RocksDbBackend::new(db);

        let partition = Partition::new("categories");
        backend.create_partition(&partition).unwrap();

        backend.put(&partition, b"key1", b"a").unwrap();
        backend.put(&partition, b"key2", b"b").unwrap();
        backend.put(&partition, b"key3", b"c").unwrap();

        let results: Vec<_> = backend.scan(&partition, None, Some(2)).unwrap().collect();
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_missing_partition_errors() {
        let (db, _temp) = create_test_db();
        let backend = RocksDbBackend::new(db);

        let err = backend.get(&Partition::new("nope"), b"k").unwrap_err();
        assert!(matches!(err, StorageError::PartitionNotFound(_)));
    }
}
