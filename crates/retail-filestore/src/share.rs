//! Directory-scoped file CRUD on a durable share.
//!
//! Object stores have no first-class directories, so a directory exists
//! iff its `.dir` marker object (or any object under its prefix)
//! exists. [`FileShareStore::create_directory`] writes the marker;
//! nothing else creates directories — an upload into a missing
//! directory fails with `DirectoryNotFound` rather than silently
//! growing the tree.

use crate::error::{FileStoreError, Result};
use crate::retry::with_retry;
use bytes::Bytes;
use futures_util::StreamExt;
use log::{debug, info};
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Marker object denoting an (possibly empty) existing directory.
const DIR_MARKER: &str = ".dir";

/// File CRUD scoped to named, flat directories on a durable share.
///
/// ## Example Usage
///
/// ```rust,ignore
/// use retail_filestore::FileShareStore;
///
/// let share = FileShareStore::new(store, Duration::from_secs(60));
/// share.create_directory("employeecontracts").await?;
/// share.upload_file("employeecontracts", "alice.pdf", bytes).await?;
/// let names = share.list_files("employeecontracts").await?;
/// ```
#[derive(Clone)]
pub struct FileShareStore {
    store: Arc<dyn ObjectStore>,
    op_timeout: Duration,
}

impl FileShareStore {
    /// Wraps a share rooted at `store`. The share root itself is the
    /// backing container; directories inside it are created explicitly
    /// via [`Self::create_directory`].
    pub fn new(store: Arc<dyn ObjectStore>, op_timeout: Duration) -> Self {
        Self { store, op_timeout }
    }

    /// Runs `fut` under the store's operation deadline.
    async fn bounded<T>(&self, fut: impl Future<Output = Result<T>>) -> Result<T> {
        tokio::time::timeout(self.op_timeout, fut)
            .await
            .map_err(|_| FileStoreError::Cancelled)?
    }

    fn check_name(kind: &str, name: &str) -> Result<()> {
        if name.is_empty()
            || name.contains('/')
            || name.contains('\\')
            || name.contains("..")
            || name == DIR_MARKER
        {
            return Err(FileStoreError::InvalidName(format!("{kind}: '{name}'")));
        }
        Ok(())
    }

    fn marker_path(directory: &str) -> ObjectPath {
        ObjectPath::from(format!("{directory}/{DIR_MARKER}"))
    }

    fn file_path(directory: &str, file_name: &str) -> ObjectPath {
        ObjectPath::from(format!("{directory}/{file_name}"))
    }

    /// Creates a directory (idempotent).
    pub async fn create_directory(&self, directory: &str) -> Result<()> {
        Self::check_name("directory", directory)?;
        self.bounded(async {
            let marker = Self::marker_path(directory);
            with_retry(|| self.store.put(&marker, Bytes::new().into())).await?;
            info!("created share directory '{}'", directory);
            Ok(())
        })
        .await
    }

    /// Whether the directory exists (marker present, or any object
    /// already stored under its prefix).
    pub async fn directory_exists(&self, directory: &str) -> Result<bool> {
        Self::check_name("directory", directory)?;
        self.bounded(self.directory_exists_inner(directory)).await
    }

    async fn directory_exists_inner(&self, directory: &str) -> Result<bool> {
        let marker = Self::marker_path(directory);
        match with_retry(|| self.store.head(&marker)).await {
            Ok(_) => return Ok(true),
            Err(object_store::Error::NotFound { .. }) => {}
            Err(e) => return Err(e.into()),
        }

        // Pre-populated shares may hold files without a marker
        let prefix = ObjectPath::from(directory);
        let mut stream = self.store.list(Some(&prefix));
        match stream.next().await {
            Some(Ok(_)) => Ok(true),
            Some(Err(e)) => Err(e.into()),
            None => Ok(false),
        }
    }

    /// Lists the file names in `directory`, marker excluded.
    ///
    /// Fails with [`FileStoreError::DirectoryNotFound`] when the
    /// directory does not exist; an existing empty directory yields an
    /// empty list.
    pub async fn list_files(&self, directory: &str) -> Result<Vec<String>> {
        Self::check_name("directory", directory)?;
        self.bounded(async {
            if !self.directory_exists_inner(directory).await? {
                return Err(FileStoreError::DirectoryNotFound(directory.to_string()));
            }

            let prefix = ObjectPath::from(directory);
            let depth = prefix.parts().count() + 1;
            let mut stream = self.store.list(Some(&prefix));
            let mut names = Vec::new();

            while let Some(meta) = stream.next().await {
                let meta = meta?;
                // Direct children only; directories are flat
                if meta.location.parts().count() != depth {
                    continue;
                }
                if let Some(name) = meta.location.filename() {
                    if name != DIR_MARKER {
                        names.push(name.to_string());
                    }
                }
            }

            debug!("listed {} file(s) in '{}'", names.len(), directory);
            Ok(names)
        })
        .await
    }

    /// Uploads `data` as `directory/file_name`, overwriting any
    /// existing file of that name. The directory must already exist.
    pub async fn upload_file(&self, directory: &str, file_name: &str, data: Bytes) -> Result<()> {
        Self::check_name("directory", directory)?;
        Self::check_name("file", file_name)?;
        self.bounded(async {
            if !self.directory_exists_inner(directory).await? {
                return Err(FileStoreError::DirectoryNotFound(directory.to_string()));
            }

            let path = Self::file_path(directory, file_name);
            let len = data.len();
            with_retry(|| self.store.put(&path, data.clone().into())).await?;
            info!("uploaded '{}' ({} bytes)", path, len);
            Ok(())
        })
        .await
    }

    /// Downloads `directory/file_name`.
    ///
    /// `Ok(None)` when the file is absent; `DirectoryNotFound` when the
    /// whole directory is missing — the two states are distinct.
    pub async fn download_file(&self, directory: &str, file_name: &str) -> Result<Option<Bytes>> {
        Self::check_name("directory", directory)?;
        Self::check_name("file", file_name)?;
        self.bounded(async {
            let path = Self::file_path(directory, file_name);
            match with_retry(|| self.store.get(&path)).await {
                Ok(result) => {
                    let data = result.bytes().await?;
                    Ok(Some(data))
                }
                Err(object_store::Error::NotFound { .. }) => {
                    if self.directory_exists_inner(directory).await? {
                        Ok(None)
                    } else {
                        Err(FileStoreError::DirectoryNotFound(directory.to_string()))
                    }
                }
                Err(e) => Err(e.into()),
            }
        })
        .await
    }

    /// Deletes `directory/file_name`. Returns whether a file was
    /// actually removed (`false` when it did not exist).
    pub async fn delete_file(&self, directory: &str, file_name: &str) -> Result<bool> {
        Self::check_name("directory", directory)?;
        Self::check_name("file", file_name)?;
        self.bounded(async {
            let path = Self::file_path(directory, file_name);
            match with_retry(|| self.store.delete(&path)).await {
                Ok(()) => {
                    info!("deleted '{}'", path);
                    Ok(true)
                }
                Err(object_store::Error::NotFound { .. }) => Ok(false),
                Err(e) => Err(e.into()),
            }
        })
        .await
    }
}
