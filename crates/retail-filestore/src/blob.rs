//! Flat blob container addressed by public URL.
//!
//! Uploads return the stable public URL of the blob; deletion accepts
//! that URL back and reverse-parses the object name from its last path
//! segment. The container itself is flat, so only the final segment is
//! ever the blob name.

use crate::error::{FileStoreError, Result};
use crate::retry::with_retry;
use bytes::Bytes;
use log::info;
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;
use percent_encoding::percent_decode_str;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Write-once blob storage for public assets (product images).
#[derive(Clone)]
pub struct BlobObjectStore {
    store: Arc<dyn ObjectStore>,
    public_base_url: Url,
    op_timeout: Duration,
}

impl BlobObjectStore {
    /// `public_base_url` is the externally reachable root of the
    /// container; uploaded blob URLs are formed by appending the blob
    /// name as one path segment.
    pub fn new(store: Arc<dyn ObjectStore>, public_base_url: Url, op_timeout: Duration) -> Self {
        Self {
            store,
            public_base_url,
            op_timeout,
        }
    }

    async fn bounded<T>(&self, fut: impl Future<Output = Result<T>>) -> Result<T> {
        tokio::time::timeout(self.op_timeout, fut)
            .await
            .map_err(|_| FileStoreError::Cancelled)?
    }

    fn check_name(name: &str) -> Result<()> {
        if name.is_empty() || name.contains('/') || name.contains('\\') || name.contains("..") {
            return Err(FileStoreError::InvalidName(format!("blob: '{name}'")));
        }
        Ok(())
    }

    /// Public URL for a blob name, with the name percent-encoded as a
    /// single path segment.
    fn blob_url(&self, name: &str) -> Result<Url> {
        let mut url = self.public_base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                FileStoreError::Config(format!(
                    "base url '{}' cannot carry path segments",
                    self.public_base_url
                ))
            })?
            .pop_if_empty()
            .push(name);
        Ok(url)
    }

    /// Blob name recovered from a URL previously issued by
    /// [`Self::upload_object`].
    fn name_from_url(&self, blob_url: &str) -> Result<String> {
        let url =
            Url::parse(blob_url).map_err(|e| FileStoreError::InvalidUrl(format!("{blob_url}: {e}")))?;
        let last = url
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| FileStoreError::InvalidUrl(format!("no object name in '{blob_url}'")))?;

        let name = percent_decode_str(last)
            .decode_utf8()
            .map_err(|_| FileStoreError::InvalidUrl(format!("undecodable name in '{blob_url}'")))?
            .into_owned();
        Self::check_name(&name)?;
        Ok(name)
    }

    /// Stores `data` under `name` and returns the blob's public URL.
    /// Re-uploading the same name overwrites the previous content.
    pub async fn upload_object(&self, name: &str, data: Bytes) -> Result<Url> {
        Self::check_name(name)?;
        let url = self.blob_url(name)?;
        self.bounded(async {
            let path = ObjectPath::from(name);
            let len = data.len();
            with_retry(|| self.store.put(&path, data.clone().into())).await?;
            info!("uploaded blob '{}' ({} bytes)", name, len);
            Ok(url)
        })
        .await
    }

    /// Fetches a blob's content by its public URL.
    pub async fn download_object(&self, blob_url: &str) -> Result<Option<Bytes>> {
        let name = self.name_from_url(blob_url)?;
        self.bounded(async {
            let path = ObjectPath::from(name.as_str());
            match with_retry(|| self.store.get(&path)).await {
                Ok(result) => Ok(Some(result.bytes().await?)),
                Err(object_store::Error::NotFound { .. }) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
    }

    /// Deletes the blob a previously issued URL points at. Deleting an
    /// already-absent blob is a no-op.
    pub async fn delete_object(&self, blob_url: &str) -> Result<()> {
        let name = self.name_from_url(blob_url)?;
        self.bounded(async {
            let path = ObjectPath::from(name.as_str());
            match with_retry(|| self.store.delete(&path)).await {
                Ok(()) => {
                    info!("deleted blob '{}'", name);
                    Ok(())
                }
                Err(object_store::Error::NotFound { .. }) => Ok(()),
                Err(e) => Err(e.into()),
            }
        })
        .await
    }
}
