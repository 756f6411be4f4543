//! Unified `ObjectStore` factory for all storage backends.
//!
//! Local filesystem and cloud storage all implement the same
//! `ObjectStore` trait, so the rest of the crate never branches on the
//! backend kind. Remote backends get request/connect timeouts from
//! configuration; a configured prefix wraps the store in a
//! `PrefixStore`.

use crate::error::{FileStoreError, Result};
use object_store::aws::AmazonS3Builder;
use object_store::azure::MicrosoftAzureBuilder;
use object_store::gcp::GoogleCloudStorageBuilder;
use object_store::local::LocalFileSystem;
use object_store::path::Path as ObjectStorePath;
use object_store::prefix::PrefixStore;
use object_store::{ClientOptions, ObjectStore};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Timeouts applied to remote storage clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteTimeouts {
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

fn default_request_timeout_secs() -> u64 {
    60
}

fn default_connect_timeout_secs() -> u64 {
    10
}

impl Default for RemoteTimeouts {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

/// Where a store's objects live. One of these per logical container
/// (the contracts share, the images container).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StorageLocation {
    /// Local filesystem rooted at `base_directory` (created on demand).
    Local { base_directory: String },

    /// Amazon S3 or an S3-compatible endpoint (MinIO etc.).
    S3 {
        bucket: String,
        #[serde(default)]
        region: Option<String>,
        #[serde(default)]
        endpoint: Option<String>,
        #[serde(default)]
        access_key_id: Option<String>,
        #[serde(default)]
        secret_access_key: Option<String>,
        #[serde(default)]
        allow_http: bool,
        #[serde(default)]
        prefix: Option<String>,
    },

    /// Google Cloud Storage.
    Gcs {
        bucket: String,
        #[serde(default)]
        service_account_json: Option<String>,
        #[serde(default)]
        prefix: Option<String>,
    },

    /// Azure Blob Storage.
    Azure {
        container: String,
        #[serde(default)]
        account_name: Option<String>,
        #[serde(default)]
        access_key: Option<String>,
        #[serde(default)]
        prefix: Option<String>,
    },
}

/// Build an `ObjectStore` instance for a [`StorageLocation`].
///
/// All backends are unified under `Arc<dyn ObjectStore>`; construction
/// is idempotent provisioning for the local backend (the directory is
/// created if absent) and pure client construction for remote ones.
pub fn build_object_store(
    location: &StorageLocation,
    timeouts: &RemoteTimeouts,
) -> Result<Arc<dyn ObjectStore>> {
    match location {
        StorageLocation::Local { base_directory } => build_local(base_directory),
        StorageLocation::S3 {
            bucket,
            region,
            endpoint,
            access_key_id,
            secret_access_key,
            allow_http,
            prefix,
        } => {
            let mut builder = AmazonS3Builder::new()
                .with_bucket_name(bucket)
                .with_region(region.as_deref().unwrap_or("us-east-1"));

            if let Some(endpoint) = endpoint {
                builder = builder.with_endpoint(endpoint);
                // Path-style requests for custom endpoints like MinIO
                builder = builder.with_virtual_hosted_style_request(false);
            }
            if *allow_http {
                builder = builder.with_allow_http(true);
            }
            if let Some(ak) = access_key_id {
                builder = builder.with_access_key_id(ak);
            }
            if let Some(sk) = secret_access_key {
                builder = builder.with_secret_access_key(sk);
            }
            if endpoint.is_none() {
                builder = builder.with_client_options(client_options(timeouts));
            }

            let store = builder
                .build()
                .map_err(|e| FileStoreError::Config(format!("S3: {e}")))?;
            wrap_with_prefix(store, prefix.as_deref())
        }
        StorageLocation::Gcs {
            bucket,
            service_account_json,
            prefix,
        } => {
            let mut builder = GoogleCloudStorageBuilder::new().with_bucket_name(bucket);
            if let Some(sa) = service_account_json {
                builder = builder.with_service_account_key(sa);
            }
            builder = builder.with_client_options(client_options(timeouts));

            let store = builder
                .build()
                .map_err(|e| FileStoreError::Config(format!("GCS: {e}")))?;
            wrap_with_prefix(store, prefix.as_deref())
        }
        StorageLocation::Azure {
            container,
            account_name,
            access_key,
            prefix,
        } => {
            let mut builder = MicrosoftAzureBuilder::new().with_container_name(container);
            if let Some(account) = account_name {
                builder = builder.with_account(account);
            }
            if let Some(key) = access_key {
                builder = builder.with_access_key(key);
            }
            builder = builder.with_client_options(client_options(timeouts));

            let store = builder
                .build()
                .map_err(|e| FileStoreError::Config(format!("Azure: {e}")))?;
            wrap_with_prefix(store, prefix.as_deref())
        }
    }
}

fn client_options(timeouts: &RemoteTimeouts) -> ClientOptions {
    ClientOptions::new()
        .with_timeout(Duration::from_secs(timeouts.request_timeout_secs))
        .with_connect_timeout(Duration::from_secs(timeouts.connect_timeout_secs))
}

fn build_local(base_directory: &str) -> Result<Arc<dyn ObjectStore>> {
    let base = base_directory.trim();
    if base.is_empty() {
        return Err(FileStoreError::Config(
            "Local storage requires non-empty base_directory".into(),
        ));
    }

    let path = PathBuf::from(base);

    // LocalFileSystem::new_with_prefix requires an absolute path that exists
    if !path.exists() {
        std::fs::create_dir_all(&path).map_err(|e| {
            FileStoreError::Config(format!(
                "Failed to create storage directory '{}': {}",
                path.display(),
                e
            ))
        })?;
    }

    let absolute_path = path.canonicalize().map_err(|e| {
        FileStoreError::Config(format!(
            "Failed to resolve absolute path for '{}': {}",
            path.display(),
            e
        ))
    })?;

    LocalFileSystem::new_with_prefix(absolute_path)
        .map(|fs| Arc::new(fs) as Arc<dyn ObjectStore>)
        .map_err(|e| FileStoreError::Config(format!("LocalFileSystem: {e}")))
}

/// Wrap a store with a PrefixStore when a prefix is configured.
fn wrap_with_prefix<T: ObjectStore + 'static>(
    store: T,
    prefix: Option<&str>,
) -> Result<Arc<dyn ObjectStore>> {
    let prefix = prefix.unwrap_or("").trim_matches('/');
    if prefix.is_empty() {
        Ok(Arc::new(store) as Arc<dyn ObjectStore>)
    } else {
        let prefix_path = ObjectStorePath::parse(prefix)
            .map_err(|e| FileStoreError::Config(format!("prefix: {e}")))?;
        Ok(Arc::new(PrefixStore::new(store, prefix_path)) as Arc<dyn ObjectStore>)
    }
}
