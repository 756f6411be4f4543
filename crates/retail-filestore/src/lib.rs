//! # retail-filestore
//!
//! Durable file and blob storage for the retail backend, built on the
//! `object_store` abstraction so local filesystem, S3, GCS, and Azure
//! backends are interchangeable behind one trait.
//!
//! Two stores live here:
//!
//! - [`FileShareStore`]: file CRUD scoped to named directories on a
//!   durable share (employee contracts). Directories are explicit and
//!   never created as a side effect of an upload.
//! - [`BlobObjectStore`]: opaque binary objects (product images)
//!   addressed by name, surfaced to callers as an absolute URL.
//!
//! Transient backend failures are retried with bounded exponential
//! backoff; not-found and precondition failures are surfaced
//! immediately.

pub mod blob;
pub mod error;
pub mod factory;
pub mod retry;
pub mod share;

pub use blob::BlobObjectStore;
pub use error::{FileStoreError, Result};
pub use factory::{build_object_store, RemoteTimeouts, StorageLocation};
pub use share::FileShareStore;
