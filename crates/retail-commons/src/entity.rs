//! Table-entity addressing metadata and the `TableEntity` trait.
//!
//! Every row stored in the table store is addressed by a
//! (partition key, row key) pair and carries a version token (`ETag`)
//! plus a last-modified timestamp. Both are assigned by the store on
//! write and are read-only to callers: the etag must be echoed back
//! unchanged on update so the store can detect concurrent modification.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque version token for a stored entity.
///
/// Assigned by the table store on every successful write. Callers never
/// interpret the contents; they only present the token unchanged on a
/// subsequent update. Any mismatch with the currently stored token is a
/// concurrency conflict.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ETag(String);

impl ETag {
    /// Wraps an existing token (e.g. parsed off the wire).
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Generates a fresh token.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ETag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Generates a random unique row key.
///
/// Used by the table store when an incoming entity carries an empty row
/// key. Row keys are immutable once the row exists.
pub fn new_row_key() -> String {
    Uuid::new_v4().to_string()
}

/// Addressing and concurrency metadata flattened into every entity.
///
/// Wire shape (JSON, camelCase per the remote contract):
/// `partitionKey`, `rowKey`, `eTag`, `timestamp` (ISO-8601).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityMeta {
    #[serde(rename = "partitionKey")]
    pub partition_key: String,

    #[serde(rename = "rowKey", default)]
    pub row_key: String,

    /// Version token; `None` until the store has written the row.
    #[serde(rename = "eTag", default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<ETag>,

    /// Set by the store on write; read-only to callers.
    #[serde(rename = "timestamp", default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
}

impl EntityMeta {
    /// Metadata for a new, not-yet-stored entity. The row key may be
    /// empty, in which case the store generates one on `add`.
    pub fn new(partition_key: impl Into<String>, row_key: impl Into<String>) -> Self {
        Self {
            partition_key: partition_key.into(),
            row_key: row_key.into(),
            etag: None,
            last_modified: None,
        }
    }
}

/// A value storable in the table store.
///
/// Implementors embed an [`EntityMeta`] (flattened in serde) and expose
/// it via `meta`/`meta_mut`; the provided accessors cover the common
/// reads. Domain fields are flat scalars only — no nested objects, no
/// list-valued fields.
pub trait TableEntity: Serialize + DeserializeOwned + Send + Sync + 'static {
    fn meta(&self) -> &EntityMeta;
    fn meta_mut(&mut self) -> &mut EntityMeta;

    fn partition_key(&self) -> &str {
        &self.meta().partition_key
    }

    fn row_key(&self) -> &str {
        &self.meta().row_key
    }

    fn etag(&self) -> Option<&ETag> {
        self.meta().etag.as_ref()
    }

    fn last_modified(&self) -> Option<DateTime<Utc>> {
        self.meta().last_modified
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_etag_generate_unique() {
        let a = ETag::generate();
        let b = ETag::generate();
        assert_ne!(a, b);
        assert!(!a.as_str().is_empty());
    }

    #[test]
    fn test_row_key_generate_unique() {
        assert_ne!(new_row_key(), new_row_key());
    }

    #[test]
    fn test_meta_wire_shape() {
        let mut meta = EntityMeta::new("Categories", "row-1");
        meta.etag = Some(ETag::new("v1"));
        meta.last_modified = Some("2024-05-01T12:00:00Z".parse().unwrap());

        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["partitionKey"], "Categories");
        assert_eq!(json["rowKey"], "row-1");
        assert_eq!(json["eTag"], "v1");
        assert_eq!(json["timestamp"], "2024-05-01T12:00:00Z");
    }

    #[test]
    fn test_meta_optional_fields_omitted() {
        let meta = EntityMeta::new("Categories", "");
        let json = serde_json::to_string(&meta).unwrap();
        assert!(!json.contains("eTag"));
        assert!(!json.contains("timestamp"));
    }
}
