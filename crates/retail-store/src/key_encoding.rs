//! Composite key encoding for table rows.
//!
//! Every row is stored under `{partition_key}:{row_key}` within its
//! backing table. The partition key may not contain `:` (the separator);
//! the row key may, since decoding splits on the first separator only.

use anyhow::{bail, Result};

/// Encode an entity key: `{partition_key}:{row_key}`
///
/// # Examples
///
/// ```
/// use retail_store::key_encoding::entity_key;
///
/// let key = entity_key("Categories", "row-1");
/// assert_eq!(key, b"Categories:row-1");
/// ```
pub fn entity_key(partition_key: &str, row_key: &str) -> Vec<u8> {
    let mut s = Vec::with_capacity(partition_key.len() + 1 + row_key.len());
    s.extend_from_slice(partition_key.as_bytes());
    s.push(b':');
    s.extend_from_slice(row_key.as_bytes());
    s
}

/// Prefix covering every row of one partition: `{partition_key}:`
pub fn partition_prefix(partition_key: &str) -> Vec<u8> {
    let mut s = Vec::with_capacity(partition_key.len() + 1);
    s.extend_from_slice(partition_key.as_bytes());
    s.push(b':');
    s
}

/// Parse an entity key into `(partition_key, row_key)`.
///
/// # Examples
///
/// ```
/// use retail_store::key_encoding::parse_entity_key;
///
/// let (pk, rk) = parse_entity_key(b"Categories:row-1").unwrap();
/// assert_eq!(pk, "Categories");
/// assert_eq!(rk, "row-1");
/// ```
pub fn parse_entity_key(key: &[u8]) -> Result<(String, String)> {
    let s = std::str::from_utf8(key)?;
    match s.split_once(':') {
        Some((pk, rk)) => Ok((pk.to_string(), rk.to_string())),
        None => bail!("Invalid entity key format: {}", s),
    }
}

/// Whether `partition_key` is usable as the leading key component:
/// non-empty and free of the separator.
pub fn is_valid_partition_key(partition_key: &str) -> bool {
    !partition_key.is_empty() && !partition_key.contains(':')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let key = entity_key("Products", "abc-123");
        let (pk, rk) = parse_entity_key(&key).unwrap();
        assert_eq!(pk, "Products");
        assert_eq!(rk, "abc-123");
    }

    #[test]
    fn test_row_key_may_contain_separator() {
        let key = entity_key("Users", "a:b:c");
        let (pk, rk) = parse_entity_key(&key).unwrap();
        assert_eq!(pk, "Users");
        assert_eq!(rk, "a:b:c");
    }

    #[test]
    fn test_parse_rejects_flat_key() {
        assert!(parse_entity_key(b"no-separator").is_err());
    }

    #[test]
    fn test_partition_key_validation() {
        assert!(is_valid_partition_key("Categories"));
        assert!(!is_valid_partition_key(""));
        assert!(!is_valid_partition_key("bad:key"));
    }
}
