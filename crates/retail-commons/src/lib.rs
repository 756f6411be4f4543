//! # retail-commons
//!
//! Shared types for the retail storage backend.
//!
//! This crate provides the entity model used by every other crate
//! (retail-store, retail-filestore, retail-api, retail-server). It holds
//! no storage logic of its own: entities here are plain serde values
//! carrying the table-addressing metadata (partition key, row key,
//! version token, last-modified timestamp) that the table store assigns
//! and enforces.
//!
//! ## Example Usage
//!
//! ```rust
//! use retail_commons::models::Category;
//! use retail_commons::entity::TableEntity;
//!
//! let cat = Category::new("Categories", "Shoes");
//! assert_eq!(cat.partition_key(), "Categories");
//! assert!(cat.row_key().is_empty()); // assigned by the store on add
//! ```

pub mod constants;
pub mod entity;
pub mod models;

pub use constants::{PARTITION_CATEGORIES, PARTITION_PRODUCTS, PARTITION_USERS};
pub use entity::{new_row_key, ETag, EntityMeta, TableEntity};
pub use models::{Category, Product, UserAccount};
