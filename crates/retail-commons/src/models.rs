//! Domain entities stored in the table store.
//!
//! These are the typed contracts for everything that crosses the store
//! boundary — each entity kind has an explicit struct validated by serde
//! at the edge, never a dynamic JSON blob.

use crate::constants::{PARTITION_CATEGORIES, PARTITION_PRODUCTS, PARTITION_USERS};
use crate::entity::{EntityMeta, TableEntity};
use serde::{Deserialize, Serialize};

/// A product category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(flatten)]
    pub meta: EntityMeta,
    pub name: String,
}

impl Category {
    pub fn new(partition_key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            meta: EntityMeta::new(partition_key, ""),
            name: name.into(),
        }
    }
}

impl TableEntity for Category {
    fn meta(&self) -> &EntityMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut EntityMeta {
        &mut self.meta
    }
}

impl Default for Category {
    fn default() -> Self {
        Self::new(PARTITION_CATEGORIES, "")
    }
}

/// A catalog product. `image_url` points at a blob-store object,
/// `category_row_key` references a [`Category`] row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(flatten)]
    pub meta: EntityMeta,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub quantity: i32,
    #[serde(default)]
    pub category_row_key: String,
}

impl Product {
    pub fn new(partition_key: impl Into<String>, name: impl Into<String>, price: f64) -> Self {
        Self {
            meta: EntityMeta::new(partition_key, ""),
            name: name.into(),
            price,
            description: String::new(),
            image_url: String::new(),
            quantity: 0,
            category_row_key: String::new(),
        }
    }
}

impl TableEntity for Product {
    fn meta(&self) -> &EntityMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut EntityMeta {
        &mut self.meta
    }
}

impl Default for Product {
    fn default() -> Self {
        Self::new(PARTITION_PRODUCTS, "", 0.0)
    }
}

fn default_role() -> String {
    "User".to_string()
}

/// A registered user account. The password is stored as a hash computed
/// upstream; this crate never sees plaintext credentials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    #[serde(flatten)]
    pub meta: EntityMeta,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub email: String,
    pub username: String,
    pub password_hash: String,
    #[serde(default = "default_role")]
    pub role: String,
}

impl UserAccount {
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            meta: EntityMeta::new(PARTITION_USERS, ""),
            first_name: String::new(),
            last_name: String::new(),
            phone_number: String::new(),
            email: String::new(),
            username: username.into(),
            password_hash: password_hash.into(),
            role: default_role(),
        }
    }
}

impl TableEntity for UserAccount {
    fn meta(&self) -> &EntityMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut EntityMeta {
        &mut self.meta
    }
}
