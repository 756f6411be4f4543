//! Well-known partition and table names.
//!
//! Partition keys are chosen by convention per entity type and are never
//! derived from entity data.

/// Partition key for category rows.
pub const PARTITION_CATEGORIES: &str = "Categories";

/// Partition key for product rows.
pub const PARTITION_PRODUCTS: &str = "Products";

/// Partition key for user account rows.
pub const PARTITION_USERS: &str = "Users";

/// Default backing table (partition in the storage backend) per entity type.
pub const TABLE_CATEGORIES: &str = "categories";
pub const TABLE_PRODUCTS: &str = "products";
pub const TABLE_USERS: &str = "users";

/// Directory on the contracts file share that holds employee contracts.
pub const CONTRACTS_DIRECTORY: &str = "employeecontracts";
