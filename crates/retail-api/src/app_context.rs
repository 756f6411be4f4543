//! Shared application state handed to every handler.

use retail_commons::models::{Category, Product, UserAccount};
use retail_filestore::{BlobObjectStore, FileShareStore};
use retail_store::TableStore;
use tokio::sync::Mutex;

/// The stores the HTTP layer re-exposes. Built once at startup and
/// shared across workers through `web::Data`.
pub struct AppContext {
    pub categories: TableStore<Category>,
    pub products: TableStore<Product>,
    pub users: TableStore<UserAccount>,
    pub contracts: FileShareStore,
    pub contracts_directory: String,
    pub images: BlobObjectStore,
    /// Serializes registration so the username uniqueness check and the
    /// insert happen as one step. Sufficient because this process is
    /// the only writer of the users table.
    pub registration_lock: Mutex<()>,
}
