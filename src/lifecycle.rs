//! Server lifecycle management helpers.
//!
//! Encapsulates the heavy lifting so `main.rs` stays a thin
//! orchestrator: opening RocksDB, building the stores, wiring the HTTP
//! server, and coordinating graceful shutdown.

use crate::config::ServerConfig;
use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};
use log::{debug, info};
use retail_api::{configure_routes, AppContext};
use retail_commons::constants::{TABLE_CATEGORIES, TABLE_PRODUCTS, TABLE_USERS};
use retail_filestore::{build_object_store, BlobObjectStore, FileShareStore};
use retail_store::{CollisionPolicy, RocksDbBackend, StorageBackend, TableStore};
use rocksdb::{Options, DB};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Open the entity database, reattaching every column family created by
/// earlier runs.
fn open_database(data_path: &str) -> Result<Arc<DB>> {
    std::fs::create_dir_all(data_path)
        .with_context(|| format!("failed to create data directory '{}'", data_path))?;

    let mut opts = Options::default();
    opts.create_if_missing(true);
    opts.create_missing_column_families(true);

    let existing = DB::list_cf(&opts, data_path).unwrap_or_default();
    let db = if existing.is_empty() {
        DB::open(&opts, data_path)
    } else {
        DB::open_cf(&opts, data_path, existing)
    }
    .with_context(|| format!("failed to open database at '{}'", data_path))?;

    Ok(Arc::new(db))
}

/// Initialize RocksDB, the typed table stores, and both object stores.
pub async fn bootstrap(config: &ServerConfig) -> Result<AppContext> {
    let phase_start = std::time::Instant::now();
    let db = open_database(&config.storage.data_path)?;
    let backend: Arc<dyn StorageBackend> = Arc::new(RocksDbBackend::new(db));
    info!(
        "RocksDB initialized at {} ({:.2}ms)",
        config.storage.data_path,
        phase_start.elapsed().as_secs_f64() * 1000.0
    );

    let categories = TableStore::new(backend.clone(), TABLE_CATEGORIES, CollisionPolicy::Reject)?;
    // Product uploads are replayed by the catalog importer, so the last
    // write wins instead of erroring on a seen row key.
    let products = TableStore::new(backend.clone(), TABLE_PRODUCTS, CollisionPolicy::Overwrite)?;
    let users = TableStore::new(backend, TABLE_USERS, CollisionPolicy::Reject)?;
    debug!("Entity tables ready: categories, products, users");

    let op_timeout = Duration::from_secs(config.storage.op_timeout_secs);

    let contracts_store =
        build_object_store(&config.storage.contracts.location, &config.storage.remote)?;
    let contracts = FileShareStore::new(contracts_store, op_timeout);
    // Provision the share directory once at startup; handlers never
    // create directories as a side effect.
    contracts
        .create_directory(&config.storage.contracts.directory)
        .await
        .with_context(|| {
            format!(
                "failed to provision contracts directory '{}'",
                config.storage.contracts.directory
            )
        })?;
    info!("Contracts share ready: directory '{}'", config.storage.contracts.directory);

    let images_store = build_object_store(&config.storage.images.location, &config.storage.remote)?;
    let public_base_url = Url::parse(&config.storage.images.public_base_url).with_context(|| {
        format!(
            "invalid images.public_base_url '{}'",
            config.storage.images.public_base_url
        )
    })?;
    let images = BlobObjectStore::new(images_store, public_base_url, op_timeout);
    info!("Image container ready: {}", config.storage.images.public_base_url);

    Ok(AppContext {
        categories,
        products,
        users,
        contracts,
        contracts_directory: config.storage.contracts.directory.clone(),
        images,
        registration_lock: tokio::sync::Mutex::new(()),
    })
}

/// Start the HTTP server and manage graceful shutdown.
pub async fn run(config: &ServerConfig, app_context: AppContext) -> Result<()> {
    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Starting HTTP server on {}", bind_addr);

    let data = web::Data::new(app_context);

    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .configure(configure_routes)
    })
    .keep_alive(Duration::from_secs(config.server.keepalive_timeout))
    .bind(&bind_addr)?;

    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    let server = server.run();
    let server_handle = server.handle();
    let server_task = tokio::spawn(server);

    tokio::select! {
        result = server_task => {
            if let Err(e) = result {
                log::error!("Server task failed: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
            server_handle.stop(true).await;
        }
    }

    info!("Server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ContractsSettings, ImagesSettings};
    use retail_filestore::StorageLocation;

    fn test_config(root: &std::path::Path) -> ServerConfig {
        let mut config = ServerConfig::default();
        config.storage.data_path = root.join("tables").to_string_lossy().into_owned();
        config.storage.contracts = ContractsSettings {
            location: StorageLocation::Local {
                base_directory: root.join("contracts").to_string_lossy().into_owned(),
            },
            directory: "employeecontracts".to_string(),
        };
        config.storage.images = ImagesSettings {
            location: StorageLocation::Local {
                base_directory: root.join("images").to_string_lossy().into_owned(),
            },
            public_base_url: "http://127.0.0.1:8080/images".to_string(),
        };
        config
    }

    #[tokio::test]
    async fn test_bootstrap_provisions_stores() {
        let temp = tempfile::tempdir().unwrap();
        let config = test_config(temp.path());

        let ctx = bootstrap(&config).await.unwrap();

        // Contracts directory was provisioned during bootstrap
        let names = ctx.contracts.list_files(&ctx.contracts_directory).await.unwrap();
        assert!(names.is_empty());

        // Entity tables accept writes immediately
        let category = retail_commons::models::Category::new("Categories", "Shoes");
        let stored = ctx.categories.add_async(category).await.unwrap();
        assert!(stored.meta.etag.is_some());
    }

    #[tokio::test]
    async fn test_bootstrap_reopens_existing_database() {
        let temp = tempfile::tempdir().unwrap();
        let config = test_config(temp.path());

        let row_key;
        {
            let ctx = bootstrap(&config).await.unwrap();
            let stored = ctx
                .categories
                .add_async(retail_commons::models::Category::new("Categories", "Books"))
                .await
                .unwrap();
            row_key = stored.meta.row_key.clone();
        }

        // Second bootstrap reattaches the column families from disk
        let ctx = bootstrap(&config).await.unwrap();
        let found = ctx.categories.get_async("Categories", &row_key).await.unwrap();
        assert_eq!(found.unwrap().name, "Books");
    }
}
