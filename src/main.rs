//! Retail storage server entrypoint.
//!
//! The heavy lifting (store bootstrapping, HTTP wiring, graceful
//! shutdown) lives in dedicated modules so this file remains a thin
//! orchestrator.

mod config;
mod lifecycle;
mod logging;

use anyhow::Result;
use config::ServerConfig;
use lifecycle::{bootstrap, run};
use log::info;

#[actix_web::main]
async fn main() -> Result<()> {
    let config_path = std::env::args().nth(1).unwrap_or_else(|| "config.toml".to_string());

    let config = if std::path::Path::new(&config_path).exists() {
        let cfg = match ServerConfig::from_file(&config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("FATAL: failed to load {}: {:#}", config_path, e);
                std::process::exit(1);
            }
        };
        eprintln!("Loaded config from: {}", config_path);
        cfg
    } else {
        eprintln!("No config file at '{}', using defaults", config_path);
        ServerConfig::default()
    };

    // Logging before any other side effects
    logging::init_logging(
        &config.logging.level,
        &config.logging.file_path,
        config.logging.log_to_console,
        &config.logging.format,
    )?;

    info!("Retail storage server v{}", env!("CARGO_PKG_VERSION"));
    info!("Host: {}  Port: {}", config.server.host, config.server.port);

    let app_context = bootstrap(&config).await?;
    run(&config, app_context).await
}
