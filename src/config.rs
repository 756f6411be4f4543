//! Server configuration loaded from `config.toml`.

use anyhow::Context;
use retail_filestore::{RemoteTimeouts, StorageLocation};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main server configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// 0 lets actix pick one worker per logical CPU.
    #[serde(default)]
    pub workers: usize,
    #[serde(default = "default_keepalive_timeout")]
    pub keepalive_timeout: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: 0,
            keepalive_timeout: default_keepalive_timeout(),
        }
    }
}

/// Storage settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    /// RocksDB directory for the entity tables.
    #[serde(default = "default_data_path")]
    pub data_path: String,

    /// Per-operation deadline for file and blob stores, in seconds.
    #[serde(default = "default_op_timeout_secs")]
    pub op_timeout_secs: u64,

    /// Timeouts for remote object-store clients.
    #[serde(default)]
    pub remote: RemoteTimeouts,

    #[serde(default)]
    pub contracts: ContractsSettings,

    #[serde(default)]
    pub images: ImagesSettings,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
            op_timeout_secs: default_op_timeout_secs(),
            remote: RemoteTimeouts::default(),
            contracts: ContractsSettings::default(),
            images: ImagesSettings::default(),
        }
    }
}

/// Employee contract file share settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractsSettings {
    #[serde(default = "default_contracts_location")]
    pub location: StorageLocation,
    #[serde(default = "default_contracts_directory")]
    pub directory: String,
}

impl Default for ContractsSettings {
    fn default() -> Self {
        Self {
            location: default_contracts_location(),
            directory: default_contracts_directory(),
        }
    }
}

/// Product image blob container settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImagesSettings {
    #[serde(default = "default_images_location")]
    pub location: StorageLocation,
    /// Externally reachable root of the container; uploaded image URLs
    /// are formed by appending the blob name.
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
}

impl Default for ImagesSettings {
    fn default() -> Self {
        Self {
            location: default_images_location(),
            public_base_url: default_public_base_url(),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_file")]
    pub file_path: String,
    #[serde(default = "default_true")]
    pub log_to_console: bool,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file_path: default_log_file(),
            log_to_console: true,
            format: default_log_format(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_keepalive_timeout() -> u64 {
    75
}

fn default_data_path() -> String {
    "./data/tables".to_string()
}

fn default_op_timeout_secs() -> u64 {
    60
}

fn default_contracts_location() -> StorageLocation {
    StorageLocation::Local {
        base_directory: "./data/contracts".to_string(),
    }
}

fn default_contracts_directory() -> String {
    retail_commons::constants::CONTRACTS_DIRECTORY.to_string()
}

fn default_images_location() -> StorageLocation {
    StorageLocation::Local {
        base_directory: "./data/images".to_string(),
    }
}

fn default_public_base_url() -> String {
    "http://127.0.0.1:8080/images".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "./logs/server.log".to_string()
}

fn default_log_format() -> String {
    "compact".to_string()
}

fn default_true() -> bool {
    true
}

impl ServerConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("failed to parse config file '{}'", path.display()))
    }
}
