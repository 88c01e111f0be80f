//! Storefront-Watch: a storefront stock monitor
//!
//! This crate polls storefront `products.json` endpoints on a fixed interval,
//! extracts product and variant availability, and keeps the result together
//! with the list of tracked sites in a single JSON store file.

pub mod commands;
pub mod config;
pub mod monitor;
pub mod output;
pub mod storage;
pub mod store;

use thiserror::Error;

/// Main error type for Storefront-Watch operations
#[derive(Debug, Error)]
pub enum WatchError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Target store error: {0}")]
    Store(#[from] store::StoreError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for Storefront-Watch operations
pub type Result<T> = std::result::Result<T, WatchError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use monitor::{CycleReport, Monitor};
pub use storage::{JsonFileStorage, Storage};
pub use store::{OpaqueValue, Product, Target, TargetStore, Variant};
