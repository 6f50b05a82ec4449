//! Netco-Harvest: a document listing harvester
//!
//! This crate walks the paginated document tables of a corporate website,
//! extracts one record per listed document, collapses duplicate listings and
//! downloads the referenced files into a per-category folder layout.

pub mod catalog;
pub mod config;
pub mod crawler;
pub mod dedup;
pub mod download;
pub mod output;
pub mod state;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Netco-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Cannot read bootstrap page for category {category} at {path}: {source}")]
    BootstrapRead {
        category: String,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Cannot create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Download worker pool closed: {0}")]
    WorkerPool(#[from] tokio::sync::AcquireError),
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

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Netco-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use catalog::{Category, CategoryResultSet, DocumentRecord};
pub use config::Config;
pub use state::DownloadState;
