//! Configuration module for Netco-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! `Config::default()` carries the production site settings, so a config file
//! is only needed to override them.
//!
//! # Example
//!
//! ```no_run
//! use netco_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Downloading into: {}", config.download.documents_dir);
//! ```

mod parser;
mod types;
mod validation;

pub use types::{Config, DownloadConfig, OutputConfig, SiteConfig, UserAgentConfig};

pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
