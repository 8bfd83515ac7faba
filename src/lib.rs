//! sdf-pipeline: a depth-driven scraping pipeline
//!
//! This crate implements a two-stage scraper. The collector walks seed pages
//! through a YAML-described tree of extraction rules and writes the leaf URLs
//! to a list; the fetcher downloads every listed URL with per-site logic.

pub mod config;
pub mod crawler;
pub mod output;
pub mod plugin;
pub mod storage;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for pipeline operations
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("URL list not found: {}", path.display())]
    UrlListMissing { path: PathBuf },

    #[error("Plugin {plugin} does not support {method} (required by depth{depth})")]
    UnsupportedMethod {
        plugin: String,
        method: plugin::ExtractionMethod,
        depth: usize,
    },

    #[error("Failed to serialize fetch result for {url}: {source}")]
    Serialize {
        url: String,
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

// Re-export commonly used types
pub use config::{Config, DepthRule, DepthSpec};
pub use crawler::{DepthTraversal, FetchResult, PageFetchClient, TraversalStats};
pub use plugin::{ExtractionMethod, PluginKey, PluginRegistry, SiteExtractor, SiteFetcher};
