//! Driftnet: a depth-bounded concurrent web crawler
//!
//! This crate crawls outward from a seed URL up to a configurable link
//! depth, deduplicating discoveries across a bounded pool of concurrent
//! workers and optionally downloading embedded resources such as images.

pub mod config;
pub mod crawler;
pub mod output;
pub mod url;

use thiserror::Error;

/// Main error type for Driftnet operations.
///
/// Per-URL fetch and per-resource download failures are deliberately not
/// represented here: they are isolated, recorded as result records, and
/// never abort a run. `CrawlError` covers only run-fatal conditions.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid seed URL {url}: {reason}")]
    InvalidSeed { url: String, reason: String },

    #[error("Failed to create resource store at {path}: {source}")]
    StoreUnavailable {
        path: String,
        source: std::io::Error,
    },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

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

    #[error("Invalid seed URL: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Driftnet operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::{CrawlConfig, PartitionConfig};
pub use crawler::{crawl, CrawlReport, ResultRecord, RunPhase, ShutdownCoordinator};
