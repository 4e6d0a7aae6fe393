//! Linkwalk: a single-threaded, frontier-driven web crawler
//!
//! This crate walks the web from a seed URL, extracting outbound hyperlinks
//! with a forward-only streaming scanner, deduplicating them against a
//! frontier store, and recording the pages a caller-supplied predicate accepts.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod storage;

use thiserror::Error;

/// Main error type for crawl operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] crawler::FetchError),
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

/// Result type alias for crawl operations
pub type Result<T> = std::result::Result<T, CrawlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlLimits, CrawlStats, Crawler, HttpFetcher, TermMatcher};
pub use extract::LinkExtractor;
pub use storage::{FrontierStore, MemoryFrontier, SqliteFrontier};
