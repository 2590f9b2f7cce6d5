//! Contact-Ripple: a contact email finder
//!
//! This crate crawls outward from each website's homepage until an email
//! address turns up or a page budget runs out, and runs many such crawls
//! side by side for a batch of websites.

pub mod api;
pub mod batch;
pub mod config;
pub mod crawler;
pub mod url;

use thiserror::Error;

/// Main error type for Contact-Ripple operations
#[derive(Debug, Error)]
pub enum RippleError {
    #[error("Invalid seed URL '{url}': {source}")]
    InvalidSeed { url: String, source: UrlError },

    #[error("Seed URL unreachable: {url}: {message}")]
    SeedUnreachable { url: String, message: String },

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Crawl task failed: {0}")]
    Task(String),
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

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for Contact-Ripple operations
pub type Result<T> = std::result::Result<T, RippleError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use batch::{BatchOptions, BatchResult, BatchRunner, SiteRecord, SiteResult, SiteStatus};
pub use config::Config;
pub use crawler::{extract_emails, CrawlOutcome, SiteCrawler};
pub use crate::url::{base_origin, normalize_link, page_path};
