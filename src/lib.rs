//! Ripple-Crawl: a single-host web crawler engine
//!
//! This crate runs many independent crawlers inside one process. Each crawler
//! starts from seed URLs on one host, follows same-host links exactly once,
//! filters links by content type, and can be paused, resumed and stopped while
//! it runs. Progress is published to subscribers through an event bus.

pub mod config;
pub mod crawler;
pub mod events;
pub mod filter;
pub mod registry;
pub mod state;
pub mod url;

use thiserror::Error;

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

    #[error("No initial URL specified")]
    NoInitialUrls,

    #[error("Distinct hosts in initial URLs: {}", .0.join(", "))]
    DistinctHosts(Vec<String>),

    #[error("Unknown content type group: {0}")]
    UnknownTypeGroup(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Missing host in URL: {0}")]
    MissingHost(String),
}

/// Errors produced while fetching a single page
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Expected HTML from {url}, got {content_type}")]
    ContentMismatch { url: String, content_type: String },

    #[error("Cannot get HTML from {url}: {message}")]
    Unavailable { url: String, message: String },
}

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

/// Result type alias for fetch operations
pub type FetchResult<T> = std::result::Result<T, FetchError>;

// Re-export commonly used types
pub use config::CrawlerConfig;
pub use crawler::{CrawlEngine, Document, HttpFetcher, MessageService, PageFetcher};
pub use events::{CrawlerEvent, EventBus, EventKind};
pub use filter::TypeGroup;
pub use registry::{CrawlerId, CrawlerInfo, CrawlerRegistry};
pub use state::CrawlerState;
pub use crate::url::CanonicalUrl;
