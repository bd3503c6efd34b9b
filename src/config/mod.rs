//! Configuration module for Ripple-Crawl
//!
//! Holds the in-memory configuration of one crawler and the loading,
//! parsing and validation of TOML configuration files that describe several
//! crawlers at once.
//!
//! # Example
//!
//! ```no_run
//! use ripple_crawl::config::load_config;
//! use std::path::Path;
//!
//! let file = load_config(Path::new("crawl.toml")).unwrap();
//! for config in file.crawler_configs().unwrap() {
//!     println!("Will crawl {}", config.host().unwrap());
//! }
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use crate::filter::TypeGroup;
pub use types::{
    CrawlerConfig, CrawlerConfigBuilder, CrawlerEntry, DefaultsConfig, FileConfig,
    DEFAULT_USER_AGENT,
};

// Re-export parser and validation functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::{parse_http_url, validate_seed_hosts};
