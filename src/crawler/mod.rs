//! Crawler module for page fetching and the crawl loop
//!
//! This module contains the core crawling logic, including:
//! - The per-crawler URL frontier
//! - The pause gate shared by the crawl loop and control calls
//! - HTTP fetching and HTML parsing
//! - The crawl engine and its state machine

mod document;
mod engine;
mod fetcher;
mod frontier;
mod gate;
mod messages;

pub use document::Document;
pub use engine::CrawlEngine;
pub use fetcher::{build_http_client, HttpFetcher, PageFetcher};
pub use frontier::{Frontier, FrontierStats};
pub use messages::{MessageService, TracingMessageService};
