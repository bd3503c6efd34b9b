//! Error and warning reporting for crawlers
//!
//! Per-URL failures never abort a crawl; they are reported here instead.

use crate::registry::CrawlerId;
use std::error::Error;

/// Sink for non-fatal crawler errors and warnings
pub trait MessageService: Send + Sync {
    fn crawler_error(&self, crawler_id: CrawlerId, message: &str, cause: Option<&dyn Error>);

    fn crawler_warning(&self, crawler_id: CrawlerId, message: &str);
}

/// Default sink: forwards everything to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingMessageService;

impl MessageService for TracingMessageService {
    fn crawler_error(&self, crawler_id: CrawlerId, message: &str, cause: Option<&dyn Error>) {
        match cause {
            Some(cause) => tracing::error!(crawler = %crawler_id, "{}: {}", message, cause),
            None => tracing::error!(crawler = %crawler_id, "{}", message),
        }
    }

    fn crawler_warning(&self, crawler_id: CrawlerId, message: &str) {
        tracing::warn!(crawler = %crawler_id, "{}", message);
    }
}
