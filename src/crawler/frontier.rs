//! URL frontier of one crawler
//!
//! A FIFO queue of pending URLs plus the sets of URLs that are done, either
//! successfully or not. A URL is in at most one of pending, succeeded and
//! failed, and once done it is never queued again.

use crate::url::CanonicalUrl;
use std::collections::{HashSet, VecDeque};

/// Counts of frontier entries at one point in time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrontierStats {
    pub pending: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// Pending queue and done sets of one crawl run
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<CanonicalUrl>,
    queued: HashSet<CanonicalUrl>,
    succeeded: HashSet<CanonicalUrl>,
    failed: HashSet<CanonicalUrl>,
}

impl Frontier {
    /// Creates an empty frontier
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a frontier with skipped URLs pre-marked as succeeded and the
    /// given seeds queued in order
    ///
    /// A seed that is also skipped is not queued.
    pub fn seeded<S, P>(urls_to_skip: S, seeds: P) -> Self
    where
        S: IntoIterator<Item = CanonicalUrl>,
        P: IntoIterator<Item = CanonicalUrl>,
    {
        let mut frontier = Self {
            succeeded: urls_to_skip.into_iter().collect(),
            ..Self::default()
        };
        for seed in seeds {
            frontier.enqueue_if_new(seed);
        }
        frontier
    }

    /// Queues a URL unless it is already done or already pending
    ///
    /// Returns true if the URL was queued.
    pub fn enqueue_if_new(&mut self, url: CanonicalUrl) -> bool {
        if self.is_done(&url) || self.queued.contains(&url) {
            return false;
        }
        self.queued.insert(url.clone());
        self.queue.push_back(url);
        true
    }

    /// Pops the oldest pending URL, or None when nothing is pending
    pub fn next(&mut self) -> Option<CanonicalUrl> {
        let url = self.queue.pop_front()?;
        self.queued.remove(&url);
        Some(url)
    }

    /// Records a URL as successfully crawled
    ///
    /// Idempotent. The URL leaves pending and failed.
    pub fn mark_succeeded(&mut self, url: &CanonicalUrl) {
        self.remove_pending(url);
        self.failed.remove(url);
        self.succeeded.insert(url.clone());
    }

    /// Records a URL as failed
    ///
    /// Idempotent. The URL leaves pending and succeeded.
    pub fn mark_failed(&mut self, url: &CanonicalUrl) {
        self.remove_pending(url);
        self.succeeded.remove(url);
        self.failed.insert(url.clone());
    }

    /// True if the URL succeeded or failed
    pub fn is_done(&self, url: &CanonicalUrl) -> bool {
        self.succeeded.contains(url) || self.failed.contains(url)
    }

    pub fn is_pending(&self, url: &CanonicalUrl) -> bool {
        self.queued.contains(url)
    }

    pub fn is_failed(&self, url: &CanonicalUrl) -> bool {
        self.failed.contains(url)
    }

    pub fn is_succeeded(&self, url: &CanonicalUrl) -> bool {
        self.succeeded.contains(url)
    }

    pub fn pending_len(&self) -> usize {
        self.queue.len()
    }

    pub fn stats(&self) -> FrontierStats {
        FrontierStats {
            pending: self.queue.len(),
            succeeded: self.succeeded.len(),
            failed: self.failed.len(),
        }
    }

    fn remove_pending(&mut self, url: &CanonicalUrl) {
        if self.queued.remove(url) {
            self.queue.retain(|queued| queued != url);
        }
    }
}
