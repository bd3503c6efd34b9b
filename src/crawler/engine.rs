//! Crawl engine: the state machine and crawl loop of one crawler
//!
//! # Crawl Loop
//!
//! 1. Pop the next URL from the frontier (FIFO)
//! 2. Fetch it
//! 3. Mark it succeeded, extract and filter its links, publish page events
//! 4. Queue the on-host links that were never seen before
//! 5. Repeat until the frontier is empty or the crawler is stopped
//!
//! Each step runs while holding the pause gate, so a pause takes effect at
//! the next step boundary. Only a failure to fetch the first URL ends the
//! crawl with `Failed`; later fetch failures are reported and skipped.

use crate::config::CrawlerConfig;
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::frontier::{Frontier, FrontierStats};
use crate::crawler::gate::Gate;
use crate::crawler::messages::MessageService;
use crate::events::{
    CrawlerEvent, DataAcquiredEvent, EventBus, LinksExtractedEvent, PageDataAcquiredEvent,
};
use crate::filter::filter_links;
use crate::registry::CrawlerId;
use crate::state::CrawlerState;
use crate::url::{is_on_host, CanonicalUrl};
use crate::ConfigResult;
use chrono::Utc;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{watch, SemaphorePermit};
use url::Url;

/// How processing of one URL ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Processed {
    Completed,
    FetchFailed,
    /// The gate closed because the crawler reached a terminal state
    Interrupted,
}

/// One crawler: configuration, frontier, lifecycle state and pause gate
pub struct CrawlEngine {
    id: CrawlerId,
    host: String,
    config: CrawlerConfig,
    fetcher: Arc<dyn PageFetcher>,
    bus: EventBus,
    messages: Arc<dyn MessageService>,
    frontier: Mutex<Frontier>,
    state: watch::Sender<CrawlerState>,
    gate: Gate,
}

impl CrawlEngine {
    /// Creates an engine in state `New`
    ///
    /// Fails if the configuration has no initial URL or its initial URLs
    /// span more than one host.
    pub fn new(
        id: CrawlerId,
        config: CrawlerConfig,
        fetcher: Arc<dyn PageFetcher>,
        bus: EventBus,
        messages: Arc<dyn MessageService>,
    ) -> ConfigResult<Self> {
        let host = config.host()?;

        let frontier = Frontier::seeded(
            config.urls_to_skip.iter().cloned().map(CanonicalUrl::new),
            config.initial_urls.iter().cloned().map(CanonicalUrl::new),
        );
        let (state, _) = watch::channel(CrawlerState::New);

        Ok(Self {
            id,
            host,
            config,
            fetcher,
            bus,
            messages,
            frontier: Mutex::new(frontier),
            state,
            gate: Gate::new(),
        })
    }

    pub fn id(&self) -> CrawlerId {
        self.id
    }

    /// The host every crawled URL belongs to
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn config(&self) -> &CrawlerConfig {
        &self.config
    }

    pub fn state(&self) -> CrawlerState {
        *self.state.borrow()
    }

    pub fn frontier_stats(&self) -> FrontierStats {
        self.frontier().stats()
    }

    /// Receiver that observes every state change from now on
    pub fn watch_state(&self) -> watch::Receiver<CrawlerState> {
        self.state.subscribe()
    }

    /// Waits until the crawler reaches a terminal state and returns it
    pub async fn wait_until_done(&self) -> CrawlerState {
        let mut state = self.state.subscribe();
        let done = state.wait_for(CrawlerState::is_terminal).await.map(|s| *s);
        done.unwrap_or_else(|_| self.state())
    }

    /// Runs the crawl loop to completion and returns the final state
    ///
    /// Only a `New` engine starts. Starting it again warns "Crawler already
    /// started." and returns the current state without running a second
    /// loop, so a finished, failed or stopped crawler is never revived.
    ///
    /// Once the loop ends, every event subscription of this crawler is
    /// dropped from the bus.
    pub async fn run(&self) -> CrawlerState {
        if self.transition(&[CrawlerState::New], CrawlerState::Running).is_none() {
            self.messages.crawler_warning(self.id, "Crawler already started.");
            return self.state();
        }

        tracing::info!(crawler = %self.id, "Starting crawl of {}", self.host);

        let mut is_seed = true;
        loop {
            let url = {
                let Some(_permit) = self.enter().await else {
                    break;
                };
                let next = self.frontier().next();
                match next {
                    Some(url) => url,
                    None => {
                        tracing::info!(crawler = %self.id, "Frontier is empty, crawl complete");
                        self.transition(&[CrawlerState::Running], CrawlerState::Finished);
                        break;
                    }
                }
            };

            if !is_seed && !self.config.crawl_delay.is_zero() {
                tokio::time::sleep(self.config.crawl_delay).await;
            }

            match self.process_url(&url).await {
                Processed::Completed => {}
                Processed::FetchFailed if is_seed => {
                    if let Some(_permit) = self.gate.pass().await {
                        self.transition(&[CrawlerState::Running], CrawlerState::Failed);
                    }
                    break;
                }
                Processed::FetchFailed => {}
                Processed::Interrupted => break,
            }
            is_seed = false;
        }

        let stats = self.frontier_stats();
        tracing::info!(
            crawler = %self.id,
            "Crawl ended in state {}: {} succeeded, {} failed, {} pending",
            self.state(),
            stats.succeeded,
            stats.failed,
            stats.pending
        );

        let removed = self.bus.remove_crawler(self.id);
        tracing::trace!(crawler = %self.id, "Dropped {} event subscriptions", removed);

        self.state()
    }

    /// Pauses a running crawler
    ///
    /// Waits for the step in progress to finish, then blocks the loop before
    /// its next step. Returns true if the crawler is now paused.
    pub async fn pause(&self) -> bool {
        let current = self.state();
        if current != CrawlerState::Running {
            self.messages
                .crawler_warning(self.id, &format!("Cannot pause crawler in state {}.", current));
            return false;
        }

        if !self.gate.hold().await {
            if !self.gate.is_closed() {
                self.messages.crawler_warning(self.id, "Crawler is already pausing.");
            }
            return false;
        }

        if self.transition(&[CrawlerState::Running], CrawlerState::Paused).is_some() {
            true
        } else {
            // Stopped or finished while waiting for the gate
            self.gate.release();
            false
        }
    }

    /// Resumes a paused crawler; returns true if it is running again
    pub fn resume(&self) -> bool {
        if self.transition(&[CrawlerState::Paused], CrawlerState::Running).is_none() {
            self.messages.crawler_warning(
                self.id,
                &format!("Cannot resume crawler in state {}.", self.state()),
            );
            return false;
        }

        self.gate.release();
        true
    }

    /// Stops a running or paused crawler
    ///
    /// A fetch already in flight completes, but nothing after it runs.
    /// Returns true if the crawler is now stopped.
    pub fn stop(&self) -> bool {
        let stopped = self
            .transition(&[CrawlerState::Running, CrawlerState::Paused], CrawlerState::Stopped)
            .is_some();

        if !stopped {
            self.messages.crawler_warning(
                self.id,
                &format!("Cannot stop crawler in state {}.", self.state()),
            );
        }
        stopped
    }

    /// Fetch, extract and enqueue phases for one URL
    async fn process_url(&self, url: &CanonicalUrl) -> Processed {
        let document = {
            let Some(_permit) = self.enter().await else {
                return Processed::Interrupted;
            };

            tracing::debug!(crawler = %self.id, "Fetching {}", url);
            match self.fetcher.fetch(url.as_url(), &self.config.user_agent).await {
                Ok(document) => document,
                Err(e) => {
                    self.frontier().mark_failed(url);
                    self.messages.crawler_error(
                        self.id,
                        &format!("Failed to fetch {}", url),
                        Some(&e),
                    );
                    return Processed::FetchFailed;
                }
            }
        };

        let links_on_host = {
            let Some(_permit) = self.enter().await else {
                return Processed::Interrupted;
            };

            self.frontier().mark_succeeded(url);

            let links = self.parse_links(url, document.anchor_hrefs());
            let (on_host, off_host): (Vec<Url>, Vec<Url>) = links
                .iter()
                .cloned()
                .partition(|link| is_on_host(link, &self.host));

            tracing::debug!(
                crawler = %self.id,
                "Extracted {} links from {} ({} on host)",
                links.len(),
                url,
                on_host.len()
            );

            let location = url.as_url().clone();
            let occurred_at = Utc::now();
            self.bus.publish(CrawlerEvent::PageDataAcquired(PageDataAcquiredEvent {
                crawler_id: self.id,
                location: location.clone(),
                title: document.title().to_string(),
                html: document.outer_html().to_string(),
                links_off_domain: off_host,
                links_on_domain: on_host.clone(),
                occurred_at,
            }));
            self.bus.publish(CrawlerEvent::DataAcquired(DataAcquiredEvent {
                crawler_id: self.id,
                location: location.clone(),
                title: document.title().to_string(),
                html: document.outer_html().to_string(),
                occurred_at,
            }));
            self.bus.publish(CrawlerEvent::LinksExtracted(LinksExtractedEvent {
                crawler_id: self.id,
                source: location,
                links,
                occurred_at,
            }));

            on_host
        };

        {
            let Some(_permit) = self.enter().await else {
                return Processed::Interrupted;
            };

            let mut frontier = self.frontier();
            let mut queued = 0;
            for link in links_on_host {
                if frontier.enqueue_if_new(CanonicalUrl::new(link)) {
                    queued += 1;
                }
            }
            tracing::trace!(crawler = %self.id, "Queued {} new URLs from {}", queued, url);
        }

        Processed::Completed
    }

    /// Filters the hrefs of a page and parses the survivors
    ///
    /// Malformed links are reported and dropped.
    fn parse_links(&self, source: &CanonicalUrl, hrefs: &[String]) -> Vec<Url> {
        filter_links(hrefs, &self.config.excluded_types)
            .into_iter()
            .filter_map(|link| match Url::parse(&link) {
                Ok(url) => Some(url),
                Err(e) => {
                    self.messages.crawler_error(
                        self.id,
                        &format!("Malformed link '{}' on {}", link, source),
                        Some(&e),
                    );
                    None
                }
            })
            .collect()
    }

    /// Moves to `to` if the current state is one of `from`
    ///
    /// Publishes the state change before any later transition can happen and
    /// returns the previous state. Reaching a terminal state closes the gate.
    fn transition(&self, from: &[CrawlerState], to: CrawlerState) -> Option<CrawlerState> {
        let mut previous = None;

        self.state.send_if_modified(|current| {
            if !from.contains(current) || !current.can_transition_to(to) {
                return false;
            }
            previous = Some(*current);
            self.bus
                .publish(CrawlerEvent::state_changed(self.id, *current, to));
            *current = to;
            true
        });

        if let Some(old) = previous {
            tracing::info!(crawler = %self.id, "State {} -> {}", old, to);
            if to.is_terminal() {
                self.gate.close();
            }
        }
        previous
    }

    /// Passes the gate unless the crawler already ended
    ///
    /// A terminal state is published before the gate closes, so a pass can
    /// succeed in between.
    async fn enter(&self) -> Option<SemaphorePermit<'_>> {
        let permit = self.gate.pass().await?;
        if self.state().is_terminal() {
            return None;
        }
        Some(permit)
    }

    fn frontier(&self) -> MutexGuard<'_, Frontier> {
        self.frontier.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for CrawlEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrawlEngine")
            .field("id", &self.id)
            .field("host", &self.host)
            .field("state", &self.state())
            .finish()
    }
}
