//! Registry of crawlers in a process
//!
//! The registry owns every engine, assigns identities and forwards control
//! calls. Control calls for an unknown identity are silently ignored.
//!
//! # Example
//!
//! ```no_run
//! use ripple_crawl::{CrawlerConfig, CrawlerRegistry, HttpFetcher};
//! use std::sync::Arc;
//! use tokio::runtime::Handle;
//! use url::Url;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = CrawlerRegistry::new(Handle::current(), Arc::new(HttpFetcher::new()?));
//! let config = CrawlerConfig::builder()
//!     .initial_url(Url::parse("https://example.com/")?)
//!     .build();
//!
//! let id = registry.register(config)?;
//! registry.subscribe_data_acquired(id, |page| println!("{}: {}", page.location, page.title));
//! registry.start(id);
//! registry.wait_until_done(id).await;
//! # Ok(())
//! # }
//! ```

mod id;
mod info;

pub use id::{CrawlerId, IdProvider, RandomIds, SequentialIds};
pub use info::CrawlerInfo;

use crate::config::CrawlerConfig;
use crate::crawler::{CrawlEngine, MessageService, PageFetcher, TracingMessageService};
use crate::events::{
    DataAcquiredEvent, EventBus, LinksExtractedEvent, PageDataAcquiredEvent, StateChangedEvent,
};
use crate::state::CrawlerState;
use crate::ConfigResult;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::runtime::Handle;

/// Owner of all crawlers of a process
pub struct CrawlerRegistry {
    crawlers: DashMap<CrawlerId, Arc<CrawlEngine>>,
    bus: EventBus,
    runtime: Handle,
    fetcher: Arc<dyn PageFetcher>,
    ids: Arc<dyn IdProvider>,
    messages: Arc<dyn MessageService>,
}

impl CrawlerRegistry {
    /// Creates an empty registry
    ///
    /// Crawl loops and event handlers run on `runtime`; every crawler fetches
    /// through `fetcher`.
    pub fn new(runtime: Handle, fetcher: Arc<dyn PageFetcher>) -> Self {
        Self {
            crawlers: DashMap::new(),
            bus: EventBus::new(runtime.clone()),
            runtime,
            fetcher,
            ids: Arc::new(RandomIds),
            messages: Arc::new(TracingMessageService),
        }
    }

    pub fn with_id_provider(mut self, ids: impl IdProvider + 'static) -> Self {
        self.ids = Arc::new(ids);
        self
    }

    pub fn with_message_service(mut self, messages: impl MessageService + 'static) -> Self {
        self.messages = Arc::new(messages);
        self
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.bus
    }

    /// Creates a crawler for `config` and returns its identity
    ///
    /// Nothing is registered if the initial URLs are empty or span more than
    /// one host.
    pub fn register(&self, config: CrawlerConfig) -> ConfigResult<CrawlerId> {
        let id = self.ids.next_id();
        let engine = CrawlEngine::new(
            id,
            config,
            Arc::clone(&self.fetcher),
            self.bus.clone(),
            Arc::clone(&self.messages),
        )?;

        tracing::info!(crawler = %id, "Registered crawler for {}", engine.host());
        self.crawlers.insert(id, Arc::new(engine));
        Ok(id)
    }

    pub fn get_info(&self, id: CrawlerId) -> Option<CrawlerInfo> {
        self.engine(id).map(|engine| CrawlerInfo::of(&engine))
    }

    /// Snapshots of all crawlers, ordered by identity
    pub fn list(&self) -> Vec<CrawlerInfo> {
        let mut infos: Vec<CrawlerInfo> = self
            .crawlers
            .iter()
            .map(|entry| CrawlerInfo::of(entry.value()))
            .collect();
        infos.sort_by_key(|info| info.id);
        infos
    }

    pub fn len(&self) -> usize {
        self.crawlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.crawlers.is_empty()
    }

    /// Spawns the crawl loop on the runtime and returns immediately
    pub fn start(&self, id: CrawlerId) {
        if let Some(engine) = self.engine(id) {
            self.runtime.spawn(async move {
                engine.run().await;
            });
        }
    }

    /// Pauses a running crawler once its current step is done
    pub async fn pause(&self, id: CrawlerId) {
        if let Some(engine) = self.engine(id) {
            engine.pause().await;
        }
    }

    pub fn resume(&self, id: CrawlerId) {
        if let Some(engine) = self.engine(id) {
            engine.resume();
        }
    }

    pub fn stop(&self, id: CrawlerId) {
        if let Some(engine) = self.engine(id) {
            engine.stop();
        }
    }

    /// Stops every crawler that is still running or paused
    pub fn stop_all(&self) {
        let active: Vec<Arc<CrawlEngine>> = self
            .crawlers
            .iter()
            .filter(|entry| entry.value().state().is_active())
            .map(|entry| Arc::clone(entry.value()))
            .collect();

        for engine in active {
            engine.stop();
        }
    }

    /// Waits until the crawler reaches a terminal state
    ///
    /// Returns None for an unknown identity.
    pub async fn wait_until_done(&self, id: CrawlerId) -> Option<CrawlerState> {
        let engine = self.engine(id)?;
        Some(engine.wait_until_done().await)
    }

    /// Registers a state change handler; returns false for an unknown identity
    pub fn subscribe_state_changed<F>(&self, id: CrawlerId, handler: F) -> bool
    where
        F: Fn(&StateChangedEvent) + Send + Sync + 'static,
    {
        if !self.is_known(id) {
            return false;
        }
        self.bus.subscribe_state_changed(id, handler);
        true
    }

    pub fn subscribe_page_data_acquired<F>(&self, id: CrawlerId, handler: F) -> bool
    where
        F: Fn(&PageDataAcquiredEvent) + Send + Sync + 'static,
    {
        if !self.is_known(id) {
            return false;
        }
        self.bus.subscribe_page_data_acquired(id, handler);
        true
    }

    pub fn subscribe_data_acquired<F>(&self, id: CrawlerId, handler: F) -> bool
    where
        F: Fn(&DataAcquiredEvent) + Send + Sync + 'static,
    {
        if !self.is_known(id) {
            return false;
        }
        self.bus.subscribe_data_acquired(id, handler);
        true
    }

    pub fn subscribe_links_extracted<F>(&self, id: CrawlerId, handler: F) -> bool
    where
        F: Fn(&LinksExtractedEvent) + Send + Sync + 'static,
    {
        if !self.is_known(id) {
            return false;
        }
        self.bus.subscribe_links_extracted(id, handler);
        true
    }

    fn is_known(&self, id: CrawlerId) -> bool {
        self.crawlers.contains_key(&id)
    }

    // The map guard is dropped before the engine is used
    fn engine(&self, id: CrawlerId) -> Option<Arc<CrawlEngine>> {
        self.crawlers.get(&id).map(|entry| Arc::clone(entry.value()))
    }
}

impl std::fmt::Debug for CrawlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrawlerRegistry")
            .field("crawlers", &self.crawlers.len())
            .field("bus", &self.bus)
            .finish()
    }
}
