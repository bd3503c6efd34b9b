//! Per-crawler publish/subscribe registry.
//!
//! # Guarantees
//!
//! - **Asynchronous dispatch**: `publish` never runs a handler inline. Each
//!   subscription owns a channel drained by its own task on the runtime, and
//!   every handler call runs on the runtime's blocking pool, so a slow handler
//!   never holds an async worker.
//! - **Per-subscriber ordering**: one handler sees events in publish order.
//!   There is no ordering between different handlers.
//! - **Isolation**: a panicking handler is logged and keeps receiving; it
//!   cannot block the publisher or other handlers.
//! - **In-memory only**: events published before a subscription are not
//!   replayed.
//! - **Lifetime**: a drain task ends once its crawler is removed with
//!   [`EventBus::remove_crawler`] and the queued events are handled.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::runtime::Handle;
use tokio::sync::mpsc;

use crate::events::types::{
    CrawlerEvent, DataAcquiredEvent, EventKind, LinksExtractedEvent, PageDataAcquiredEvent,
    StateChangedEvent,
};
use crate::registry::CrawlerId;

type Subscription = mpsc::UnboundedSender<Arc<CrawlerEvent>>;
type Handler = Arc<dyn Fn(&CrawlerEvent) + Send + Sync>;

/// Dispatch table keyed by `(crawler, event kind)`.
///
/// Cloning is cheap; clones share the same table.
#[derive(Clone)]
pub struct EventBus {
    subscriptions: Arc<DashMap<(CrawlerId, EventKind), Vec<Subscription>>>,
    runtime: Handle,
}

impl EventBus {
    /// Create a bus whose handlers run on the given runtime.
    pub fn new(runtime: Handle) -> Self {
        Self {
            subscriptions: Arc::new(DashMap::new()),
            runtime,
        }
    }

    /// Register one more handler for a `(crawler, kind)` pair.
    ///
    /// Handlers for the same pair are all invoked; their relative order is
    /// unspecified.
    pub fn subscribe<F>(&self, crawler_id: CrawlerId, kind: EventKind, handler: F)
    where
        F: Fn(&CrawlerEvent) + Send + Sync + 'static,
    {
        let handler: Handler = Arc::new(handler);
        let (sender, mut receiver) = mpsc::unbounded_channel::<Arc<CrawlerEvent>>();
        let runtime = self.runtime.clone();

        self.runtime.spawn(async move {
            while let Some(event) = receiver.recv().await {
                let handler = Arc::clone(&handler);
                // Awaited before the next event so one handler sees them in order
                let outcome = runtime.spawn_blocking(move || handler(&*event)).await;

                match outcome {
                    Ok(()) => {}
                    Err(e) if e.is_panic() => {
                        tracing::error!(crawler = %crawler_id, %kind, "Event handler panicked");
                    }
                    // Runtime is shutting down
                    Err(_) => break,
                }
            }
        });

        self.subscriptions
            .entry((crawler_id, kind))
            .or_default()
            .push(sender);
    }

    pub fn subscribe_state_changed<F>(&self, crawler_id: CrawlerId, handler: F)
    where
        F: Fn(&StateChangedEvent) + Send + Sync + 'static,
    {
        self.subscribe(crawler_id, EventKind::StateChanged, move |event| match event {
            CrawlerEvent::StateChanged(e) => handler(e),
            other => unreachable!("{} routed to a state_changed handler", other.kind()),
        });
    }

    pub fn subscribe_page_data_acquired<F>(&self, crawler_id: CrawlerId, handler: F)
    where
        F: Fn(&PageDataAcquiredEvent) + Send + Sync + 'static,
    {
        self.subscribe(crawler_id, EventKind::PageDataAcquired, move |event| match event {
            CrawlerEvent::PageDataAcquired(e) => handler(e),
            other => unreachable!("{} routed to a page_data_acquired handler", other.kind()),
        });
    }

    pub fn subscribe_data_acquired<F>(&self, crawler_id: CrawlerId, handler: F)
    where
        F: Fn(&DataAcquiredEvent) + Send + Sync + 'static,
    {
        self.subscribe(crawler_id, EventKind::DataAcquired, move |event| match event {
            CrawlerEvent::DataAcquired(e) => handler(e),
            other => unreachable!("{} routed to a data_acquired handler", other.kind()),
        });
    }

    pub fn subscribe_links_extracted<F>(&self, crawler_id: CrawlerId, handler: F)
    where
        F: Fn(&LinksExtractedEvent) + Send + Sync + 'static,
    {
        self.subscribe(crawler_id, EventKind::LinksExtracted, move |event| match event {
            CrawlerEvent::LinksExtracted(e) => handler(e),
            other => unreachable!("{} routed to a links_extracted handler", other.kind()),
        });
    }

    /// Dispatch an event to every handler registered for its crawler and kind.
    ///
    /// Returns the number of handlers the event was handed to. Publishing
    /// with no matching handler is a no-op.
    pub fn publish(&self, event: CrawlerEvent) -> usize {
        let key = (event.crawler_id(), event.kind());
        let Some(subscribers) = self.subscriptions.get(&key) else {
            return 0;
        };

        let event = Arc::new(event);
        subscribers
            .iter()
            .filter(|sender| sender.send(Arc::clone(&event)).is_ok())
            .count()
    }

    /// Drop every subscription of a crawler.
    ///
    /// Events already queued are still handled; the drain tasks end after
    /// that. Returns the number of subscriptions removed.
    pub fn remove_crawler(&self, crawler_id: CrawlerId) -> usize {
        let mut removed = 0;
        self.subscriptions.retain(|(id, _), subscribers| {
            if *id == crawler_id {
                removed += subscribers.len();
                false
            } else {
                true
            }
        });
        removed
    }

    /// Number of handlers registered for a `(crawler, kind)` pair.
    pub fn subscriber_count(&self, crawler_id: CrawlerId, kind: EventKind) -> usize {
        self.subscriptions
            .get(&(crawler_id, kind))
            .map(|subscribers| subscribers.len())
            .unwrap_or(0)
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriptions", &self.subscriptions.len())
            .finish()
    }
}
