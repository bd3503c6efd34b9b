//! Crawler events and the bus that delivers them
//!
//! Events form a closed set (`CrawlerEvent`), each tagged with an
//! `EventKind`. The `EventBus` routes them to handlers subscribed for a given
//! crawler and kind.

mod bus;
mod types;

pub use bus::EventBus;
pub use types::{
    CrawlerEvent, DataAcquiredEvent, EventKind, LinksExtractedEvent, PageDataAcquiredEvent,
    StateChangedEvent,
};
