use crate::registry::CrawlerId;
use crate::state::CrawlerState;
use chrono::{DateTime, Utc};
use std::fmt;
use url::Url;

/// Tag of an event kind, used as the dispatch key of the bus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    StateChanged,
    PageDataAcquired,
    DataAcquired,
    LinksExtracted,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StateChanged => "state_changed",
            Self::PageDataAcquired => "page_data_acquired",
            Self::DataAcquired => "data_acquired",
            Self::LinksExtracted => "links_extracted",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The crawler moved from one lifecycle state to another
#[derive(Debug, Clone, PartialEq)]
pub struct StateChangedEvent {
    pub crawler_id: CrawlerId,
    pub old_state: CrawlerState,
    pub new_state: CrawlerState,
    pub occurred_at: DateTime<Utc>,
}

/// A page was fetched, with its content and filtered links split by host
#[derive(Debug, Clone, PartialEq)]
pub struct PageDataAcquiredEvent {
    pub crawler_id: CrawlerId,
    pub location: Url,
    pub title: String,
    pub html: String,
    pub links_off_domain: Vec<Url>,
    pub links_on_domain: Vec<Url>,
    pub occurred_at: DateTime<Utc>,
}

/// A page was fetched (content only)
#[derive(Debug, Clone, PartialEq)]
pub struct DataAcquiredEvent {
    pub crawler_id: CrawlerId,
    pub location: Url,
    pub title: String,
    pub html: String,
    pub occurred_at: DateTime<Utc>,
}

/// Filtered links were extracted from a page (both hosts)
#[derive(Debug, Clone, PartialEq)]
pub struct LinksExtractedEvent {
    pub crawler_id: CrawlerId,
    pub source: Url,
    pub links: Vec<Url>,
    pub occurred_at: DateTime<Utc>,
}

/// Everything a crawler can publish
#[derive(Debug, Clone, PartialEq)]
pub enum CrawlerEvent {
    StateChanged(StateChangedEvent),
    PageDataAcquired(PageDataAcquiredEvent),
    DataAcquired(DataAcquiredEvent),
    LinksExtracted(LinksExtractedEvent),
}

impl CrawlerEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::StateChanged(_) => EventKind::StateChanged,
            Self::PageDataAcquired(_) => EventKind::PageDataAcquired,
            Self::DataAcquired(_) => EventKind::DataAcquired,
            Self::LinksExtracted(_) => EventKind::LinksExtracted,
        }
    }

    /// Identity of the crawler that published the event
    pub fn crawler_id(&self) -> CrawlerId {
        match self {
            Self::StateChanged(e) => e.crawler_id,
            Self::PageDataAcquired(e) => e.crawler_id,
            Self::DataAcquired(e) => e.crawler_id,
            Self::LinksExtracted(e) => e.crawler_id,
        }
    }

    pub fn state_changed(crawler_id: CrawlerId, old_state: CrawlerState, new_state: CrawlerState) -> Self {
        Self::StateChanged(StateChangedEvent {
            crawler_id,
            old_state,
            new_state,
            occurred_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{IdProvider, SequentialIds};

    #[test]
    fn test_kind_and_id() {
        let id = SequentialIds::default().next_id();
        let event = CrawlerEvent::state_changed(id, CrawlerState::New, CrawlerState::Running);

        assert_eq!(event.kind(), EventKind::StateChanged);
        assert_eq!(event.crawler_id(), id);
    }

    #[test]
    fn test_links_extracted_kind() {
        let id = SequentialIds::default().next_id();
        let event = CrawlerEvent::LinksExtracted(LinksExtractedEvent {
            crawler_id: id,
            source: Url::parse("http://h.test/").unwrap(),
            links: vec![],
            occurred_at: Utc::now(),
        });
        assert_eq!(event.kind(), EventKind::LinksExtracted);
        assert_eq!(event.kind().to_string(), "links_extracted");
    }
}
