use crate::crawler::{CrawlEngine, FrontierStats};
use crate::registry::CrawlerId;
use crate::state::CrawlerState;

/// Point-in-time snapshot of one registered crawler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlerInfo {
    pub id: CrawlerId,
    pub host: String,
    pub state: CrawlerState,
    pub frontier: FrontierStats,
}

impl CrawlerInfo {
    pub(crate) fn of(engine: &CrawlEngine) -> Self {
        Self {
            id: engine.id(),
            host: engine.host().to_string(),
            state: engine.state(),
            frontier: engine.frontier_stats(),
        }
    }
}
