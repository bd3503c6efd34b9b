/// Crawler lifecycle states
///
/// This module defines every state a crawler can be in and which transitions
/// between them are legal.
use std::fmt;

/// Represents the current lifecycle state of a crawler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlerState {
    // ===== Initial State =====
    /// Crawler is registered but has not been started
    New,

    // ===== Active States =====
    /// Crawl loop is processing the frontier
    Running,

    /// Crawl loop is blocked on the gate until resumed
    Paused,

    // ===== Terminal States =====
    /// Frontier was exhausted without a fatal failure
    Finished,

    /// Crawl was stopped by a control call
    Stopped,

    /// The seed URL could not be fetched
    Failed,
}

impl CrawlerState {
    /// Returns true if no operation can move the crawler out of this state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished | Self::Stopped | Self::Failed)
    }

    /// Returns true if the crawl loop has been started and has not ended
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Running | Self::Paused)
    }

    /// Returns true if moving from `self` to `next` is a legal transition
    ///
    /// ```text
    /// New     -> Running
    /// Running -> Paused | Stopped | Finished | Failed
    /// Paused  -> Running | Stopped
    /// ```
    pub fn can_transition_to(&self, next: CrawlerState) -> bool {
        matches!(
            (self, next),
            (Self::New, Self::Running)
                | (Self::Running, Self::Paused)
                | (Self::Running, Self::Stopped)
                | (Self::Running, Self::Finished)
                | (Self::Running, Self::Failed)
                | (Self::Paused, Self::Running)
                | (Self::Paused, Self::Stopped)
        )
    }

    /// Returns the lowercase name of the state
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Finished => "finished",
            Self::Stopped => "stopped",
            Self::Failed => "failed",
        }
    }

    /// Returns all possible crawler states
    pub fn all_states() -> Vec<Self> {
        vec![
            Self::New,
            Self::Running,
            Self::Paused,
            Self::Finished,
            Self::Stopped,
            Self::Failed,
        ]
    }
}

impl fmt::Display for CrawlerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
