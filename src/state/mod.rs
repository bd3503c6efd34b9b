//! State module for tracking crawler lifecycles
//!
//! # Components
//!
//! - `CrawlerState`: the lifecycle state machine of one crawler (new, running,
//!   paused, finished, stopped, failed)

mod crawler_state;

pub use crawler_state::CrawlerState;
