//! Link filtering by content type
//!
//! This module holds the static content-type table, the excluded-type groups
//! built from it, and the pure filter applied to extracted links.

mod content_types;
mod groups;
mod links;

pub use content_types::{content_type, ContentType, CONTENT_TYPES};
pub use groups::TypeGroup;
pub use links::filter_links;
