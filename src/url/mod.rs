//! URL handling module for Ripple-Crawl
//!
//! This module provides the canonical URL key used by the frontier and the
//! host helpers used for same-host link acceptance.

mod canonical;
mod domain;

pub use canonical::CanonicalUrl;
pub use domain::{extract_host, is_on_host};
