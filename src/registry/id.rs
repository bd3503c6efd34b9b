use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Opaque identity of a registered crawler
///
/// Assigned once by the registry and never changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CrawlerId(Uuid);

impl CrawlerId {
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for CrawlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Source of fresh crawler identities
pub trait IdProvider: Send + Sync {
    fn next_id(&self) -> CrawlerId;
}

/// Random (v4) UUID identities
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIds;

impl IdProvider for RandomIds {
    fn next_id(&self) -> CrawlerId {
        CrawlerId(Uuid::new_v4())
    }
}

/// Counting identities (`00000000-0000-0000-0000-000000000001`, ...)
///
/// Makes identities predictable in tests and logs.
#[derive(Debug, Default)]
pub struct SequentialIds {
    next: AtomicU64,
}

impl IdProvider for SequentialIds {
    fn next_id(&self) -> CrawlerId {
        let n = self.next.fetch_add(1, Ordering::Relaxed) + 1;
        CrawlerId(Uuid::from_u128(u128::from(n)))
    }
}
