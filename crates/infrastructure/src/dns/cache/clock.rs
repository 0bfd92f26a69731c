use gnocco_domain::cache_entry::unix_now;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// Source of "now" for expiry decisions, in unix seconds.
///
/// `Manual` is a shared atomic that only moves when told to; tests use it
/// to step past TTLs without sleeping.
#[derive(Debug, Clone, Default)]
pub enum CacheClock {
    #[default]
    System,
    Manual(Arc<AtomicI64>),
}

impl CacheClock {
    pub fn manual(start: i64) -> Self {
        CacheClock::Manual(Arc::new(AtomicI64::new(start)))
    }

    #[inline]
    pub fn now(&self) -> i64 {
        match self {
            CacheClock::System => unix_now(),
            CacheClock::Manual(t) => t.load(Ordering::Relaxed),
        }
    }

    /// Move a manual clock forward. No effect on the system clock.
    pub fn advance(&self, secs: i64) {
        if let CacheClock::Manual(t) = self {
            t.fetch_add(secs, Ordering::Relaxed);
        }
    }
}
