use gnocco_domain::cache_entry::unix_now;
use gnocco_domain::{CacheEntry, RecordType};

/// Read side of the resolver cache as seen by the query handler.
///
/// `lookup` returns `None` on a miss. A hit from the negative map comes back
/// as `Some` with `is_negative == true` so the caller can fail fast.
pub trait RecordCache: Send + Sync {
    fn lookup(&self, name: &str, record_type: RecordType) -> Option<CachedAnswer>;

    /// Clock the cache ages entries by, in unix seconds.
    fn now(&self) -> i64 {
        unix_now()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedAnswer {
    pub entry: CacheEntry,
    pub is_negative: bool,
}

impl CachedAnswer {
    pub fn positive(entry: CacheEntry) -> Self {
        Self {
            entry,
            is_negative: false,
        }
    }

    pub fn negative(entry: CacheEntry) -> Self {
        Self {
            entry,
            is_negative: true,
        }
    }
}
