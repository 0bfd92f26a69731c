use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct CacheMetrics {
    pub hits: AtomicU64,
    pub negative_hits: AtomicU64,
    pub misses: AtomicU64,
    pub insertions: AtomicU64,
    pub expired_deletions: AtomicU64,
}

impl CacheMetrics {
    #[inline]
    pub(crate) fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits.load(Ordering::Relaxed) + self.negative_hits.load(Ordering::Relaxed);
        let total = hits + self.misses.load(Ordering::Relaxed);
        if total == 0 {
            0.0
        } else {
            (hits as f64 / total as f64) * 100.0
        }
    }
}

impl fmt::Display for CacheMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hits {} negative_hits {} misses {} insertions {} expired {} hit_rate {:.1}%",
            self.hits.load(Ordering::Relaxed),
            self.negative_hits.load(Ordering::Relaxed),
            self.misses.load(Ordering::Relaxed),
            self.insertions.load(Ordering::Relaxed),
            self.expired_deletions.load(Ordering::Relaxed),
            self.hit_rate()
        )
    }
}
