pub mod clock;
pub mod key;
pub mod metrics;
pub mod persistence;
pub mod roots;
pub mod storage;
pub mod zones;

pub use clock::CacheClock;
pub use key::{make_key, split_key};
pub use metrics::CacheMetrics;
pub use persistence::CacheSink;
pub use roots::ROOT_HINTS_TTL;
pub use storage::DnsCache;
