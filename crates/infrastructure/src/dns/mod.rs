pub mod cache;
pub mod forwarding;
pub mod pending;
pub mod resolver;
pub mod transport;

pub use cache::{CacheMetrics, CacheSink, DnsCache};
pub use pending::PendingQueryStack;
pub use resolver::{Resolver, ResolverBuilder};
pub use transport::{NetworkExchange, UpstreamExchange};
