pub mod dns_resolver;
pub mod record_cache;

pub use dns_resolver::{DnsResolution, DnsResolver};
pub use record_cache::{CachedAnswer, RecordCache};
