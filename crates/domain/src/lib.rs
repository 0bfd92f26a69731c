//! gnocco domain layer: records, zones, cache entries, queries and config.
pub mod cache_entry;
pub mod config;
pub mod dns_query;
pub mod dns_record;
pub mod errors;
pub mod name;
pub mod zone;

pub use cache_entry::CacheEntry;
pub use config::{CliOverrides, Config, ConfigError};
pub use dns_query::DnsQuery;
pub use dns_record::{RecordType, ResourceRecord};
pub use errors::DomainError;
pub use zone::ZoneInfo;
