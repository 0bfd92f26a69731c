//! Configuration module for gnocco
//!
//! - `root`: main configuration and CLI overrides
//! - `resolver`: resolution mode, upstreams, root hints, limits
//! - `cache`: cache sizing, default lifetimes, checkpoint file
//! - `handler`: admission control for inbound queries
//! - `logging`: logging settings
//! - `errors`: configuration errors

pub mod cache;
pub mod errors;
pub mod handler;
pub mod logging;
pub mod resolver;
pub mod root;

pub use cache::CacheConfig;
pub use errors::ConfigError;
pub use handler::HandlerConfig;
pub use logging::LoggingConfig;
pub use resolver::ResolverConfig;
pub use root::{CliOverrides, Config};
