use serde::{Deserialize, Serialize};

/// Sizing and default lifetimes of the two cache maps
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Initial capacity of the positive map
    #[serde(default = "default_positive_capacity")]
    pub positive_capacity: usize,

    /// Longest a positive entry is kept (seconds); larger upstream TTLs are
    /// clamped. Root hints are exempt.
    #[serde(default = "default_positive_ttl")]
    pub positive_ttl: u32,

    #[serde(default = "default_negative_capacity")]
    pub negative_capacity: usize,

    /// How long a failure is remembered (seconds)
    #[serde(default = "default_negative_ttl")]
    pub negative_ttl: u32,

    /// Checkpoint file restored on startup and written on shutdown
    #[serde(default)]
    pub checkpoint: Option<String>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            positive_capacity: default_positive_capacity(),
            positive_ttl: default_positive_ttl(),
            negative_capacity: default_negative_capacity(),
            negative_ttl: default_negative_ttl(),
            checkpoint: None,
        }
    }
}

fn default_positive_capacity() -> usize {
    10_000
}

fn default_positive_ttl() -> u32 {
    3600
}

fn default_negative_capacity() -> usize {
    1_000
}

fn default_negative_ttl() -> u32 {
    60
}
