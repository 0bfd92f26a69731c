use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HandlerConfig {
    /// Maximum concurrently answered queries; beyond it clients get SERVFAIL
    #[serde(default = "default_max_jobs")]
    pub max_jobs: usize,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            max_jobs: default_max_jobs(),
        }
    }
}

fn default_max_jobs() -> usize {
    512
}
