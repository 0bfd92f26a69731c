use super::{CacheConfig, ConfigError, HandlerConfig, LoggingConfig, ResolverConfig};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};

/// Root configuration, one table per concern
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub resolver: ResolverConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub handler: HandlerConfig,
}

/// Command-line values that win over the config file
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub iterative: Option<bool>,
    pub nameservers: Vec<String>,
    pub root_hints: Option<String>,
    pub log_level: Option<String>,
    pub checkpoint: Option<String>,
}

impl Config {
    /// Load from `path` (or defaults when `None`) and apply overrides.
    pub fn load(path: Option<&str>, overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) => {
                let raw = std::fs::read_to_string(p).map_err(|source| ConfigError::Read {
                    path: p.to_string(),
                    source,
                })?;
                Self::from_toml_str(&raw)?
            }
            None => Self::default(),
        };
        config.apply_overrides(overrides);
        Ok(config)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    pub fn apply_overrides(&mut self, overrides: CliOverrides) {
        if let Some(iterative) = overrides.iterative {
            self.resolver.iterative = iterative;
        }
        if !overrides.nameservers.is_empty() {
            self.resolver.nameservers = overrides.nameservers;
        }
        if let Some(hints) = overrides.root_hints {
            self.resolver.root_hints = hints;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        if overrides.checkpoint.is_some() {
            self.cache.checkpoint = overrides.checkpoint;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.resolver.query_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "resolver.query_timeout_ms must be greater than zero".into(),
            ));
        }
        if self.resolver.max_steps == 0 {
            return Err(ConfigError::Validation(
                "resolver.max_steps must be greater than zero".into(),
            ));
        }
        if self.handler.max_jobs == 0 {
            return Err(ConfigError::Validation(
                "handler.max_jobs must be greater than zero".into(),
            ));
        }
        for ns in &self.resolver.nameservers {
            if ns.parse::<IpAddr>().is_err() && ns.parse::<SocketAddr>().is_err() {
                return Err(ConfigError::Validation(format!(
                    "Invalid nameserver '{}': expected an IP literal",
                    ns
                )));
            }
        }
        Ok(())
    }
}
