use super::{IterativeResolver, Resolver, StubResolver};
use crate::dns::cache::DnsCache;
use crate::dns::transport::{NetworkExchange, UpstreamExchange};
use crate::system::resolv_conf;
use gnocco_domain::config::ResolverConfig;
use gnocco_domain::DomainError;
use std::net::{IpAddr, SocketAddr};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

pub struct ResolverBuilder {
    cache: Arc<DnsCache>,
    config: ResolverConfig,
    exchange: Option<Arc<dyn UpstreamExchange>>,
    upstreams: Option<Vec<SocketAddr>>,
}

impl ResolverBuilder {
    pub fn new(cache: Arc<DnsCache>) -> Self {
        Self {
            cache,
            config: ResolverConfig::default(),
            exchange: None,
            upstreams: None,
        }
    }

    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_exchange(mut self, exchange: Arc<dyn UpstreamExchange>) -> Self {
        self.exchange = Some(exchange);
        self
    }

    /// Stub upstreams, overriding both the config and resolv.conf.
    pub fn with_upstreams(mut self, upstreams: Vec<SocketAddr>) -> Self {
        self.upstreams = Some(upstreams);
        self
    }

    pub fn build(self) -> Result<Resolver, DomainError> {
        info!(
            iterative = self.config.iterative,
            timeout_ms = self.config.query_timeout_ms,
            max_steps = self.config.max_steps,
            "Building DNS resolver"
        );

        let exchange = self.exchange.unwrap_or_else(|| {
            Arc::new(NetworkExchange::new(Duration::from_millis(
                self.config.query_timeout_ms,
            )))
        });

        let resolver = if self.config.iterative {
            let roots = self
                .cache
                .load_roots_file(Path::new(&self.config.root_hints))?;
            info!(roots = roots, path = %self.config.root_hints, "Root hints loaded");

            Resolver::Iterative(IterativeResolver::new(
                self.cache,
                exchange,
                self.config.port,
                self.config.max_steps,
            ))
        } else {
            let upstreams = match self.upstreams {
                Some(upstreams) => upstreams,
                None => configured_upstreams(&self.config),
            };
            info!(upstreams = ?upstreams, "Stub upstreams selected");
            Resolver::Stub(StubResolver::new(upstreams, exchange, self.cache)?)
        };

        info!(mode = resolver.mode(), "DNS resolver built successfully");
        Ok(resolver)
    }
}

/// Upstreams from the config, falling back to the system resolv.conf.
fn configured_upstreams(config: &ResolverConfig) -> Vec<SocketAddr> {
    let configured: Vec<SocketAddr> = config
        .nameservers
        .iter()
        .filter_map(|ns| match parse_upstream(ns) {
            Some(addr) => Some(addr),
            None => {
                warn!(nameserver = %ns, "Ignoring unparsable nameserver");
                None
            }
        })
        .collect();
    if !configured.is_empty() {
        return configured;
    }

    match resolv_conf::read_nameservers(Path::new(&config.resolv_conf)) {
        Ok(servers) => servers,
        Err(e) => {
            warn!(path = %config.resolv_conf, error = %e, "Could not read resolv.conf");
            Vec::new()
        }
    }
}

fn parse_upstream(s: &str) -> Option<SocketAddr> {
    s.parse::<SocketAddr>()
        .ok()
        .or_else(|| s.parse::<IpAddr>().ok().map(|ip| SocketAddr::new(ip, 53)))
}
