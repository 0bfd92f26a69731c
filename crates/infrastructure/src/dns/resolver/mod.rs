//! Resolution engines.
//!
//! Two modes share one cache:
//!
//! - **Stub**: relay each question to a configured upstream resolver.
//! - **Iterative**: start at the root hints and follow referrals until an
//!   authoritative server answers.
//!
//! ## Example Usage
//!
//! ```no_run
//! use gnocco_domain::config::ResolverConfig;
//! use gnocco_infrastructure::dns::cache::DnsCache;
//! use gnocco_infrastructure::dns::resolver::ResolverBuilder;
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), gnocco_domain::DomainError> {
//! let cache = Arc::new(DnsCache::default());
//! let resolver = ResolverBuilder::new(cache)
//!     .with_config(ResolverConfig::default())
//!     .build()?;
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod iterative;
pub mod stub;

pub use builder::ResolverBuilder;
pub use iterative::IterativeResolver;
pub use stub::StubResolver;

use crate::dns::cache::DnsCache;
use crate::dns::forwarding::{MessageBuilder, RecordTypeMapper};
use async_trait::async_trait;
use gnocco_application::ports::{DnsResolution, DnsResolver};
use gnocco_domain::{DnsQuery, DomainError, RecordType, ResourceRecord};
use hickory_proto::op::{Message, ResponseCode};
use std::time::Instant;
use tracing::{debug, warn};

pub enum Resolver {
    Stub(StubResolver),
    Iterative(IterativeResolver),
}

impl Resolver {
    pub fn mode(&self) -> &'static str {
        match self {
            Resolver::Stub(_) => "stub",
            Resolver::Iterative(_) => "iterative",
        }
    }

    /// Answer a client request message.
    ///
    /// Stub mode relays the upstream reply unchanged. Iterative mode builds
    /// a reply from the resolved records, or SERVFAIL when resolution fails.
    pub async fn handle(&self, request: &Message) -> Message {
        match self {
            Resolver::Stub(stub) => match stub.forward(request).await {
                Ok((_, response)) => response,
                Err(_) => MessageBuilder::servfail(request),
            },
            Resolver::Iterative(iterative) => {
                let Some(question) = request.queries().first() else {
                    return Message::error_msg(request.id(), request.op_code(), ResponseCode::FormErr);
                };
                let Some(record_type) = RecordTypeMapper::from_hickory(question.query_type()) else {
                    debug!(qtype = %question.query_type(), "Unsupported query type");
                    return Message::error_msg(request.id(), request.op_code(), ResponseCode::NotImp);
                };

                let query = DnsQuery::new(question.name().to_ascii(), record_type);
                let reply = match iterative.lookup(&query).await {
                    Ok(resolution) => MessageBuilder::reply(request, &resolution.records),
                    Err(e) => Err(e),
                };
                reply.unwrap_or_else(|e| {
                    warn!(query = %query, error = %e, "Answering SERVFAIL");
                    MessageBuilder::servfail(request)
                })
            }
        }
    }
}

#[async_trait]
impl DnsResolver for Resolver {
    async fn lookup(&self, query: &DnsQuery) -> Result<DnsResolution, DomainError> {
        match self {
            Resolver::Stub(stub) => stub.lookup(query).await,
            Resolver::Iterative(iterative) => iterative.lookup(query).await,
        }
    }
}

/// Store `records` in the cache, one entry per owner and type.
pub(crate) fn cache_rrsets(cache: &DnsCache, records: &[ResourceRecord], rtt_ms: u32) {
    let mut groups: Vec<((&str, RecordType), Vec<ResourceRecord>)> = Vec::new();
    for record in records {
        let key = (record.name(), record.record_type());
        match groups.iter_mut().find(|(k, _)| *k == key) {
            Some((_, group)) => group.push(record.clone()),
            None => groups.push((key, vec![record.clone()])),
        }
    }
    for (_, group) in groups {
        cache.set_rrset(&group, &[], rtt_ms);
    }
}

pub(crate) fn elapsed_ms(started: Instant) -> u32 {
    u32::try_from(started.elapsed().as_millis()).unwrap_or(u32::MAX)
}
