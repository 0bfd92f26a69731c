use super::{cache_rrsets, elapsed_ms};
use crate::dns::cache::DnsCache;
use crate::dns::forwarding::{DnsResponse, MessageBuilder, ResponseParser};
use crate::dns::transport::UpstreamExchange;
use gnocco_application::ports::DnsResolution;
use gnocco_domain::{DnsQuery, DomainError, RecordType};
use hickory_proto::op::{Message, ResponseCode};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Forwards questions to configured upstream resolvers.
///
/// Each request goes to one upstream chosen uniformly at random. A failed
/// exchange is reported as is; there is no second attempt elsewhere.
pub struct StubResolver {
    upstreams: Vec<SocketAddr>,
    exchange: Arc<dyn UpstreamExchange>,
    cache: Arc<DnsCache>,
}

impl StubResolver {
    pub fn new(
        upstreams: Vec<SocketAddr>,
        exchange: Arc<dyn UpstreamExchange>,
        cache: Arc<DnsCache>,
    ) -> Result<Self, DomainError> {
        if upstreams.is_empty() {
            return Err(DomainError::NoUpstreams);
        }
        Ok(Self {
            upstreams,
            exchange,
            cache,
        })
    }

    pub fn upstreams(&self) -> &[SocketAddr] {
        &self.upstreams
    }

    fn pick(&self) -> SocketAddr {
        self.upstreams[fastrand::usize(..self.upstreams.len())]
    }

    /// Send `request` unchanged to one upstream and return its reply.
    pub async fn forward(&self, request: &Message) -> Result<(SocketAddr, Message), DomainError> {
        let server = self.pick();
        debug!(server = %server, id = request.id(), "Forwarding query");

        match self.exchange.exchange(server, request).await {
            Ok(response) => Ok((server, response)),
            Err(e) => {
                warn!(server = %server, error = %e, "Upstream exchange failed");
                Err(e)
            }
        }
    }

    pub async fn lookup(&self, query: &DnsQuery) -> Result<DnsResolution, DomainError> {
        let request = MessageBuilder::query(&query.domain, query.record_type, true)?;
        let started = Instant::now();
        let (server, response) = self.forward(&request).await?;
        let rtt_ms = elapsed_ms(started);

        let response = DnsResponse::from_message(response);
        if response.rcode != ResponseCode::NoError {
            return Err(DomainError::ResolutionFailed(format!(
                "{} answered {} for {}",
                server,
                ResponseParser::rcode_to_status(response.rcode),
                query
            )));
        }
        let answers = response.answer_chain(&query.domain, query.record_type, ".");
        if answers.is_empty() {
            return Err(DomainError::ResolutionFailed(format!(
                "{} returned no answer for {}",
                server, query
            )));
        }

        cache_rrsets(&self.cache, &answers, rtt_ms);

        let cname_chain = answers
            .iter()
            .filter(|r| r.record_type() == RecordType::CNAME)
            .map(|r| Arc::from(r.value()))
            .collect();

        Ok(DnsResolution::new(answers, false)
            .with_cname_chain(cname_chain)
            .with_upstream(server.to_string()))
    }
}
