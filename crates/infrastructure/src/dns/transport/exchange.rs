use super::Transport;
use crate::dns::forwarding::{MessageBuilder, ResponseParser};
use async_trait::async_trait;
use gnocco_domain::DomainError;
use hickory_proto::op::Message;
use std::net::SocketAddr;
use std::time::Duration;
use tracing::debug;

/// One request/response round trip with a nameserver.
#[async_trait]
pub trait UpstreamExchange: Send + Sync {
    async fn exchange(&self, server: SocketAddr, query: &Message) -> Result<Message, DomainError>;
}

/// UDP first; a truncated UDP reply is retried once over TCP. Each leg has
/// its own timeout.
pub struct NetworkExchange {
    timeout: Duration,
}

impl NetworkExchange {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn round_trip(
        &self,
        transport: Transport,
        server: SocketAddr,
        query_id: u16,
        bytes: &[u8],
    ) -> Result<Message, DomainError> {
        let response = transport.send(bytes, self.timeout).await?;
        let message = ResponseParser::decode(&response.bytes)?;
        if message.id() != query_id {
            return Err(DomainError::InvalidDnsResponse(format!(
                "{} answered id {} to query id {}",
                server,
                message.id(),
                query_id
            )));
        }
        Ok(message)
    }
}

#[async_trait]
impl UpstreamExchange for NetworkExchange {
    async fn exchange(&self, server: SocketAddr, query: &Message) -> Result<Message, DomainError> {
        let bytes = MessageBuilder::serialize(query)?;

        let message = self
            .round_trip(Transport::udp(server), server, query.id(), &bytes)
            .await?;
        if !message.truncated() {
            return Ok(message);
        }

        debug!(server = %server, "Truncated UDP response, retrying over TCP");
        self.round_trip(Transport::tcp(server), server, query.id(), &bytes)
            .await
    }
}
