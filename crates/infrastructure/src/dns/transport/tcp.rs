use super::{DnsTransport, TransportResponse};
use async_trait::async_trait;
use gnocco_domain::DomainError;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;

/// DNS over TCP with the two-byte length prefix of RFC 1035 §4.2.2.
pub struct TcpTransport {
    server_addr: SocketAddr,
}

impl TcpTransport {
    pub fn new(server_addr: SocketAddr) -> Self {
        Self { server_addr }
    }

    async fn exchange(&self, message_bytes: &[u8]) -> std::io::Result<Vec<u8>> {
        let len = u16::try_from(message_bytes.len())
            .map_err(|_| std::io::Error::new(std::io::ErrorKind::InvalidInput, "message too large"))?;

        let mut stream = TcpStream::connect(self.server_addr).await?;
        let mut framed = Vec::with_capacity(message_bytes.len() + 2);
        framed.extend_from_slice(&len.to_be_bytes());
        framed.extend_from_slice(message_bytes);
        stream.write_all(&framed).await?;
        stream.flush().await?;

        let response_len = stream.read_u16().await? as usize;
        let mut response = vec![0u8; response_len];
        stream.read_exact(&mut response).await?;
        Ok(response)
    }
}

#[async_trait]
impl DnsTransport for TcpTransport {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        let bytes = tokio::time::timeout(timeout, self.exchange(message_bytes))
            .await
            .map_err(|_| DomainError::TransportTimeout {
                server: self.server_addr.to_string(),
            })?
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::ConnectionRefused => DomainError::TransportConnectionRefused {
                    server: self.server_addr.to_string(),
                },
                _ => DomainError::TransportFailed {
                    server: self.server_addr.to_string(),
                    reason: e.to_string(),
                },
            })?;

        debug!(server = %self.server_addr, bytes_received = bytes.len(), "TCP response received");

        Ok(TransportResponse {
            bytes,
            protocol_used: "TCP",
        })
    }

    fn protocol_name(&self) -> &'static str {
        "TCP"
    }
}
