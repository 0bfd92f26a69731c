#![allow(dead_code)]
use hickory_proto::op::{Header, Message};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, UdpSocket};
use tokio::sync::oneshot;

/// Which listener received the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Udp,
    Tcp,
}

pub type Responder = Arc<dyn Fn(&Message, Protocol) -> Message + Send + Sync>;

/// Local nameserver on 127.0.0.1 answering UDP and TCP on the same port.
///
/// Replies come from the responder closure; the query ID is copied over
/// unless the responder already set a nonzero one.
pub struct MockDnsServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockDnsServer {
    pub async fn start<F>(responder: F) -> Result<Self, std::io::Error>
    where
        F: Fn(&Message, Protocol) -> Message + Send + Sync + 'static,
    {
        let responder: Responder = Arc::new(responder);
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let socket = UdpSocket::bind(addr).await?;

        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            let mut buf = vec![0u8; 4096];
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    result = socket.recv_from(&mut buf) => {
                        if let Ok((len, peer)) = result {
                            if let Some(reply) = Self::answer(&responder, &buf[..len], Protocol::Udp) {
                                let _ = socket.send_to(&reply, peer).await;
                            }
                        }
                    }
                    accepted = listener.accept() => {
                        if let Ok((mut stream, _)) = accepted {
                            let responder = responder.clone();
                            tokio::spawn(async move {
                                let Ok(len) = stream.read_u16().await else { return };
                                let mut query = vec![0u8; len as usize];
                                if stream.read_exact(&mut query).await.is_err() {
                                    return;
                                }
                                if let Some(reply) = Self::answer(&responder, &query, Protocol::Tcp) {
                                    let _ = stream.write_u16(reply.len() as u16).await;
                                    let _ = stream.write_all(&reply).await;
                                }
                            });
                        }
                    }
                }
            }
        });

        Ok(Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    fn answer(responder: &Responder, query: &[u8], protocol: Protocol) -> Option<Vec<u8>> {
        let query = Message::from_vec(query).ok()?;
        let mut reply = responder(&query, protocol);
        if reply.id() == 0 {
            let mut header: Header = *reply.header();
            header.set_id(query.id());
            reply.set_header(header);
        }
        if reply.queries().is_empty() {
            reply.add_queries(query.queries().iter().cloned());
        }
        reply.to_vec().ok()
    }

    pub fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockDnsServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
