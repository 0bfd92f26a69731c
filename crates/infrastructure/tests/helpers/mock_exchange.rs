#![allow(dead_code)]
use async_trait::async_trait;
use gnocco_domain::DomainError;
use gnocco_infrastructure::dns::transport::UpstreamExchange;
use hickory_proto::op::Message;
use hickory_proto::rr::RecordType;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Mutex;

type Script = HashMap<(SocketAddr, String, RecordType), Message>;

/// Scripted upstream: answers are keyed by server, question name and type.
/// Anything unscripted times out.
#[derive(Default)]
pub struct MockExchange {
    script: Mutex<Script>,
    log: Mutex<Vec<(SocketAddr, String, RecordType)>>,
}

impl MockExchange {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&self, server: SocketAddr, qname: &str, qtype: RecordType, response: Message) {
        self.script
            .lock()
            .unwrap()
            .insert((server, qname.to_ascii_lowercase(), qtype), response);
    }

    pub fn calls(&self) -> usize {
        self.log.lock().unwrap().len()
    }

    pub fn servers_asked(&self) -> Vec<SocketAddr> {
        self.log.lock().unwrap().iter().map(|(s, _, _)| *s).collect()
    }

    pub fn questions(&self) -> Vec<(String, RecordType)> {
        self.log
            .lock()
            .unwrap()
            .iter()
            .map(|(_, n, t)| (n.clone(), *t))
            .collect()
    }
}

#[async_trait]
impl UpstreamExchange for MockExchange {
    async fn exchange(&self, server: SocketAddr, query: &Message) -> Result<Message, DomainError> {
        let question = query.queries().first().ok_or_else(|| {
            DomainError::InvalidDnsResponse("query without question".to_string())
        })?;
        let key = (
            server,
            question.name().to_ascii().to_ascii_lowercase(),
            question.query_type(),
        );
        self.log.lock().unwrap().push(key.clone());

        let scripted = self.script.lock().unwrap().get(&key).cloned();
        match scripted {
            Some(mut response) => {
                let mut header = *response.header();
                header.set_id(query.id());
                response.set_header(header);
                response.add_queries(query.queries().iter().cloned());
                Ok(response)
            }
            None => Err(DomainError::TransportTimeout {
                server: server.to_string(),
            }),
        }
    }
}
