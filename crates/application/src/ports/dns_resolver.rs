use async_trait::async_trait;
use gnocco_domain::{DnsQuery, DomainError, ResourceRecord};
use std::sync::Arc;

/// Outcome of answering one `(name, type)` question.
#[derive(Debug, Clone)]
pub struct DnsResolution {
    /// Answer records: any CNAME chain first, then the terminal RRset.
    pub records: Arc<Vec<ResourceRecord>>,
    pub cache_hit: bool,
    /// Names traversed through CNAMEs, in order.
    pub cname_chain: Arc<[Arc<str>]>,
    /// Nameserver that produced the final answer, when one was contacted.
    pub upstream_server: Option<Arc<str>>,
    pub min_ttl: Option<u32>,
}

impl DnsResolution {
    pub fn new(records: Vec<ResourceRecord>, cache_hit: bool) -> Self {
        let min_ttl = records.iter().map(ResourceRecord::ttl).min();
        Self {
            records: Arc::new(records),
            cache_hit,
            cname_chain: Arc::from([]),
            upstream_server: None,
            min_ttl,
        }
    }

    pub fn with_cname_chain(mut self, chain: Vec<Arc<str>>) -> Self {
        self.cname_chain = Arc::from(chain);
        self
    }

    pub fn with_upstream(mut self, server: impl Into<Arc<str>>) -> Self {
        self.upstream_server = Some(server.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Values of the terminal RRset (records that are not part of the chain).
    pub fn values(&self) -> Vec<&str> {
        self.records
            .iter()
            .filter(|r| r.record_type() != gnocco_domain::RecordType::CNAME)
            .map(ResourceRecord::value)
            .collect()
    }
}

#[async_trait]
pub trait DnsResolver: Send + Sync {
    async fn lookup(&self, query: &DnsQuery) -> Result<DnsResolution, DomainError>;
}
