use super::name::fqdn;
use super::RecordType;
use std::fmt;
use std::sync::Arc;

/// DNS query (domain + record type).
/// The domain is always stored fully-qualified and lower-cased so that two
/// spellings of the same question compare equal on the pending stack.
/// Uses `Arc<str>` for cheap cloning across resolver → cache → stack.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DnsQuery {
    pub domain: Arc<str>,
    pub record_type: RecordType,
}

impl DnsQuery {
    pub fn new(domain: impl AsRef<str>, record_type: RecordType) -> Self {
        Self {
            domain: Arc::from(fqdn(domain.as_ref())),
            record_type,
        }
    }
}

impl fmt::Display for DnsQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.domain, self.record_type)
    }
}
