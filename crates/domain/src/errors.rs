use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Unsupported record type: {0}")]
    InvalidRecordType(String),

    #[error("Invalid DNS response: {0}")]
    InvalidDnsResponse(String),

    #[error("Timeout talking to {server}")]
    TransportTimeout { server: String },

    #[error("Connection refused by {server}")]
    TransportConnectionRefused { server: String },

    #[error("Connection to {server} failed: {reason}")]
    TransportFailed { server: String, reason: String },

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Cache persistence error: {0}")]
    CachePersistence(String),

    #[error("Root hints unavailable: {0}")]
    RootHints(String),

    #[error("No upstream nameservers configured")]
    NoUpstreams,

    #[error("Too many queries in flight")]
    Overloaded,

    #[error("Resolution of {0} exceeded the step limit")]
    MaxStepsExceeded(String),

    #[error("Resolution failed: {0}")]
    ResolutionFailed(String),

    #[error("Cached failure for {0}")]
    NegativeCached(String),
}

impl From<std::io::Error> for DomainError {
    fn from(e: std::io::Error) -> Self {
        DomainError::IoError(e.to_string())
    }
}
