use super::record_translator::RecordTranslator;
use gnocco_domain::name::{fqdn, is_subdomain};
use gnocco_domain::{DomainError, RecordType, ResourceRecord};
use hickory_proto::op::{Message, ResponseCode};
use tracing::debug;

/// Upstream response with every section flattened to domain records.
#[derive(Debug, Clone)]
pub struct DnsResponse {
    pub rcode: ResponseCode,
    pub truncated: bool,
    pub answers: Vec<ResourceRecord>,
    pub authorities: Vec<ResourceRecord>,
    pub additionals: Vec<ResourceRecord>,
    pub message: Message,
}

impl DnsResponse {
    pub fn from_message(message: Message) -> Self {
        let answers = RecordTranslator::to_domain_all(message.answers());
        let authorities = RecordTranslator::to_domain_all(message.name_servers());
        let additionals = RecordTranslator::to_domain_all(message.additionals());

        debug!(
            rcode = ?message.response_code(),
            answers = answers.len(),
            authorities = authorities.len(),
            additionals = additionals.len(),
            truncated = message.truncated(),
            "DNS response parsed"
        );

        Self {
            rcode: message.response_code(),
            truncated: message.truncated(),
            answers,
            authorities,
            additionals,
            message,
        }
    }

    /// Answer records of `record_type` owned by `owner`.
    pub fn answers_for(&self, owner: &str, record_type: RecordType) -> Vec<ResourceRecord> {
        self.answers
            .iter()
            .filter(|r| r.name() == owner && r.record_type() == record_type)
            .cloned()
            .collect()
    }

    /// Answer records reachable from `qname`: its own `record_type` RRset,
    /// or its CNAME followed by the target's records while each target lies
    /// inside `zone`. Records for any other owner are left out.
    pub fn answer_chain(&self, qname: &str, record_type: RecordType, zone: &str) -> Vec<ResourceRecord> {
        let mut chain = Vec::new();
        let mut visited: Vec<String> = Vec::new();
        let mut owner = fqdn(qname);

        loop {
            let direct = self.answers_for(&owner, record_type);
            if !direct.is_empty() || record_type == RecordType::CNAME {
                chain.extend(direct);
                break;
            }

            let cnames = self.answers_for(&owner, RecordType::CNAME);
            let Some(target) = cnames.first().map(|r| fqdn(r.value())) else {
                break;
            };
            chain.extend(cnames);
            visited.push(owner);
            if !is_subdomain(&target, zone) || visited.contains(&target) {
                break;
            }
            owner = target;
        }
        chain
    }

    /// `NS` records from the authority section.
    pub fn referral_nameservers(&self) -> Vec<ResourceRecord> {
        self.authorities
            .iter()
            .filter(|r| r.record_type() == RecordType::NS)
            .cloned()
            .collect()
    }
}

pub struct ResponseParser;

impl ResponseParser {
    pub fn parse(response_bytes: &[u8]) -> Result<DnsResponse, DomainError> {
        Self::decode(response_bytes).map(DnsResponse::from_message)
    }

    pub fn decode(response_bytes: &[u8]) -> Result<Message, DomainError> {
        Message::from_vec(response_bytes).map_err(|e| {
            DomainError::InvalidDnsResponse(format!("Failed to parse DNS response: {}", e))
        })
    }

    pub fn rcode_to_status(rcode: ResponseCode) -> &'static str {
        match rcode {
            ResponseCode::NoError => "NOERROR",
            ResponseCode::NXDomain => "NXDOMAIN",
            ResponseCode::ServFail => "SERVFAIL",
            ResponseCode::Refused => "REFUSED",
            ResponseCode::NotImp => "NOTIMP",
            ResponseCode::FormErr => "FORMERR",
            _ => "UNKNOWN",
        }
    }
}
