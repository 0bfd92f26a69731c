use hickory_proto::op::{Message, ResponseCode};
use hickory_proto::rr::RecordType;
use std::fmt;

/// What an upstream response means for the iterative loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseKind {
    Answer,
    Cname,
    /// Referral carrying at least two glue records.
    Delegation,
    /// Referral without usable glue.
    Namezone,
    Refused,
    /// FORMERR from a peer that did not accept the query shape.
    NoEdns,
    Unknown,
    /// No response at all.
    Nil,
}

impl ResponseKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseKind::Answer => "answer",
            ResponseKind::Cname => "cname",
            ResponseKind::Delegation => "delegation",
            ResponseKind::Namezone => "namezone",
            ResponseKind::Refused => "refused",
            ResponseKind::NoEdns => "noedns",
            ResponseKind::Unknown => "unknown",
            ResponseKind::Nil => "nil",
        }
    }
}

impl fmt::Display for ResponseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a response. Rules apply in order; the first match wins.
pub fn typify(response: Option<&Message>) -> ResponseKind {
    let Some(message) = response else {
        return ResponseKind::Nil;
    };

    match message.response_code() {
        ResponseCode::Refused => return ResponseKind::Refused,
        ResponseCode::FormErr => return ResponseKind::NoEdns,
        ResponseCode::NoError => {}
        _ => return ResponseKind::Unknown,
    }

    if let Some(first) = message.answers().first() {
        return if first.record_type() == RecordType::CNAME {
            ResponseKind::Cname
        } else {
            ResponseKind::Answer
        };
    }

    let authority = message.name_servers();
    if !authority.is_empty() && authority.iter().all(|r| r.record_type() == RecordType::NS) {
        return if message.additionals().len() < 2 {
            ResponseKind::Namezone
        } else {
            ResponseKind::Delegation
        };
    }

    ResponseKind::Unknown
}
