use super::record_type_map::RecordTypeMapper;
use gnocco_domain::{DomainError, RecordType, ResourceRecord};
use hickory_proto::rr::rdata::{A, AAAA, CNAME, MX, NS, PTR, SOA, SRV, TXT};
use hickory_proto::rr::{Name, RData, Record};

/// Translation between wire records and [`ResourceRecord`].
///
/// One arm per modelled type in each direction; a new type is a new arm
/// here plus a variant in `RecordType`.
pub struct RecordTranslator;

impl RecordTranslator {
    /// Flatten a decoded record. Types the resolver does not model yield
    /// `None` and are dropped by callers.
    pub fn to_domain(record: &Record) -> Option<ResourceRecord> {
        let record_type = RecordTypeMapper::from_hickory(record.record_type())?;
        let value = match record.data() {
            RData::A(a) => a.0.to_string(),
            RData::AAAA(aaaa) => aaaa.0.to_string(),
            RData::CNAME(name) => name.0.to_ascii(),
            RData::NS(name) => name.0.to_ascii(),
            RData::PTR(name) => name.0.to_ascii(),
            RData::MX(mx) => format!("{} {}", mx.preference(), mx.exchange().to_ascii()),
            RData::TXT(txt) => txt.to_string(),
            RData::SOA(soa) => soa.to_string(),
            RData::SRV(srv) => srv.to_string(),
            _ => return None,
        };

        Some(ResourceRecord::with_class(
            &record.name().to_ascii(),
            record.ttl(),
            &record.dns_class().to_string(),
            record_type,
            value,
        ))
    }

    pub fn to_domain_all(records: &[Record]) -> Vec<ResourceRecord> {
        records.iter().filter_map(Self::to_domain).collect()
    }

    /// Rebuild a wire record for reply synthesis.
    pub fn to_wire(record: &ResourceRecord) -> Result<Record, DomainError> {
        let value = record.value();
        let rdata = match record.record_type() {
            RecordType::A => RData::A(A(value.parse().map_err(|_| bad_value(record))?)),
            RecordType::AAAA => RData::AAAA(AAAA(value.parse().map_err(|_| bad_value(record))?)),
            RecordType::CNAME => RData::CNAME(CNAME(parse_name(value)?)),
            RecordType::NS => RData::NS(NS(parse_name(value)?)),
            RecordType::PTR => RData::PTR(PTR(parse_name(value)?)),
            RecordType::MX => {
                let (pref, exchange) = value.split_once(' ').ok_or_else(|| bad_value(record))?;
                let pref = pref.parse().map_err(|_| bad_value(record))?;
                RData::MX(MX::new(pref, parse_name(exchange)?))
            }
            RecordType::TXT => RData::TXT(TXT::new(vec![value.to_string()])),
            RecordType::SOA => {
                let f: Vec<&str> = value.split_whitespace().collect();
                if f.len() != 7 {
                    return Err(bad_value(record));
                }
                let num = |s: &str| s.parse::<i64>().map_err(|_| bad_value(record));
                RData::SOA(SOA::new(
                    parse_name(f[0])?,
                    parse_name(f[1])?,
                    num(f[2])? as u32,
                    num(f[3])? as i32,
                    num(f[4])? as i32,
                    num(f[5])? as i32,
                    num(f[6])? as u32,
                ))
            }
            RecordType::SRV => {
                let f: Vec<&str> = value.split_whitespace().collect();
                if f.len() != 4 {
                    return Err(bad_value(record));
                }
                let num = |s: &str| s.parse::<u16>().map_err(|_| bad_value(record));
                RData::SRV(SRV::new(num(f[0])?, num(f[1])?, num(f[2])?, parse_name(f[3])?))
            }
        };

        Ok(Record::from_rdata(parse_name(record.name())?, record.ttl(), rdata))
    }
}

pub(crate) fn parse_name(name: &str) -> Result<Name, DomainError> {
    Name::from_ascii(name)
        .map_err(|e| DomainError::InvalidDomainName(format!("Invalid domain '{}': {}", name, e)))
}

fn bad_value(record: &ResourceRecord) -> DomainError {
    DomainError::InvalidDnsResponse(format!(
        "cannot encode {} value '{}'",
        record.record_type(),
        record.value()
    ))
}
