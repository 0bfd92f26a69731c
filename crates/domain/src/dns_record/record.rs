use super::RecordType;
use crate::name::fqdn;
use std::fmt;
use std::sync::Arc;

/// Resource record in its canonical, wire-independent form.
///
/// `value` is the type-specific rendering: an IP literal for A/AAAA, a
/// target name for NS/CNAME/PTR, `"<pref> <exchange>"` for MX and the
/// presentation text for everything else.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceRecord {
    name: Arc<str>,
    ttl: u32,
    class: Arc<str>,
    record_type: RecordType,
    value: Arc<str>,
}

impl ResourceRecord {
    /// Create an `IN` class record. Name-valued types get their target
    /// normalized the same way as the owner name.
    pub fn new(name: &str, ttl: u32, record_type: RecordType, value: impl AsRef<str>) -> Self {
        Self::with_class(name, ttl, "IN", record_type, value)
    }

    pub fn with_class(
        name: &str,
        ttl: u32,
        class: &str,
        record_type: RecordType,
        value: impl AsRef<str>,
    ) -> Self {
        let value = if record_type.is_name_target() {
            fqdn(value.as_ref())
        } else {
            value.as_ref().to_string()
        };
        Self {
            name: Arc::from(fqdn(name)),
            ttl,
            class: Arc::from(class.to_ascii_uppercase()),
            record_type,
            value: Arc::from(value),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ttl(&self) -> u32 {
        self.ttl
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn record_type(&self) -> RecordType {
        self.record_type
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for ResourceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}",
            self.name, self.ttl, self.class, self.record_type, self.value
        )
    }
}
