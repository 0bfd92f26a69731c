#![allow(dead_code)]

use async_trait::async_trait;
use gnocco_application::ports::{CachedAnswer, DnsResolution, DnsResolver, RecordCache};
use gnocco_domain::cache_entry::unix_now;
use gnocco_domain::name::fqdn;
use gnocco_domain::{CacheEntry, DnsQuery, DomainError, RecordType, ResourceRecord};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

// ============================================================================
// Mock RecordCache
// ============================================================================

#[derive(Clone, Default)]
pub struct MockRecordCache {
    entries: Arc<RwLock<HashMap<(String, RecordType), CachedAnswer>>>,
}

impl MockRecordCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, name: &str, record_type: RecordType, values: &[&str]) {
        let entry = CacheEntry::new(
            values.iter().map(|v| v.to_string()).collect(),
            300,
            0,
            unix_now(),
        );
        self.entries
            .write()
            .unwrap()
            .insert((fqdn(name), record_type), CachedAnswer::positive(entry));
    }

    pub fn insert_negative(&self, name: &str, record_type: RecordType) {
        let entry = CacheEntry::new(vec!["refused".to_string()], 60, 0, unix_now());
        self.entries
            .write()
            .unwrap()
            .insert((fqdn(name), record_type), CachedAnswer::negative(entry));
    }
}

impl RecordCache for MockRecordCache {
    fn lookup(&self, name: &str, record_type: RecordType) -> Option<CachedAnswer> {
        self.entries
            .read()
            .unwrap()
            .get(&(fqdn(name), record_type))
            .cloned()
    }
}

// ============================================================================
// Mock DnsResolver
// ============================================================================

#[derive(Clone, Default)]
pub struct MockDnsResolver {
    responses: Arc<RwLock<HashMap<String, DnsResolution>>>,
    calls: Arc<AtomicUsize>,
    delay: Option<Duration>,
}

impl MockDnsResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolver that sleeps before answering, to hold admission permits.
    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn set_response(&self, domain: &str, records: Vec<ResourceRecord>) {
        self.responses.write().unwrap().insert(
            fqdn(domain),
            DnsResolution::new(records, false).with_upstream("192.0.2.53:53"),
        );
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DnsResolver for MockDnsResolver {
    async fn lookup(&self, query: &DnsQuery) -> Result<DnsResolution, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let found = self.responses.read().unwrap().get(query.domain.as_ref()).cloned();
        found.ok_or_else(|| DomainError::ResolutionFailed(query.to_string()))
    }
}

// ============================================================================
// Builders
// ============================================================================

pub fn a_record(name: &str, ip: &str) -> ResourceRecord {
    ResourceRecord::new(name, 300, RecordType::A, ip)
}
