use super::{make_key, CacheClock, CacheMetrics};
use dashmap::DashMap;
use gnocco_application::ports::{CachedAnswer, RecordCache};
use gnocco_domain::config::CacheConfig;
use gnocco_domain::{CacheEntry, RecordType, ResourceRecord};
use rustc_hash::FxBuildHasher;
use std::collections::BTreeMap;
use tracing::{debug, info};

pub(crate) type EntryMap = DashMap<String, CacheEntry, FxBuildHasher>;

enum Probe {
    Hit(CacheEntry),
    Expired,
    Absent,
}

/// TTL-aware `(name, type)` store with separate positive and negative maps.
///
/// Reads consult the negative map first. An expired entry found by a read is
/// removed from both maps and reported as a miss; nothing is swept in the
/// background. Each map operation takes one shard lock and releases it
/// before returning.
pub struct DnsCache {
    pub(crate) positive: EntryMap,
    pub(crate) negative: EntryMap,
    positive_ttl: u32,
    negative_ttl: u32,
    clock: CacheClock,
    metrics: CacheMetrics,
}

impl DnsCache {
    pub fn new(config: &CacheConfig) -> Self {
        Self::with_clock(config, CacheClock::System)
    }

    pub fn with_clock(config: &CacheConfig, clock: CacheClock) -> Self {
        info!(
            positive_capacity = config.positive_capacity,
            negative_capacity = config.negative_capacity,
            positive_ttl = config.positive_ttl,
            negative_ttl = config.negative_ttl,
            "Initializing DNS cache"
        );

        Self {
            positive: DashMap::with_capacity_and_hasher(
                config.positive_capacity,
                FxBuildHasher::default(),
            ),
            negative: DashMap::with_capacity_and_hasher(
                config.negative_capacity,
                FxBuildHasher::default(),
            ),
            positive_ttl: config.positive_ttl,
            negative_ttl: config.negative_ttl,
            clock,
            metrics: CacheMetrics::default(),
        }
    }

    #[inline]
    pub fn now(&self) -> i64 {
        self.clock.now()
    }

    pub fn clock(&self) -> &CacheClock {
        &self.clock
    }

    pub fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }

    /// Look a pair up, telling negative hits apart from positive ones.
    pub fn lookup(&self, name: &str, record_type: RecordType) -> Option<CachedAnswer> {
        let key = make_key(name, record_type);
        let now = self.now();

        for (map, negative) in [(&self.negative, true), (&self.positive, false)] {
            match Self::probe(map, &key, now) {
                Probe::Hit(entry) if negative => {
                    CacheMetrics::bump(&self.metrics.negative_hits);
                    return Some(CachedAnswer::negative(entry));
                }
                Probe::Hit(entry) => {
                    CacheMetrics::bump(&self.metrics.hits);
                    return Some(CachedAnswer::positive(entry));
                }
                Probe::Expired => {
                    self.remove_key(&key);
                    CacheMetrics::bump(&self.metrics.expired_deletions);
                    CacheMetrics::bump(&self.metrics.misses);
                    debug!(key = %key, "Expired entry removed on read");
                    return None;
                }
                Probe::Absent => {}
            }
        }

        CacheMetrics::bump(&self.metrics.misses);
        None
    }

    /// Entry for the pair, negative map first. `None` on miss or expiry.
    pub fn get(&self, name: &str, record_type: RecordType) -> Option<CacheEntry> {
        self.lookup(name, record_type).map(|answer| answer.entry)
    }

    /// Positive-only read: the pair resolves to usable data.
    pub fn get_positive(&self, name: &str, record_type: RecordType) -> Option<CacheEntry> {
        self.lookup(name, record_type)
            .filter(|answer| !answer.is_negative)
            .map(|answer| answer.entry)
    }

    pub fn is_negative(&self, name: &str, record_type: RecordType) -> bool {
        self.lookup(name, record_type)
            .is_some_and(|answer| answer.is_negative)
    }

    /// Replace the RRset for a pair.
    pub fn set(&self, name: &str, record_type: RecordType, values: Vec<String>, ttl: u32, rtt_ms: u32) {
        let key = make_key(name, record_type);
        let ttl = ttl.min(self.positive_ttl);
        let entry = CacheEntry::new(values, ttl, rtt_ms, self.now());
        self.positive.insert(key.clone(), entry);
        CacheMetrics::bump(&self.metrics.insertions);

        debug!(key = %key, ttl = ttl, cache_size = self.positive.len(), "Inserted into cache");
    }

    /// Merge one value into the RRset for a pair and refresh its stamp.
    pub fn set_value(&self, name: &str, record_type: RecordType, ttl: u32, value: &str) {
        let key = make_key(name, record_type);
        let now = self.now();
        let ttl = ttl.min(self.positive_ttl);

        let mut entry = self.positive.entry(key).or_default();
        if entry.is_expired(now) {
            entry.values.clear();
        }
        entry.merge_value(value);
        entry.ttl = ttl;
        entry.stored_at = now;
        CacheMetrics::bump(&self.metrics.insertions);
    }

    /// Store the RRset formed by `records` (all sharing one owner and type;
    /// the first record decides). The RRset TTL is the smallest record TTL.
    ///
    /// For an `NS` RRset, address records in `additionals` owned by one of
    /// the named nameservers are stored as their own `name/A` and
    /// `name/AAAA` entries. Returns the number of glue RRsets stored.
    pub fn set_rrset(&self, records: &[ResourceRecord], additionals: &[ResourceRecord], rtt_ms: u32) -> usize {
        let Some(first) = records.first() else {
            return 0;
        };
        let owner = first.name();
        let record_type = first.record_type();

        let rrset: Vec<&ResourceRecord> = records
            .iter()
            .filter(|r| r.name() == owner && r.record_type() == record_type)
            .collect();
        let ttl = rrset.iter().map(|r| r.ttl()).min().unwrap_or(0);
        let mut values: Vec<String> = Vec::with_capacity(rrset.len());
        for record in &rrset {
            if !values.iter().any(|v| v == record.value()) {
                values.push(record.value().to_string());
            }
        }
        self.set(owner, record_type, values, ttl, rtt_ms);

        if record_type != RecordType::NS {
            return 0;
        }

        let mut glue: BTreeMap<(&str, RecordType), (Vec<String>, u32)> = BTreeMap::new();
        for extra in additionals {
            if !extra.record_type().is_address() {
                continue;
            }
            if !rrset.iter().any(|ns| ns.value() == extra.name()) {
                continue;
            }
            let slot = glue
                .entry((extra.name(), extra.record_type()))
                .or_insert_with(|| (Vec::new(), extra.ttl()));
            if !slot.0.iter().any(|v| v == extra.value()) {
                slot.0.push(extra.value().to_string());
            }
            slot.1 = slot.1.min(extra.ttl());
        }

        let stored = glue.len();
        for ((name, rtype), (values, ttl)) in glue {
            self.set(name, rtype, values, ttl, rtt_ms);
        }
        if stored > 0 {
            debug!(zone = %owner, glue = stored, "Stored glue records");
        }
        stored
    }

    /// Remember that a pair failed, for the negative default TTL.
    pub fn set_negative(&self, name: &str, record_type: RecordType, reason: &str) {
        let key = make_key(name, record_type);
        let entry = CacheEntry::new(vec![reason.to_string()], self.negative_ttl, 0, self.now());
        self.negative.insert(key.clone(), entry);

        debug!(key = %key, reason = reason, ttl = self.negative_ttl, "Negative entry stored");
    }

    pub fn delete(&self, name: &str, record_type: RecordType) {
        self.remove_key(&make_key(name, record_type));
    }

    /// Positive entry count.
    pub fn size(&self) -> usize {
        self.positive.len()
    }

    pub fn negative_size(&self) -> usize {
        self.negative.len()
    }

    pub(crate) fn insert_raw(&self, name: &str, record_type: RecordType, entry: CacheEntry) {
        self.positive.insert(make_key(name, record_type), entry);
    }

    fn remove_key(&self, key: &str) {
        self.negative.remove(key);
        self.positive.remove(key);
    }

    fn probe(map: &EntryMap, key: &str, now: i64) -> Probe {
        match map.get(key) {
            Some(entry) if entry.is_empty_sentinel() => Probe::Absent,
            Some(entry) if entry.is_expired(now) => Probe::Expired,
            Some(entry) => Probe::Hit(entry.clone()),
            None => Probe::Absent,
        }
    }
}

impl Default for DnsCache {
    fn default() -> Self {
        Self::new(&CacheConfig::default())
    }
}

impl RecordCache for DnsCache {
    fn lookup(&self, name: &str, record_type: RecordType) -> Option<CachedAnswer> {
        DnsCache::lookup(self, name, record_type)
    }

    fn now(&self) -> i64 {
        DnsCache::now(self)
    }
}
