use super::storage::EntryMap;
use super::{split_key, DnsCache};
use gnocco_domain::{CacheEntry, DomainError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Where a cache dump goes. A file gets the binary checkpoint, the console
/// gets a readable listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheSink {
    File(PathBuf),
    Console,
}

/// On-disk form of both maps. Not versioned: only meant to survive a
/// restart of the same build.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    positive: BTreeMap<String, CacheEntry>,
    negative: BTreeMap<String, CacheEntry>,
}

fn collect(map: &EntryMap) -> BTreeMap<String, CacheEntry> {
    map.iter()
        .map(|e| (e.key().clone(), e.value().clone()))
        .collect()
}

impl DnsCache {
    /// Write both maps to `writer` as CBOR.
    pub fn dump<W: Write>(&self, writer: W) -> Result<(), DomainError> {
        let snapshot = Snapshot {
            positive: collect(&self.positive),
            negative: collect(&self.negative),
        };
        ciborium::into_writer(&snapshot, writer)
            .map_err(|e| DomainError::CachePersistence(format!("encode failed: {}", e)))
    }

    /// Restore a snapshot written by [`DnsCache::dump`]. Entries overwrite
    /// whatever is cached under the same key. Returns the number of entries
    /// restored across both maps.
    pub fn load<R: Read>(&self, reader: R) -> Result<usize, DomainError> {
        let snapshot: Snapshot = ciborium::from_reader(reader)
            .map_err(|e| DomainError::CachePersistence(format!("decode failed: {}", e)))?;

        let restored = snapshot.positive.len() + snapshot.negative.len();
        for (key, entry) in snapshot.positive {
            self.positive.insert(key, entry);
        }
        for (key, entry) in snapshot.negative {
            self.negative.insert(key, entry);
        }
        Ok(restored)
    }

    pub fn dump_to(&self, sink: &CacheSink) -> Result<(), DomainError> {
        match sink {
            CacheSink::File(path) => {
                let file = File::create(path).map_err(|e| persistence_io(path, e))?;
                let mut writer = BufWriter::new(file);
                self.dump(&mut writer)?;
                writer.flush().map_err(|e| persistence_io(path, e))?;
                info!(
                    path = %path.display(),
                    positive = self.size(),
                    negative = self.negative_size(),
                    "Cache checkpoint written"
                );
                Ok(())
            }
            CacheSink::Console => {
                let stdout = io::stdout();
                let mut lock = stdout.lock();
                self.write_listing(&mut lock)
            }
        }
    }

    pub fn load_from(&self, path: &Path) -> Result<usize, DomainError> {
        let file = File::open(path).map_err(|e| persistence_io(path, e))?;
        let restored = self.load(BufReader::new(file))?;
        info!(path = %path.display(), entries = restored, "Cache checkpoint restored");
        Ok(restored)
    }

    /// Zone-file-like listing of every entry, remaining TTLs as of now,
    /// headed by the cache counters.
    pub fn write_listing<W: Write>(&self, writer: &mut W) -> Result<(), DomainError> {
        let now = self.now();
        writeln!(writer, "; {}", self.metrics())?;
        let sections = [("positive", collect(&self.positive)), ("negative", collect(&self.negative))];

        for (label, entries) in sections {
            writeln!(writer, "; {} ({} entries)", label, entries.len())?;
            for (key, entry) in entries {
                match split_key(&key) {
                    Some((name, record_type)) => {
                        for record in entry.to_records(name, record_type, now) {
                            writeln!(writer, "{}", record)?;
                        }
                    }
                    None => writeln!(writer, "; unreadable key {}", key)?,
                }
            }
        }
        Ok(())
    }
}

fn persistence_io(path: &Path, e: io::Error) -> DomainError {
    DomainError::CachePersistence(format!("{}: {}", path.display(), e))
}
