use super::DnsCache;
use gnocco_domain::name::fqdn;
use gnocco_domain::{CacheEntry, DomainError, RecordType};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::net::{Ipv4Addr, Ipv6Addr};
use std::path::Path;
use tracing::{debug, info};

/// Root hints never expire in practice.
pub const ROOT_HINTS_TTL: u32 = 365 * 24 * 3600;

impl DnsCache {
    /// Seed the root zone from hints text, one `name ipv4 [ipv6]` per line.
    ///
    /// Blank lines and lines starting with `#` or `;` are ignored, as are
    /// lines that are not UTF-8 or whose IPv4 address does not parse. A bad
    /// IPv6 field only drops the `AAAA` entry. Returns the number of root
    /// servers loaded.
    pub fn load_roots<R: Read>(&self, reader: R) -> Result<usize, DomainError> {
        let now = self.now();
        let mut servers: Vec<String> = Vec::new();

        for (index, raw) in BufReader::new(reader).split(b'\n').enumerate() {
            let raw = raw?;
            let Ok(line) = std::str::from_utf8(&raw) else {
                debug!(line = index + 1, "Skipping root hints line that is not UTF-8");
                continue;
            };
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            let mut fields = line.split_whitespace();
            let (Some(name), Some(v4)) = (fields.next(), fields.next()) else {
                debug!(line = %line, "Skipping short root hints line");
                continue;
            };
            let Ok(v4) = v4.parse::<Ipv4Addr>() else {
                debug!(line = %line, "Skipping root hints line with bad IPv4");
                continue;
            };

            let name = fqdn(name);
            self.insert_raw(&name, RecordType::A, Self::hint(v4.to_string(), now));
            match fields.next().map(|f| (f, f.parse::<Ipv6Addr>())) {
                Some((_, Ok(v6))) => {
                    self.insert_raw(&name, RecordType::AAAA, Self::hint(v6.to_string(), now))
                }
                Some((field, Err(_))) => {
                    debug!(server = %name, field = %field, "Ignoring bad IPv6 in root hints")
                }
                None => {}
            }
            if !servers.contains(&name) {
                servers.push(name);
            }
        }

        let count = servers.len();
        if count > 0 {
            self.insert_raw(".", RecordType::NS, CacheEntry::new(servers, ROOT_HINTS_TTL, 0, now));
        }
        info!(root_servers = count, "Root hints loaded");
        Ok(count)
    }

    /// Seed the root zone from a hints file. A missing or unreadable file is
    /// an error; iterative resolution cannot start without it.
    pub fn load_roots_file(&self, path: &Path) -> Result<usize, DomainError> {
        let file = File::open(path)
            .map_err(|e| DomainError::RootHints(format!("{}: {}", path.display(), e)))?;
        let count = self.load_roots(file)?;
        if count == 0 {
            return Err(DomainError::RootHints(format!(
                "{}: no usable root servers",
                path.display()
            )));
        }
        Ok(count)
    }

    fn hint(value: String, now: i64) -> CacheEntry {
        CacheEntry::new(vec![value], ROOT_HINTS_TTL, 0, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HINTS: &str = "\
# name            ipv4          ipv6
a.root-servers.example  198.51.100.1  2001:db8::1
b.root-servers.example  198.51.100.2

c.root-servers.example  not-an-ip
d.root-servers.example
; comment
";

    #[test]
    fn test_load_roots_seeds_ns_and_addresses() {
        let cache = DnsCache::default();
        let count = cache.load_roots(HINTS.as_bytes()).unwrap();

        assert_eq!(count, 2);
        let ns = cache.get(".", RecordType::NS).unwrap();
        assert_eq!(ns.values, vec!["a.root-servers.example.", "b.root-servers.example."]);
        assert_eq!(ns.ttl, ROOT_HINTS_TTL);

        let a = cache.get("a.root-servers.example", RecordType::A).unwrap();
        assert_eq!(a.values, vec!["198.51.100.1"]);
        assert!(cache.get("a.root-servers.example", RecordType::AAAA).is_some());
        assert!(cache.get("b.root-servers.example", RecordType::AAAA).is_none());
        assert!(cache.get("c.root-servers.example", RecordType::A).is_none());
    }

    #[test]
    fn test_non_utf8_line_is_skipped() {
        let cache = DnsCache::default();
        let hints: &[u8] =
            b"a.root-servers.example 198.51.100.1\n\xff\xfe bogus 198.51.100.9\nb.root-servers.example 198.51.100.2\n";

        let count = cache.load_roots(hints).unwrap();

        assert_eq!(count, 2);
        assert!(cache.get("b.root-servers.example", RecordType::A).is_some());
    }

    #[test]
    fn test_bad_ipv6_keeps_ipv4() {
        let cache = DnsCache::default();
        let count = cache
            .load_roots("e.root-servers.example 198.51.100.5 not-v6\n".as_bytes())
            .unwrap();

        assert_eq!(count, 1);
        let a = cache.get("e.root-servers.example", RecordType::A).unwrap();
        assert_eq!(a.values, vec!["198.51.100.5"]);
        assert!(cache.get("e.root-servers.example", RecordType::AAAA).is_none());
    }

    #[test]
    fn test_missing_hints_file_is_fatal() {
        let cache = DnsCache::default();
        let result = cache.load_roots_file(Path::new("/nonexistent/named.root"));
        assert!(matches!(result, Err(DomainError::RootHints(_))));
    }
}
