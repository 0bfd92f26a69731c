//! Nameserver discovery from resolv.conf-style files.

use gnocco_domain::DomainError;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::net::{IpAddr, SocketAddr};
use std::path::Path;
use tracing::debug;

const DNS_PORT: u16 = 53;

/// Collect every `nameserver <ip>` line. Other directives, comments and
/// entries that are not IP literals are skipped.
pub fn parse_nameservers<R: Read>(reader: R) -> Result<Vec<SocketAddr>, DomainError> {
    let mut servers = Vec::new();

    for line in BufReader::new(reader).lines() {
        let line = line?;
        let mut words = line.split_whitespace();
        if words.next() != Some("nameserver") {
            continue;
        }
        let Some(addr) = words.next() else {
            continue;
        };
        // Zone-scoped IPv6 literals ("fe80::1%eth0") are not usable here.
        match addr.parse::<IpAddr>() {
            Ok(ip) => servers.push(SocketAddr::new(ip, DNS_PORT)),
            Err(_) => debug!(entry = addr, "Skipping nameserver entry"),
        }
    }

    Ok(servers)
}

pub fn read_nameservers(path: &Path) -> Result<Vec<SocketAddr>, DomainError> {
    let file = File::open(path)?;
    parse_nameservers(file)
}
