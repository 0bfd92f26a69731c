use super::DnsCache;
use gnocco_domain::name::{ancestors, fqdn};
use gnocco_domain::{RecordType, ZoneInfo};
use std::net::IpAddr;

impl DnsCache {
    /// Nearest enclosing zone with a cached `NS` RRset, nameserver addresses
    /// filled from cached `A`/`AAAA` entries. `ZoneInfo::default()` when not
    /// even the root is cached.
    pub fn zone_for(&self, name: &str) -> ZoneInfo {
        let name = fqdn(name);

        for zone in ancestors(&name) {
            let Some(ns) = self.get_positive(zone, RecordType::NS) else {
                continue;
            };
            if ns.values.is_empty() {
                continue;
            }

            let mut info = ZoneInfo::new(zone);
            for server in &ns.values {
                info.add_nameserver(server);
                for record_type in [RecordType::A, RecordType::AAAA] {
                    let Some(addrs) = self.get_positive(server, record_type) else {
                        continue;
                    };
                    for ip in addrs.values.iter().filter_map(|v| v.parse::<IpAddr>().ok()) {
                        info.add_address(server, ip);
                    }
                }
            }
            return info;
        }

        ZoneInfo::default()
    }
}
