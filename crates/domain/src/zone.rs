use crate::name::fqdn;
use std::collections::BTreeMap;
use std::net::IpAddr;

/// Everything known about who is authoritative for `name` at one point of a
/// resolution.
///
/// `ZoneInfo::default()` (empty name, no nameservers) means "unknown" and is
/// distinct from the root zone, whose name is `"."`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZoneInfo {
    pub name: String,
    pub nameservers: BTreeMap<String, Vec<IpAddr>>,
}

impl ZoneInfo {
    pub fn new(name: &str) -> Self {
        Self {
            name: fqdn(name),
            nameservers: BTreeMap::new(),
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.name.is_empty() && self.nameservers.is_empty()
    }

    pub fn is_root(&self) -> bool {
        self.name == "."
    }

    pub fn add_nameserver(&mut self, nameserver: &str) {
        self.nameservers.entry(fqdn(nameserver)).or_default();
    }

    /// Record an address for a nameserver, ignoring duplicates.
    /// Returns false when the nameserver is not part of this zone.
    pub fn add_address(&mut self, nameserver: &str, addr: IpAddr) -> bool {
        match self.nameservers.get_mut(&fqdn(nameserver)) {
            Some(addrs) => {
                if !addrs.contains(&addr) {
                    addrs.push(addr);
                }
                true
            }
            None => false,
        }
    }

    pub fn nameserver_names(&self) -> impl Iterator<Item = &str> {
        self.nameservers.keys().map(String::as_str)
    }

    pub fn addresses_of(&self, nameserver: &str) -> &[IpAddr] {
        self.nameservers
            .get(&fqdn(nameserver))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Nameservers for which at least one address is known.
    pub fn with_addresses(&self) -> Vec<(&str, &[IpAddr])> {
        self.nameservers
            .iter()
            .filter(|(_, addrs)| !addrs.is_empty())
            .map(|(ns, addrs)| (ns.as_str(), addrs.as_slice()))
            .collect()
    }
}
