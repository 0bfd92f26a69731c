#![allow(dead_code)]
use gnocco_domain::config::CacheConfig;
use gnocco_infrastructure::dns::cache::{CacheClock, DnsCache};
use hickory_proto::op::{Message, MessageType, OpCode, ResponseCode};
use hickory_proto::rr::rdata::{A, AAAA, CNAME, NS};
use hickory_proto::rr::{Name, RData, Record};
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::sync::Arc;

pub const ROOT_SERVER: &str = "198.51.100.1";
pub const EXAMPLE_NS: &str = "203.0.113.10";

pub fn server(ip: &str) -> SocketAddr {
    SocketAddr::new(ip.parse().unwrap(), 53)
}

pub fn name(s: &str) -> Name {
    Name::from_str(s).unwrap()
}

/// Cache on a manual clock, seeded with a single root server.
pub fn cache_with_roots() -> Arc<DnsCache> {
    let cache = DnsCache::with_clock(&CacheConfig::default(), CacheClock::manual(1_700_000_000));
    let hints = format!("a.root-servers.net {}\n", ROOT_SERVER);
    cache.load_roots(hints.as_bytes()).unwrap();
    Arc::new(cache)
}

/// Builder for canned upstream responses.
pub struct ResponseBuilder {
    message: Message,
}

impl ResponseBuilder {
    pub fn new() -> Self {
        let mut message = Message::new(0, MessageType::Response, OpCode::Query);
        message.set_response_code(ResponseCode::NoError);
        Self { message }
    }

    pub fn rcode(mut self, rcode: ResponseCode) -> Self {
        self.message.set_response_code(rcode);
        self
    }

    pub fn answer_a(mut self, owner: &str, ip: &str, ttl: u32) -> Self {
        self.message.add_answer(address(owner, ip, ttl));
        self
    }

    pub fn answer_cname(mut self, alias: &str, target: &str, ttl: u32) -> Self {
        self.message
            .add_answer(Record::from_rdata(name(alias), ttl, RData::CNAME(CNAME(name(target)))));
        self
    }

    pub fn referral(mut self, zone: &str, nameserver: &str) -> Self {
        self.message
            .add_name_server(Record::from_rdata(name(zone), 172_800, RData::NS(NS(name(nameserver)))));
        self
    }

    pub fn glue(mut self, nameserver: &str, ip: &str) -> Self {
        self.message.add_additional(address(nameserver, ip, 172_800));
        self
    }

    pub fn truncated(mut self) -> Self {
        self.message.set_truncated(true);
        self
    }

    pub fn build(self) -> Message {
        self.message
    }
}

impl Default for ResponseBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn address(owner: &str, ip: &str, ttl: u32) -> Record {
    let rdata = match ip.parse::<IpAddr>().unwrap() {
        IpAddr::V4(v4) => RData::A(A(v4)),
        IpAddr::V6(v6) => RData::AAAA(AAAA(v6)),
    };
    Record::from_rdata(name(owner), ttl, rdata)
}
