use super::{cache_rrsets, elapsed_ms};
use crate::dns::cache::DnsCache;
use crate::dns::forwarding::{typify, DnsResponse, MessageBuilder, ResponseKind, ResponseParser};
use crate::dns::pending::PendingQueryStack;
use crate::dns::transport::UpstreamExchange;
use gnocco_application::ports::DnsResolution;
use gnocco_domain::name::is_subdomain;
use gnocco_domain::{DnsQuery, DomainError, RecordType, ResourceRecord, ZoneInfo};
use std::collections::HashSet;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// CNAME hops followed when assembling the final answer.
const MAX_CNAME_CHAIN: usize = 16;

/// Walks delegations from the root to an authoritative answer.
///
/// Work is driven by a [`PendingQueryStack`]: whatever must be known before
/// the current question can be asked (a nameserver address, a CNAME
/// target) is pushed above it. Every pop counts as one step and a lookup
/// that needs more than `max_steps` fails.
pub struct IterativeResolver {
    cache: Arc<DnsCache>,
    exchange: Arc<dyn UpstreamExchange>,
    port: u16,
    max_steps: usize,
}

/// State of one top-level lookup.
struct Session {
    pending: PendingQueryStack,
    failed: HashSet<DnsQuery>,
    chased: HashSet<DnsQuery>,
    steps: usize,
    exchanges: usize,
    last_server: Option<SocketAddr>,
}

impl Session {
    fn new(query: DnsQuery) -> Self {
        Self {
            pending: PendingQueryStack::seeded(query),
            failed: HashSet::new(),
            chased: HashSet::new(),
            steps: 0,
            exchanges: 0,
            last_server: None,
        }
    }

    fn fail(&mut self, query: &DnsQuery, reason: &str) {
        warn!(query = %query, reason = reason, "Resolution branch failed");
        self.pending.pop_matching(query);
        self.failed.insert(query.clone());
    }
}

enum Target {
    Server(SocketAddr),
    /// A nameserver address has to be resolved first.
    Deferred,
    Unreachable,
}

impl IterativeResolver {
    pub fn new(
        cache: Arc<DnsCache>,
        exchange: Arc<dyn UpstreamExchange>,
        port: u16,
        max_steps: usize,
    ) -> Self {
        Self {
            cache,
            exchange,
            port,
            max_steps,
        }
    }

    pub fn cache(&self) -> &Arc<DnsCache> {
        &self.cache
    }

    #[instrument(skip(self), fields(domain = %query.domain, record_type = %query.record_type))]
    pub async fn lookup(&self, query: &DnsQuery) -> Result<DnsResolution, DomainError> {
        let mut session = Session::new(query.clone());

        while let Some(current) = session.pending.pop() {
            session.steps += 1;
            if session.steps > self.max_steps {
                warn!(steps = self.max_steps, pending = session.pending.len(), "Step limit reached");
                return Err(DomainError::MaxStepsExceeded(query.to_string()));
            }
            self.step(&mut session, current).await?;
        }

        let resolution = self.compose(query, &session);
        match &resolution {
            Ok(r) => info!(
                answers = r.records.len(),
                steps = session.steps,
                exchanges = session.exchanges,
                "Lookup resolved"
            ),
            Err(e) => warn!(error = %e, steps = session.steps, "Lookup failed"),
        }
        resolution
    }

    async fn step(&self, session: &mut Session, current: DnsQuery) -> Result<(), DomainError> {
        match self.cache.lookup(&current.domain, current.record_type) {
            Some(hit) if hit.is_negative => {
                session.fail(&current, "negative cache entry");
                return Ok(());
            }
            Some(_) => {
                session.pending.pop_matching(&current);
                return Ok(());
            }
            None => {}
        }

        if current.record_type != RecordType::CNAME {
            if let Some(target) = self.cached_cname(&current.domain) {
                self.chase(session, &current, &target);
                return Ok(());
            }
        }

        let zone = self.cache.zone_for(&current.domain);
        if zone.is_unknown() {
            return Err(DomainError::RootHints("root zone is not cached".into()));
        }

        let server = match self.choose_server(session, &current, &zone) {
            Target::Server(server) => server,
            Target::Deferred => return Ok(()),
            Target::Unreachable => {
                session.fail(&current, "no usable nameserver");
                return Ok(());
            }
        };

        let request = MessageBuilder::query(&current.domain, current.record_type, false)?;
        let started = Instant::now();
        session.exchanges += 1;
        let response = match self.exchange.exchange(server, &request).await {
            Ok(message) => Some(message),
            Err(e) => {
                warn!(server = %server, query = %current, error = %e, "Upstream exchange failed");
                None
            }
        };
        let rtt_ms = elapsed_ms(started);

        let mut kind = typify(response.as_ref());
        if kind == ResponseKind::Cname && current.record_type == RecordType::CNAME {
            kind = ResponseKind::Answer;
        }
        debug!(server = %server, zone = %zone.name, query = %current, kind = %kind, rtt_ms = rtt_ms, "Classified response");

        let Some(response) = response.map(DnsResponse::from_message) else {
            session.fail(&current, kind.as_str());
            return Ok(());
        };
        session.last_server = Some(server);

        match kind {
            ResponseKind::Delegation | ResponseKind::Namezone => {
                self.follow_referral(session, &current, &zone, &response, kind, rtt_ms)
            }
            ResponseKind::Answer => {
                self.cache_answers(&current, &zone, &response, rtt_ms);
                session.pending.pop_matching(&current);
            }
            ResponseKind::Cname => {
                self.cache_answers(&current, &zone, &response, rtt_ms);
                session.pending.pop_matching(&current);
                match self.cached_cname(&current.domain) {
                    Some(target) => self.chase(session, &current, &target),
                    None => session.fail(&current, "CNAME for another owner"),
                }
            }
            ResponseKind::Refused | ResponseKind::NoEdns | ResponseKind::Unknown => {
                let reason = match kind {
                    ResponseKind::Unknown => ResponseParser::rcode_to_status(response.rcode),
                    other => other.as_str(),
                };
                self.cache
                    .set_negative(&current.domain, current.record_type, reason);
                session.fail(&current, reason);
            }
            ResponseKind::Nil => session.fail(&current, kind.as_str()),
        }
        Ok(())
    }

    /// Cache only the answers owned by the question or its in-zone CNAME chain.
    fn cache_answers(&self, current: &DnsQuery, zone: &ZoneInfo, response: &DnsResponse, rtt_ms: u32) {
        let accepted = response.answer_chain(&current.domain, current.record_type, &zone.name);
        let ignored = response.answers.len() - accepted.len();
        if ignored > 0 {
            debug!(zone = %zone.name, query = %current, ignored = ignored, "Ignoring out-of-zone answer records");
        }
        cache_rrsets(&self.cache, &accepted, rtt_ms);
    }

    fn cached_cname(&self, name: &str) -> Option<String> {
        self.cache
            .get_positive(name, RecordType::CNAME)
            .and_then(|entry| entry.values.into_iter().next())
    }

    fn chase(&self, session: &mut Session, current: &DnsQuery, target: &str) {
        let next = DnsQuery::new(target, current.record_type);
        if !session.chased.insert(next.clone()) {
            session.fail(current, "CNAME loop");
            return;
        }
        debug!(from = %current.domain, to = %next.domain, "Chasing CNAME");
        session.pending.pop_matching(current);
        session.pending.push(next);
    }

    /// Pick an address to ask, or queue the work needed to get one.
    fn choose_server(&self, session: &mut Session, current: &DnsQuery, zone: &ZoneInfo) -> Target {
        let reachable = zone.with_addresses();
        if !reachable.is_empty() {
            let (_, addrs) = reachable[fastrand::usize(..reachable.len())];
            let v4: Vec<IpAddr> = addrs.iter().copied().filter(IpAddr::is_ipv4).collect();
            let pool: &[IpAddr] = if v4.is_empty() { addrs } else { &v4 };
            let ip = pool[fastrand::usize(..pool.len())];
            return Target::Server(SocketAddr::new(ip, self.port));
        }

        let candidates: Vec<DnsQuery> = zone
            .nameserver_names()
            .map(|ns| DnsQuery::new(ns, RecordType::A))
            .filter(|q| q != current && !session.pending.contains(q) && !session.failed.contains(q))
            .collect();
        if candidates.is_empty() {
            return Target::Unreachable;
        }

        let ns = candidates[fastrand::usize(..candidates.len())].clone();
        debug!(zone = %zone.name, nameserver = %ns.domain, "Resolving nameserver address first");
        session.pending.push(current.clone());
        session.pending.push(ns);
        Target::Deferred
    }

    fn follow_referral(
        &self,
        session: &mut Session,
        current: &DnsQuery,
        zone: &ZoneInfo,
        response: &DnsResponse,
        kind: ResponseKind,
        rtt_ms: u32,
    ) {
        let nameservers = response.referral_nameservers();
        let Some(referral_zone) = nameservers.first().map(|r| r.name().to_string()) else {
            session.fail(current, "referral without NS records");
            return;
        };

        let below_zone = referral_zone != zone.name && is_subdomain(&referral_zone, &zone.name);
        if !below_zone || !is_subdomain(&current.domain, &referral_zone) {
            session.fail(current, "referral does not descend");
            return;
        }

        let glue = self.cache.set_rrset(&nameservers, &response.additionals, rtt_ms);
        debug!(zone = %referral_zone, nameservers = nameservers.len(), glue = glue, "Following referral");
        session.pending.push(current.clone());

        if kind == ResponseKind::Namezone {
            for ns in nameservers.iter().filter(|r| r.name() == referral_zone) {
                let q = DnsQuery::new(ns.value(), RecordType::A);
                if q != *current && !session.failed.contains(&q) {
                    session.pending.push(q);
                }
            }
        }
    }

    /// Assemble the answer from the cache, following cached CNAMEs.
    fn compose(&self, query: &DnsQuery, session: &Session) -> Result<DnsResolution, DomainError> {
        let now = self.cache.now();
        let mut records: Vec<ResourceRecord> = Vec::new();
        let mut chain: Vec<Arc<str>> = Vec::new();
        let mut name = query.domain.to_string();

        for _ in 0..=MAX_CNAME_CHAIN {
            if let Some(entry) = self.cache.get_positive(&name, query.record_type) {
                records.extend(entry.to_records(&name, query.record_type, now));
                let mut resolution =
                    DnsResolution::new(records, session.exchanges == 0).with_cname_chain(chain);
                if let Some(server) = session.last_server {
                    resolution = resolution.with_upstream(server.to_string());
                }
                return Ok(resolution);
            }
            if query.record_type == RecordType::CNAME {
                break;
            }

            let Some(cname) = self.cache.get_positive(&name, RecordType::CNAME) else {
                break;
            };
            let Some(target) = cname.values.first().cloned() else {
                break;
            };
            records.extend(cname.to_records(&name, RecordType::CNAME, now));
            chain.push(Arc::from(target.as_str()));
            name = target;
        }

        if self.cache.is_negative(&query.domain, query.record_type) {
            return Err(DomainError::NegativeCached(query.to_string()));
        }
        Err(DomainError::ResolutionFailed(query.to_string()))
    }
}
