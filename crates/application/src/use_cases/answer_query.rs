use gnocco_domain::{DnsQuery, DomainError, RecordType};
use std::net::IpAddr;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, instrument, warn};

use crate::ports::{DnsResolution, DnsResolver, RecordCache};

/// Answers one client question: cache first, then the resolver.
///
/// At most `max_jobs` questions are answered at once; past that the
/// caller gets `DomainError::Overloaded` and the resolver is not engaged.
pub struct AnswerQueryUseCase {
    cache: Arc<dyn RecordCache>,
    resolver: Arc<dyn DnsResolver>,
    permits: Arc<Semaphore>,
}

impl AnswerQueryUseCase {
    pub fn new(
        cache: Arc<dyn RecordCache>,
        resolver: Arc<dyn DnsResolver>,
        max_jobs: usize,
    ) -> Self {
        Self {
            cache,
            resolver,
            permits: Arc::new(Semaphore::new(max_jobs)),
        }
    }

    pub fn available_jobs(&self) -> usize {
        self.permits.available_permits()
    }

    #[instrument(skip(self), fields(domain = %query.domain, record_type = %query.record_type))]
    pub async fn execute(
        &self,
        remote: IpAddr,
        query: &DnsQuery,
    ) -> Result<DnsResolution, DomainError> {
        let _permit = match self.permits.try_acquire() {
            Ok(permit) => permit,
            Err(_) => {
                warn!(client = %remote, "Job ceiling reached, refusing query");
                return Err(DomainError::Overloaded);
            }
        };

        if let Some(resolution) = self.answer_from_cache(query)? {
            debug!(client = %remote, "Answered from cache");
            return Ok(resolution);
        }

        self.resolver.lookup(query).await
    }

    fn answer_from_cache(&self, query: &DnsQuery) -> Result<Option<DnsResolution>, DomainError> {
        let now = self.cache.now();

        match self.cache.lookup(&query.domain, query.record_type) {
            Some(hit) if hit.is_negative => {
                return Err(DomainError::NegativeCached(query.to_string()));
            }
            Some(hit) => {
                let records = hit.entry.to_records(&query.domain, query.record_type, now);
                return Ok(Some(DnsResolution::new(records, true)));
            }
            None => {}
        }

        if query.record_type == RecordType::CNAME {
            return Ok(None);
        }

        let cname = match self.cache.lookup(&query.domain, RecordType::CNAME) {
            Some(hit) if !hit.is_negative => hit.entry,
            _ => return Ok(None),
        };
        let Some(target) = cname.values.first() else {
            return Ok(None);
        };

        match self.cache.lookup(target, query.record_type) {
            Some(hit) if !hit.is_negative => {
                let mut records = cname.to_records(&query.domain, RecordType::CNAME, now);
                records.extend(hit.entry.to_records(target, query.record_type, now));
                let chain = vec![Arc::from(target.as_str())];
                Ok(Some(DnsResolution::new(records, true).with_cname_chain(chain)))
            }
            _ => Ok(None),
        }
    }
}
