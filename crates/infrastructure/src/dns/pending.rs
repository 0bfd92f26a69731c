use gnocco_domain::DnsQuery;
use parking_lot::Mutex;

/// LIFO work list of questions still needed to answer one lookup.
///
/// A question is present at most once; pushing it again is a no-op.
#[derive(Debug, Default)]
pub struct PendingQueryStack {
    items: Mutex<Vec<DnsQuery>>,
}

impl PendingQueryStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded(query: DnsQuery) -> Self {
        Self {
            items: Mutex::new(vec![query]),
        }
    }

    /// Returns false when the question was already pending.
    pub fn push(&self, query: DnsQuery) -> bool {
        let mut items = self.items.lock();
        if items.contains(&query) {
            return false;
        }
        items.push(query);
        true
    }

    pub fn pop(&self) -> Option<DnsQuery> {
        self.items.lock().pop()
    }

    /// Drop every occurrence of `query`, returning how many were removed.
    pub fn pop_matching(&self, query: &DnsQuery) -> usize {
        let mut items = self.items.lock();
        let before = items.len();
        items.retain(|q| q != query);
        before - items.len()
    }

    pub fn contains(&self, query: &DnsQuery) -> bool {
        self.items.lock().contains(query)
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.lock().len()
    }
}
