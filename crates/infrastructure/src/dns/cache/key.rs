use gnocco_domain::name::fqdn;
use gnocco_domain::RecordType;

/// Cache key for a `(name, type)` pair: `"<fqdn>/<TYPE>"`.
///
/// ```
/// use gnocco_domain::RecordType;
/// use gnocco_infrastructure::dns::cache::make_key;
///
/// assert_eq!(make_key("Example.COM", RecordType::A), "example.com./A");
/// ```
#[inline]
pub fn make_key(name: &str, record_type: RecordType) -> String {
    let mut key = fqdn(name);
    key.push('/');
    key.push_str(record_type.as_str());
    key
}

/// Inverse of [`make_key`]. Keys with an unknown type yield `None`.
pub fn split_key(key: &str) -> Option<(&str, RecordType)> {
    let (name, rtype) = key.rsplit_once('/')?;
    let record_type = rtype.parse().ok()?;
    Some((name, record_type))
}
