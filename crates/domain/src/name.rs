//! Helpers for textual domain names.
//!
//! Everything stored by the resolver uses the fully-qualified, lower-cased
//! form produced by [`fqdn`], so comparisons are plain string equality.

/// Normalize a domain name: lower-cased, exactly one trailing dot.
/// The empty string and `"."` both map to the root.
pub fn fqdn(name: &str) -> String {
    let trimmed = name.trim().trim_end_matches('.');
    if trimmed.is_empty() {
        return ".".to_string();
    }
    let mut out = trimmed.to_ascii_lowercase();
    out.push('.');
    out
}

/// Strip the leftmost label of an FQDN. Returns `None` for the root.
///
/// ```
/// use gnocco_domain::name::parent;
///
/// assert_eq!(parent("www.example.com."), Some("example.com."));
/// assert_eq!(parent("com."), Some("."));
/// assert_eq!(parent("."), None);
/// ```
pub fn parent(name: &str) -> Option<&str> {
    if name == "." || name.is_empty() {
        return None;
    }
    match name.find('.') {
        Some(idx) if idx + 1 < name.len() => Some(&name[idx + 1..]),
        _ => Some("."),
    }
}

/// Walk from `name` up to the root, most specific first.
pub fn ancestors(name: &str) -> impl Iterator<Item = &str> {
    std::iter::successors(Some(name), |n| parent(n))
}

/// True when `child` equals `zone` or lies below it. Both must be FQDNs.
pub fn is_subdomain(child: &str, zone: &str) -> bool {
    if zone == "." {
        return true;
    }
    child == zone || child.ends_with(&format!(".{}", zone))
}
