use gnocco_application::ports::DnsResolver;
use gnocco_domain::{DnsQuery, DomainError, RecordType};
use gnocco_infrastructure::dns::cache::DnsCache;
use gnocco_infrastructure::dns::forwarding::MessageBuilder;
use gnocco_infrastructure::dns::resolver::{IterativeResolver, Resolver};
use hickory_proto::op::{Message, ResponseCode};
use hickory_proto::rr::RecordType as WireType;
use std::sync::Arc;

mod helpers;
use helpers::{cache_with_roots, server, MockExchange, ResponseBuilder, EXAMPLE_NS, ROOT_SERVER};

const EXAMPLE_NS2: &str = "203.0.113.11";

fn resolver(cache: &Arc<DnsCache>, exchange: &Arc<MockExchange>, max_steps: usize) -> IterativeResolver {
    IterativeResolver::new(cache.clone(), exchange.clone(), 53, max_steps)
}

/// Root refers `qname` to example.com, served by two glued nameservers.
fn delegate_example_com(exchange: &MockExchange, qname: &str, qtype: WireType) {
    exchange.on(
        server(ROOT_SERVER),
        qname,
        qtype,
        ResponseBuilder::new()
            .referral("example.com.", "ns1.example.com.")
            .referral("example.com.", "ns2.example.com.")
            .glue("ns1.example.com.", EXAMPLE_NS)
            .glue("ns2.example.com.", EXAMPLE_NS2)
            .build(),
    );
}

/// Script the same response on both example.com nameservers.
fn on_example_servers(exchange: &MockExchange, qname: &str, qtype: WireType, response: Message) {
    exchange.on(server(EXAMPLE_NS), qname, qtype, response.clone());
    exchange.on(server(EXAMPLE_NS2), qname, qtype, response);
}

// ============================================================================
// Delegation walk
// ============================================================================

#[tokio::test]
async fn test_resolves_through_delegation_then_serves_from_cache() {
    // Arrange
    let cache = cache_with_roots();
    let exchange = Arc::new(MockExchange::new());
    delegate_example_com(&exchange, "www.example.com.", WireType::A);
    on_example_servers(
        &exchange,
        "www.example.com.",
        WireType::A,
        ResponseBuilder::new()
            .answer_a("www.example.com.", "203.0.113.50", 300)
            .build(),
    );
    let resolver = resolver(&cache, &exchange, 64);
    let query = DnsQuery::new("www.example.com", RecordType::A);

    // Act
    let first = resolver.lookup(&query).await.unwrap();
    let second = resolver.lookup(&query).await.unwrap();

    // Assert
    assert_eq!(first.values(), vec!["203.0.113.50"]);
    assert!(!first.cache_hit);
    assert_eq!(exchange.servers_asked()[0], server(ROOT_SERVER));
    let upstream = first.upstream_server.as_deref().unwrap();
    assert!(upstream == "203.0.113.10:53" || upstream == "203.0.113.11:53");

    assert_eq!(second.values(), vec!["203.0.113.50"]);
    assert!(second.cache_hit);
    assert_eq!(exchange.calls(), 2);

    assert!(cache.get_positive("example.com.", RecordType::NS).is_some());
    assert!(cache.get_positive("ns1.example.com.", RecordType::A).is_some());
}

#[tokio::test]
async fn test_glueless_nameserver_is_resolved_first() {
    // Arrange: only ns1 comes with glue, so the referral is a namezone
    let cache = cache_with_roots();
    let exchange = Arc::new(MockExchange::new());
    exchange.on(
        server(ROOT_SERVER),
        "www.example.com.",
        WireType::A,
        ResponseBuilder::new()
            .referral("example.com.", "ns1.example.com.")
            .referral("example.com.", "ns2.example.com.")
            .glue("ns1.example.com.", EXAMPLE_NS)
            .build(),
    );
    exchange.on(
        server(EXAMPLE_NS),
        "ns2.example.com.",
        WireType::A,
        ResponseBuilder::new()
            .answer_a("ns2.example.com.", EXAMPLE_NS2, 3600)
            .build(),
    );
    on_example_servers(
        &exchange,
        "www.example.com.",
        WireType::A,
        ResponseBuilder::new()
            .answer_a("www.example.com.", "203.0.113.50", 300)
            .build(),
    );
    let resolver = resolver(&cache, &exchange, 64);

    // Act
    let resolution = resolver
        .lookup(&DnsQuery::new("www.example.com.", RecordType::A))
        .await
        .unwrap();

    // Assert
    assert_eq!(resolution.values(), vec!["203.0.113.50"]);
    assert_eq!(
        cache.get_positive("ns2.example.com.", RecordType::A).unwrap().values,
        vec![EXAMPLE_NS2.to_string()]
    );
    assert_eq!(exchange.questions()[1], ("ns2.example.com.".to_string(), WireType::A));
}

// ============================================================================
// CNAME handling
// ============================================================================

#[tokio::test]
async fn test_cname_target_is_chased_and_both_cached() {
    // Arrange
    let cache = cache_with_roots();
    let exchange = Arc::new(MockExchange::new());
    delegate_example_com(&exchange, "alias.example.com.", WireType::A);
    on_example_servers(
        &exchange,
        "alias.example.com.",
        WireType::A,
        ResponseBuilder::new()
            .answer_cname("alias.example.com.", "target.example.com.", 300)
            .build(),
    );
    on_example_servers(
        &exchange,
        "target.example.com.",
        WireType::A,
        ResponseBuilder::new()
            .answer_a("target.example.com.", "192.0.2.5", 300)
            .build(),
    );
    let resolver = resolver(&cache, &exchange, 64);

    // Act
    let resolution = resolver
        .lookup(&DnsQuery::new("alias.example.com", RecordType::A))
        .await
        .unwrap();

    // Assert
    assert_eq!(resolution.values(), vec!["192.0.2.5"]);
    assert_eq!(resolution.records[0].record_type(), RecordType::CNAME);
    assert_eq!(&*resolution.cname_chain[0], "target.example.com.");
    assert!(cache.get_positive("alias.example.com.", RecordType::CNAME).is_some());
    assert!(cache.get_positive("target.example.com.", RecordType::A).is_some());
    assert_eq!(exchange.calls(), 3);
}

#[tokio::test]
async fn test_cname_loop_terminates() {
    // Arrange
    let cache = cache_with_roots();
    cache.set("a.example.com.", RecordType::CNAME, vec!["b.example.com.".into()], 300, 0);
    cache.set("b.example.com.", RecordType::CNAME, vec!["a.example.com.".into()], 300, 0);
    let exchange = Arc::new(MockExchange::new());
    let resolver = resolver(&cache, &exchange, 64);

    // Act
    let result = resolver
        .lookup(&DnsQuery::new("a.example.com.", RecordType::A))
        .await;

    // Assert
    assert!(matches!(result, Err(DomainError::ResolutionFailed(_))));
    assert_eq!(exchange.calls(), 0);
}

// ============================================================================
// Answer scope
// ============================================================================

#[tokio::test]
async fn test_out_of_zone_answer_is_not_cached() {
    // Arrange: the example.com servers slip in a record for another zone
    let cache = cache_with_roots();
    let exchange = Arc::new(MockExchange::new());
    delegate_example_com(&exchange, "www.example.com.", WireType::A);
    on_example_servers(
        &exchange,
        "www.example.com.",
        WireType::A,
        ResponseBuilder::new()
            .answer_a("www.example.com.", "203.0.113.50", 300)
            .answer_a("www.bank.test.", "198.51.100.66", 300)
            .build(),
    );
    let resolver = resolver(&cache, &exchange, 64);

    // Act
    let resolution = resolver
        .lookup(&DnsQuery::new("www.example.com.", RecordType::A))
        .await
        .unwrap();

    // Assert
    assert_eq!(resolution.values(), vec!["203.0.113.50"]);
    assert!(cache.get_positive("www.bank.test.", RecordType::A).is_none());
}

#[tokio::test]
async fn test_out_of_zone_cname_target_is_not_taken_from_the_same_response() {
    // Arrange
    let cache = cache_with_roots();
    let exchange = Arc::new(MockExchange::new());
    delegate_example_com(&exchange, "alias.example.com.", WireType::A);
    on_example_servers(
        &exchange,
        "alias.example.com.",
        WireType::A,
        ResponseBuilder::new()
            .answer_cname("alias.example.com.", "www.bank.test.", 300)
            .answer_a("www.bank.test.", "198.51.100.66", 300)
            .build(),
    );
    let resolver = resolver(&cache, &exchange, 64);

    // Act: the chased target is unscripted at the root, so the lookup fails
    let result = resolver
        .lookup(&DnsQuery::new("alias.example.com.", RecordType::A))
        .await;

    // Assert
    assert!(matches!(result, Err(DomainError::ResolutionFailed(_))));
    assert!(cache.get_positive("alias.example.com.", RecordType::CNAME).is_some());
    assert!(cache.get_positive("www.bank.test.", RecordType::A).is_none());
    assert_eq!(exchange.questions()[2], ("www.bank.test.".to_string(), WireType::A));
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_refused_is_negatively_cached() {
    // Arrange
    let cache = cache_with_roots();
    let exchange = Arc::new(MockExchange::new());
    exchange.on(
        server(ROOT_SERVER),
        "bad.example.",
        WireType::A,
        ResponseBuilder::new().rcode(ResponseCode::Refused).build(),
    );
    let resolver = resolver(&cache, &exchange, 64);
    let query = DnsQuery::new("bad.example.", RecordType::A);

    // Act
    let first = resolver.lookup(&query).await;
    let second = resolver.lookup(&query).await;

    // Assert
    assert!(matches!(first, Err(DomainError::NegativeCached(_))));
    assert!(matches!(second, Err(DomainError::NegativeCached(_))));
    assert!(cache.is_negative("bad.example.", RecordType::A));
    assert_eq!(exchange.calls(), 1);
}

#[tokio::test]
async fn test_timeout_is_not_negatively_cached() {
    // Arrange: nothing scripted, every exchange times out
    let cache = cache_with_roots();
    let exchange = Arc::new(MockExchange::new());
    let resolver = resolver(&cache, &exchange, 64);

    // Act
    let result = resolver
        .lookup(&DnsQuery::new("www.example.com.", RecordType::A))
        .await;

    // Assert
    assert!(matches!(result, Err(DomainError::ResolutionFailed(_))));
    assert!(!cache.is_negative("www.example.com.", RecordType::A));
}

#[tokio::test]
async fn test_step_limit() {
    // Arrange
    let cache = cache_with_roots();
    let exchange = Arc::new(MockExchange::new());
    delegate_example_com(&exchange, "www.example.com.", WireType::A);
    let resolver = resolver(&cache, &exchange, 1);

    // Act
    let result = resolver
        .lookup(&DnsQuery::new("www.example.com.", RecordType::A))
        .await;

    // Assert
    assert!(matches!(result, Err(DomainError::MaxStepsExceeded(_))));
}

#[tokio::test]
async fn test_upward_referral_is_rejected() {
    // Arrange
    let cache = cache_with_roots();
    let exchange = Arc::new(MockExchange::new());
    delegate_example_com(&exchange, "www.example.com.", WireType::A);
    on_example_servers(
        &exchange,
        "www.example.com.",
        WireType::A,
        ResponseBuilder::new()
            .referral("com.", "a.gtld-servers.net.")
            .glue("a.gtld-servers.net.", "192.0.2.30")
            .glue("a.gtld-servers.net.", "2001:db8::30")
            .build(),
    );
    let resolver = resolver(&cache, &exchange, 64);

    // Act
    let result = resolver
        .lookup(&DnsQuery::new("www.example.com.", RecordType::A))
        .await;

    // Assert
    assert!(matches!(result, Err(DomainError::ResolutionFailed(_))));
    assert_eq!(exchange.calls(), 2);
}

#[tokio::test]
async fn test_missing_roots_is_fatal() {
    // Arrange
    let cache = Arc::new(DnsCache::default());
    let exchange = Arc::new(MockExchange::new());
    let resolver = resolver(&cache, &exchange, 64);

    // Act
    let result = resolver
        .lookup(&DnsQuery::new("www.example.com.", RecordType::A))
        .await;

    // Assert
    assert!(matches!(result, Err(DomainError::RootHints(_))));
}

// ============================================================================
// Message handling
// ============================================================================

#[tokio::test]
async fn test_handle_builds_reply_or_servfail() {
    // Arrange
    let cache = cache_with_roots();
    cache.set("www.example.com.", RecordType::A, vec!["203.0.113.50".into()], 300, 0);
    let exchange = Arc::new(MockExchange::new());
    let resolver = Resolver::Iterative(resolver(&cache, &exchange, 64));
    let hit = MessageBuilder::query("www.example.com.", RecordType::A, true).unwrap();
    let miss = MessageBuilder::query("nowhere.example.com.", RecordType::A, true).unwrap();

    // Act
    let answered = resolver.handle(&hit).await;
    let failed = resolver.handle(&miss).await;

    // Assert
    assert_eq!(answered.id(), hit.id());
    assert_eq!(answered.response_code(), ResponseCode::NoError);
    assert_eq!(answered.answers().len(), 1);
    assert_eq!(failed.id(), miss.id());
    assert_eq!(failed.response_code(), ResponseCode::ServFail);
}

#[tokio::test]
async fn test_resolver_enum_dispatches_lookup() {
    let cache = cache_with_roots();
    cache.set("www.example.com.", RecordType::A, vec!["203.0.113.50".into()], 300, 0);
    let exchange = Arc::new(MockExchange::new());
    let resolver: Arc<dyn DnsResolver> = Arc::new(Resolver::Iterative(resolver(&cache, &exchange, 64)));

    let resolution = resolver
        .lookup(&DnsQuery::new("www.example.com.", RecordType::A))
        .await
        .unwrap();

    assert!(resolution.cache_hit);
    assert!(resolution.upstream_server.is_none());
}
