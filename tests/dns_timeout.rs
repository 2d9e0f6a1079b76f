//! Tests for resolver deadlines through the public API.
//!
//! A backend that never answers must not hold up validation or fetching past
//! the configured deadline, and must not be mistaken for a security rejection.

use std::net::IpAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use safe_fetch::dns::Lookup;
use safe_fetch::{
    BoundedResolver, ErrorKind, FetchConfig, FetchError, Fetcher, LookupHost, UrlValidator,
};

/// Simulates a resolver that is blackholed upstream.
struct BlackholeLookup;

impl LookupHost for BlackholeLookup {
    fn lookup(&self, _host: &str) -> Lookup {
        Box::pin(std::future::pending::<std::io::Result<Vec<IpAddr>>>())
    }
}

fn blackhole_resolver(timeout: Duration) -> Arc<BoundedResolver> {
    Arc::new(BoundedResolver::new(Arc::new(BlackholeLookup), 4, timeout))
}

#[tokio::test]
async fn test_validate_gives_up_at_deadline() {
    let validator = UrlValidator::new(blackhole_resolver(Duration::from_millis(200)));

    let start = Instant::now();
    let result = validator.validate("https://slow.example.com/").await;
    let elapsed = start.elapsed();

    let error = result.expect_err("blackholed lookup should time out");
    assert!(matches!(error, FetchError::ResolutionTimeout { .. }), "{:?}", error);
    assert_eq!(error.kind(), ErrorKind::TransientFailure);
    assert!(
        elapsed < Duration::from_secs(2),
        "validation took {:?}, deadline was 200ms",
        elapsed
    );
}

#[tokio::test]
async fn test_fetch_gives_up_at_deadline() {
    let fetcher = Fetcher::with_resolver(
        FetchConfig::default(),
        blackhole_resolver(Duration::from_millis(200)),
    );

    let start = Instant::now();
    let result = fetcher.fetch("https://slow.example.com/article").await;

    assert!(
        matches!(result, Err(FetchError::ResolutionTimeout { ref host, .. }) if host == "slow.example.com"),
        "{:?}",
        result
    );
    assert!(start.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn test_concurrent_timeouts_do_not_stack() {
    // More hung lookups than workers: queued lookups count their wait against
    // their own deadline, so every call still returns close to 200ms
    let resolver = blackhole_resolver(Duration::from_millis(200));

    let start = Instant::now();
    let mut handles = Vec::new();
    for i in 0..8 {
        let resolver = Arc::clone(&resolver);
        handles.push(tokio::spawn(async move {
            resolver.resolve(&format!("host{}.example.com", i)).await
        }));
    }
    for handle in handles {
        let result = handle.await.expect("task should not panic");
        assert!(matches!(result, Err(FetchError::ResolutionTimeout { .. })));
    }
    assert!(start.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn test_ip_literals_never_touch_the_resolver() {
    // Literal hosts are classified directly, so a dead resolver is irrelevant
    let validator = UrlValidator::new(blackhole_resolver(Duration::from_secs(30)));

    let start = Instant::now();
    let safe = validator
        .validate("http://93.184.216.34/")
        .await
        .expect("public literal should validate");
    assert_eq!(safe.as_str(), "http://93.184.216.34/");

    let rejected = validator.validate("http://[fe80::1]/").await;
    assert!(matches!(rejected, Err(FetchError::UnsafeAddress { .. })));
    assert!(start.elapsed() < Duration::from_secs(1));
}
