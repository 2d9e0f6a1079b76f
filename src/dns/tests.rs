//! DNS module tests.

use super::*;
use crate::error_handling::FetchError;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A backend whose lookups never complete.
struct HangingLookup;

impl LookupHost for HangingLookup {
    fn lookup(&self, _host: &str) -> Lookup {
        Box::pin(std::future::pending::<std::io::Result<Vec<IpAddr>>>())
    }
}

/// A backend that answers after a delay and records that it finished.
struct SlowLookup {
    delay: Duration,
    completed: Arc<AtomicUsize>,
}

impl LookupHost for SlowLookup {
    fn lookup(&self, _host: &str) -> Lookup {
        let delay = self.delay;
        let completed = Arc::clone(&self.completed);
        Box::pin(async move {
            tokio::time::sleep(delay).await;
            completed.fetch_add(1, Ordering::SeqCst);
            std::io::Result::Ok(vec![IpAddr::V4(Ipv4Addr::new(93, 184, 216, 34))])
        })
    }
}

/// A backend that counts how many lookups it served.
struct CountingLookup {
    calls: Arc<AtomicUsize>,
}

impl LookupHost for CountingLookup {
    fn lookup(&self, _host: &str) -> Lookup {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Box::pin(async { std::io::Result::Ok(vec![IpAddr::V4(Ipv4Addr::new(93, 184, 216, 34))]) })
    }
}

fn static_resolver(lookup: StaticLookup) -> BoundedResolver {
    BoundedResolver::new(Arc::new(lookup), 4, Duration::from_secs(1))
}

#[tokio::test]
async fn test_resolve_static_host() {
    let resolver = static_resolver(
        StaticLookup::new().with_host("example.com", [IpAddr::V4(Ipv4Addr::new(93, 184, 216, 34))]),
    );

    let addresses = resolver
        .resolve("example.com")
        .await
        .expect("static host should resolve");
    assert_eq!(addresses.len(), 1);
    assert_eq!(addresses[0].ip, IpAddr::V4(Ipv4Addr::new(93, 184, 216, 34)));
    assert_eq!(addresses[0].family, AddressFamily::V4);
}

#[tokio::test]
async fn test_resolve_preserves_order_and_dedups() {
    let v6 = IpAddr::V6(Ipv6Addr::new(0x2606, 0x2800, 0x220, 1, 0x248, 0x1893, 0x25c8, 0x1946));
    let v4 = IpAddr::V4(Ipv4Addr::new(93, 184, 216, 34));
    let resolver = static_resolver(StaticLookup::new().with_host("example.com", [v6, v4, v6, v4]));

    let addresses = resolver.resolve("EXAMPLE.com").await.expect("should resolve");
    let ips: Vec<IpAddr> = addresses.iter().map(|a| a.ip).collect();
    assert_eq!(ips, vec![v6, v4]);
    assert_eq!(addresses[0].family, AddressFamily::V6);
}

#[tokio::test]
async fn test_resolve_unknown_host_fails() {
    let resolver = static_resolver(StaticLookup::new());

    let result = resolver.resolve("nope.invalid").await;
    match result {
        Err(FetchError::ResolutionFailed { host, message }) => {
            assert_eq!(host, "nope.invalid");
            assert!(message.contains("no static entry"), "message: {}", message);
        }
        other => panic!("expected ResolutionFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_resolve_empty_answer_is_no_addresses() {
    let resolver = static_resolver(StaticLookup::new().with_host("empty.example.com", []));

    let result = resolver.resolve("empty.example.com").await;
    assert!(
        matches!(result, Err(FetchError::NoAddresses { ref host }) if host == "empty.example.com"),
        "expected NoAddresses, got {:?}",
        result
    );
}

#[tokio::test]
async fn test_resolve_times_out_on_hanging_backend() {
    let resolver = BoundedResolver::new(Arc::new(HangingLookup), 4, Duration::from_millis(100));

    let start = Instant::now();
    let result = resolver.resolve("slow.example.com").await;
    let elapsed = start.elapsed();

    assert!(
        matches!(result, Err(FetchError::ResolutionTimeout { .. })),
        "expected ResolutionTimeout, got {:?}",
        result
    );
    assert!(elapsed >= Duration::from_millis(100));
    assert!(
        elapsed < Duration::from_secs(1),
        "resolution should give up near its deadline, took {:?}",
        elapsed
    );
}

#[tokio::test]
async fn test_abandoned_lookup_finishes_in_background() {
    let completed = Arc::new(AtomicUsize::new(0));
    let resolver = BoundedResolver::new(
        Arc::new(SlowLookup {
            delay: Duration::from_millis(200),
            completed: Arc::clone(&completed),
        }),
        4,
        Duration::from_millis(50),
    );

    let result = resolver.resolve("slow.example.com").await;
    assert!(matches!(result, Err(FetchError::ResolutionTimeout { .. })));
    assert_eq!(completed.load(Ordering::SeqCst), 0);

    // The lookup is detached, not cancelled: it still runs to completion
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(completed.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_saturated_pool_queues_until_deadline() {
    let completed = Arc::new(AtomicUsize::new(0));
    let resolver = BoundedResolver::new(
        Arc::new(SlowLookup {
            delay: Duration::from_millis(500),
            completed: Arc::clone(&completed),
        }),
        1,
        Duration::from_millis(100),
    );

    // First lookup takes the only worker and is abandoned while still holding it
    let first = resolver.resolve("a.example.com").await;
    assert!(matches!(first, Err(FetchError::ResolutionTimeout { .. })));

    // Second lookup has to queue behind it and runs out of time waiting
    let start = Instant::now();
    let second = resolver.resolve("b.example.com").await;
    assert!(matches!(second, Err(FetchError::ResolutionTimeout { .. })));
    assert!(start.elapsed() < Duration::from_secs(1));

    // With a generous deadline the queued lookup eventually gets the worker
    let third = resolver
        .resolve_with_timeout("c.example.com", Duration::from_secs(3))
        .await;
    assert!(third.is_ok(), "expected success, got {:?}", third);
}

#[tokio::test]
async fn test_every_call_performs_a_fresh_lookup() {
    let calls = Arc::new(AtomicUsize::new(0));
    let resolver = BoundedResolver::new(
        Arc::new(CountingLookup {
            calls: Arc::clone(&calls),
        }),
        4,
        Duration::from_secs(1),
    );

    for _ in 0..3 {
        resolver.resolve("example.com").await.expect("should resolve");
    }
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_zero_workers_still_resolves() {
    let resolver = BoundedResolver::new(
        Arc::new(
            StaticLookup::new().with_host("example.com", [IpAddr::V4(Ipv4Addr::new(93, 184, 216, 34))]),
        ),
        0,
        Duration::from_secs(1),
    );
    assert!(resolver.resolve("example.com").await.is_ok());
}

#[tokio::test]
async fn test_system_lookup_localhost() {
    // localhost comes from the hosts file, so this works without network access
    let resolver = BoundedResolver::system(4, Duration::from_secs(5));
    let addresses = resolver
        .resolve("localhost")
        .await
        .expect("localhost should resolve");
    assert!(!addresses.is_empty());
    assert!(addresses.iter().all(|a| a.ip.is_loopback()));
}
