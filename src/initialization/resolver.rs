//! DNS resolver initialization.

use std::sync::Arc;
use std::time::Duration;

use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::TokioAsyncResolver;

use crate::config::HICKORY_QUERY_TIMEOUT_SECS;

/// Initializes the hickory resolver used by [`crate::dns::HickoryLookup`].
///
/// Per-query timeouts are kept short and retries few, so a dead upstream
/// fails well inside the caller's overall deadline. `ndots` is zero so
/// search domains are never appended to the names being validated.
pub fn init_resolver() -> Arc<TokioAsyncResolver> {
    let mut opts = ResolverOpts::default();
    opts.timeout = Duration::from_secs(HICKORY_QUERY_TIMEOUT_SECS);
    opts.attempts = 2;
    opts.ndots = 0;
    // Answers must never outlive a single validation
    opts.cache_size = 0;

    Arc::new(TokioAsyncResolver::tokio(ResolverConfig::default(), opts))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_init_resolver_builds_without_network() {
        // Construction alone performs no queries
        let resolver = init_resolver();
        assert_eq!(Arc::strong_count(&resolver), 1);
    }
}
