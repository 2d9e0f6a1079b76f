//! Deadline-bounded hostname resolution.
//!
//! `getaddrinfo` offers no timeout, so the deadline is enforced on the waiting
//! side: each lookup runs on a detached task that holds a permit from a small
//! worker pool, and the caller stops waiting when the deadline passes. A lookup
//! abandoned this way keeps its permit until the backend returns, then its
//! result is dropped.

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use tokio::sync::Semaphore;

use super::lookup::{HickoryLookup, LookupHost, SystemLookup};
use crate::config::{FetchConfig, ResolverBackend};
use crate::error_handling::FetchError;
use crate::initialization::init_resolver;

/// Address family of a [`ResolvedAddress`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressFamily {
    /// IPv4
    V4,
    /// IPv6
    V6,
}

/// One address a hostname resolved to. Never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResolvedAddress {
    /// The address
    pub ip: IpAddr,
    /// Its family
    pub family: AddressFamily,
}

impl From<IpAddr> for ResolvedAddress {
    fn from(ip: IpAddr) -> Self {
        let family = match ip {
            IpAddr::V4(_) => AddressFamily::V4,
            IpAddr::V6(_) => AddressFamily::V6,
        };
        Self { ip, family }
    }
}

/// Resolver service shared by validators and fetchers.
///
/// Owns the worker pool: at most `workers` lookups run at once, the rest queue.
/// Cloning is cheap and shares the pool.
#[derive(Clone)]
pub struct BoundedResolver {
    lookup: Arc<dyn LookupHost>,
    workers: Arc<Semaphore>,
    timeout: Duration,
}

impl std::fmt::Debug for BoundedResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundedResolver")
            .field("available_workers", &self.workers.available_permits())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl BoundedResolver {
    /// Creates a resolver over `lookup` with `workers` concurrent lookups and a
    /// default per-hostname deadline of `timeout`.
    ///
    /// A pool size of zero is treated as one.
    pub fn new(lookup: Arc<dyn LookupHost>, workers: usize, timeout: Duration) -> Self {
        Self {
            lookup,
            workers: Arc::new(Semaphore::new(workers.max(1))),
            timeout,
        }
    }

    /// Creates a resolver over the operating system resolver.
    pub fn system(workers: usize, timeout: Duration) -> Self {
        Self::new(Arc::new(SystemLookup), workers, timeout)
    }

    /// Creates a resolver for the backend, pool size, and deadline in `config`.
    pub fn from_config(config: &FetchConfig) -> Self {
        let lookup: Arc<dyn LookupHost> = match config.resolver {
            ResolverBackend::System => Arc::new(SystemLookup),
            ResolverBackend::Hickory => Arc::new(HickoryLookup::new(init_resolver())),
        };
        Self::new(lookup, config.dns_workers, config.dns_timeout)
    }

    /// The default deadline applied by [`resolve`](Self::resolve).
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Resolves `host` within the default deadline.
    pub async fn resolve(&self, host: &str) -> Result<Vec<ResolvedAddress>, FetchError> {
        self.resolve_with_timeout(host, self.timeout).await
    }

    /// Resolves `host`, returning within `timeout` whether or not the backend does.
    ///
    /// # Errors
    ///
    /// - `ResolutionTimeout` if the deadline passes first (queue time included)
    /// - `ResolutionFailed` if the backend reports an error
    /// - `NoAddresses` if the backend answers with an empty set
    pub async fn resolve_with_timeout(
        &self,
        host: &str,
        timeout: Duration,
    ) -> Result<Vec<ResolvedAddress>, FetchError> {
        let lookup = Arc::clone(&self.lookup);
        let workers = Arc::clone(&self.workers);
        let name = host.to_string();

        // Dropping the JoinHandle on timeout detaches the task instead of killing it
        let task = tokio::spawn(async move {
            let _permit = workers
                .acquire_owned()
                .await
                .map_err(std::io::Error::other)?;
            lookup.lookup(&name).await
        });

        let ips = match tokio::time::timeout(timeout, task).await {
            Err(_) => {
                warn!(
                    "DNS resolution for {} exceeded {}ms, abandoning lookup",
                    host,
                    timeout.as_millis()
                );
                return Err(FetchError::ResolutionTimeout {
                    host: host.to_string(),
                    timeout,
                });
            }
            Ok(Err(join_error)) => {
                return Err(FetchError::ResolutionFailed {
                    host: host.to_string(),
                    message: join_error.to_string(),
                });
            }
            Ok(Ok(Err(e))) => {
                debug!("DNS resolution failed for {}: {}", host, e);
                return Err(FetchError::ResolutionFailed {
                    host: host.to_string(),
                    message: e.to_string(),
                });
            }
            Ok(Ok(Ok(ips))) => ips,
        };

        let mut addresses: Vec<ResolvedAddress> = Vec::with_capacity(ips.len());
        for ip in ips {
            let address = ResolvedAddress::from(ip);
            if !addresses.contains(&address) {
                addresses.push(address);
            }
        }

        if addresses.is_empty() {
            return Err(FetchError::NoAddresses {
                host: host.to_string(),
            });
        }

        debug!("Resolved {} to {:?}", host, addresses);
        Ok(addresses)
    }
}
