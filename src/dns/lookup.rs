//! Name-resolution backends.
//!
//! A backend turns a hostname into the addresses it currently resolves to. It
//! knows nothing about deadlines or safety; [`crate::BoundedResolver`] adds both.

use std::collections::HashMap;
use std::future::Future;
use std::io;
use std::net::{IpAddr, SocketAddr};
use std::pin::Pin;
use std::sync::Arc;

use hickory_resolver::error::{ResolveError, ResolveErrorKind};
use hickory_resolver::proto::op::ResponseCode;
use hickory_resolver::TokioAsyncResolver;

/// Future returned by [`LookupHost::lookup`].
pub type Lookup = Pin<Box<dyn Future<Output = io::Result<Vec<IpAddr>>> + Send>>;

/// A hostname-to-address lookup primitive.
///
/// Implementations may block for as long as the underlying resolver does; the
/// returned future is driven on a detached task, so it must be `'static`.
pub trait LookupHost: Send + Sync + 'static {
    /// Looks up every address for `host`. An empty `Vec` means "no records".
    fn lookup(&self, host: &str) -> Lookup;
}

/// The operating system resolver (`getaddrinfo` via `tokio::net::lookup_host`).
///
/// `getaddrinfo` cannot be cancelled: once started, the blocking call runs to
/// completion on tokio's blocking pool even if nobody is waiting for it.
#[derive(Debug, Clone, Default)]
pub struct SystemLookup;

impl LookupHost for SystemLookup {
    fn lookup(&self, host: &str) -> Lookup {
        // Port is irrelevant, lookup_host just needs a socket address string
        let target = format!("{}:0", host);
        Box::pin(async move {
            let addrs: Vec<SocketAddr> = tokio::net::lookup_host(target).await?.collect();
            let ips: Vec<IpAddr> = addrs.into_iter().map(|addr| addr.ip()).collect();
            io::Result::Ok(ips)
        })
    }
}

/// hickory-resolver backend using the system DNS configuration.
#[derive(Clone)]
pub struct HickoryLookup {
    resolver: Arc<TokioAsyncResolver>,
}

impl HickoryLookup {
    /// Wraps an existing resolver (see [`crate::initialization::init_resolver`]).
    pub fn new(resolver: Arc<TokioAsyncResolver>) -> Self {
        Self { resolver }
    }
}

impl LookupHost for HickoryLookup {
    fn lookup(&self, host: &str) -> Lookup {
        let resolver = Arc::clone(&self.resolver);
        let host = host.to_string();
        Box::pin(async move {
            let result: io::Result<Vec<IpAddr>> = match resolver.lookup_ip(host.as_str()).await {
                Ok(response) => Ok(response.iter().collect()),
                Err(e) => map_resolve_error(e),
            };
            result
        })
    }
}

/// Maps a hickory error onto the [`LookupHost`] contract.
///
/// NODATA (the name exists, without address records) is an empty answer.
/// NXDOMAIN and everything else is a failed lookup.
pub(crate) fn map_resolve_error(error: ResolveError) -> io::Result<Vec<IpAddr>> {
    let response_code = match error.kind() {
        ResolveErrorKind::NoRecordsFound { response_code, .. } => Some(*response_code),
        _ => None,
    };
    match response_code {
        Some(ResponseCode::NoError) => Ok(Vec::new()),
        Some(ResponseCode::NXDomain) => Err(io::Error::new(io::ErrorKind::NotFound, error)),
        _ => Err(io::Error::other(error)),
    }
}

/// Fixed hostname-to-address table.
///
/// Useful for tests and for pinning hosts to known addresses. Addresses are
/// still classified by the validator; a static entry does not bypass any check.
/// Hosts missing from the table fail the way an unknown name does.
#[derive(Debug, Clone, Default)]
pub struct StaticLookup {
    entries: HashMap<String, Vec<IpAddr>>,
}

impl StaticLookup {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) the addresses for `host`.
    pub fn with_host(mut self, host: &str, addrs: impl IntoIterator<Item = IpAddr>) -> Self {
        self.entries
            .insert(host.to_ascii_lowercase(), addrs.into_iter().collect());
        self
    }
}

impl LookupHost for StaticLookup {
    fn lookup(&self, host: &str) -> Lookup {
        let result = self
            .entries
            .get(&host.to_ascii_lowercase())
            .cloned()
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("no static entry for {}", host),
                )
            });
        Box::pin(async move { result })
    }
}
