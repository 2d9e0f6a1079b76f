//! HTTP client initialization.
//!
//! Every fetch hop gets its own client. The client is told where the host
//! lives (the address the validator just checked) so reqwest never performs a
//! lookup of its own, and it never follows redirects or goes through a proxy.

use std::net::SocketAddr;

use reqwest::redirect::Policy;
use reqwest::ClientBuilder;

use crate::config::FetchConfig;
use crate::security::ValidatedTarget;

/// Builds a client that can only reach `target.ip`.
///
/// The URL keeps its hostname, so the `Host` header and TLS SNI (and
/// certificate verification) still use the original name.
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_pinned_client(
    target: &ValidatedTarget,
    config: &FetchConfig,
) -> Result<reqwest::Client, reqwest::Error> {
    let mut builder = ClientBuilder::new()
        .redirect(Policy::none())
        .no_proxy()
        .connect_timeout(config.connect_timeout)
        .read_timeout(config.read_timeout)
        .user_agent(config.user_agent.clone());

    if target.is_domain() {
        builder = builder.resolve(&target.host, SocketAddr::new(target.ip, target.port));
    }

    builder.build()
}
