//! Sending one pinned request.

use reqwest::header::{HeaderValue, ACCEPT};

use crate::config::FetchConfig;
use crate::initialization::init_pinned_client;
use crate::security::ValidatedTarget;

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Sends a `GET` for `target.url` over a fresh client pinned to `target.ip`.
///
/// Nothing is retried. Any error here (client build, connect, TLS, timeout)
/// is a transport failure for the caller to report.
pub(crate) async fn send_pinned(
    target: &ValidatedTarget,
    config: &FetchConfig,
) -> Result<reqwest::Response, reqwest::Error> {
    let client = init_pinned_client(target, config)?;
    client
        .get(target.url.clone())
        .header(ACCEPT, HeaderValue::from_static(ACCEPT_HTML))
        .send()
        .await
}
