//! Request and response bodies for the ingest front end.

use serde::{Deserialize, Serialize};

use crate::fetch::{Fetcher, RedirectHop};

/// Shared state for the handlers.
#[derive(Clone)]
pub struct ServerState {
    /// Fetch engine shared by all requests
    pub fetcher: Fetcher,
}

impl ServerState {
    /// Wraps `fetcher` for use as router state.
    pub fn new(fetcher: Fetcher) -> Self {
        Self { fetcher }
    }
}

/// Body of `POST /validate` and `POST /fetch`
#[derive(Debug, Deserialize)]
pub struct UrlRequest {
    /// URL to check or fetch
    pub url: String,
}

/// JSON response for `POST /validate`
#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    /// The accepted URL, exactly as submitted
    pub url: String,
}

/// JSON response for `POST /fetch`
#[derive(Debug, Serialize)]
pub struct FetchResponse {
    /// URL as submitted
    pub url: String,
    /// URL the body came from
    pub final_url: String,
    /// Redirects followed, in order
    pub redirects: Vec<RedirectHop>,
    /// Decoded body
    pub body: String,
}

/// JSON error body, `{"detail": "..."}`
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable reason
    pub detail: String,
}

/// JSON response for `GET /health`
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `"ok"`
    pub status: &'static str,
}
