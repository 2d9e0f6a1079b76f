//! HTTP front end for the fetch engine.
//!
//! Provides three endpoints:
//! - `GET /health` - liveness check
//! - `POST /validate` - checks a URL without fetching it
//! - `POST /fetch` - fetches a URL and returns its body and redirect chain
//!
//! Security rejections map to 400; resolution failures and unavailable content
//! map to 422.

mod handlers;
mod types;

use std::net::SocketAddr;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;

use crate::fetch::Fetcher;

pub use handlers::{fetch_handler, health_handler, validate_handler};
pub use types::{ErrorResponse, FetchResponse, HealthResponse, ServerState, UrlRequest, ValidateResponse};

/// Builds the router for the ingest endpoints.
pub fn router(fetcher: Fetcher) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/validate", post(validate_handler))
        .route("/fetch", post(fetch_handler))
        .with_state(ServerState::new(fetcher))
}

/// Serves the router on an already bound listener until the server fails.
pub async fn serve(listener: TcpListener, fetcher: Fetcher) -> Result<(), anyhow::Error> {
    axum::serve(listener, router(fetcher))
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}

/// Binds `addr` and serves the ingest endpoints.
pub async fn start_server(addr: SocketAddr, fetcher: Fetcher) -> Result<(), anyhow::Error> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind server to {}: {}", addr, e))?;

    log::info!("Listening on http://{}/", addr);
    log::info!("  - Health: GET http://{}/health", addr);
    log::info!("  - Validate: POST http://{}/validate", addr);
    log::info!("  - Fetch: POST http://{}/fetch", addr);

    serve(listener, fetcher).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FetchConfig;

    #[tokio::test]
    async fn test_start_server_port_in_use() {
        let taken = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = taken.local_addr().expect("local addr");

        let result = start_server(addr, Fetcher::new(FetchConfig::default())).await;
        let error = result.expect_err("second bind should fail");
        assert!(error.to_string().contains("Failed to bind server"), "{}", error);
        assert!(error.to_string().contains(&addr.to_string()));
    }
}
