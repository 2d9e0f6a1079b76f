//! URL validation and fetch handlers.
//!
//! Rejections are logged at `warn` so probing stands out from dead links,
//! which are logged at `info`.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::{info, warn};

use super::super::types::{ErrorResponse, FetchResponse, ServerState, UrlRequest, ValidateResponse};
use crate::error_handling::{ErrorKind, FetchError};
use crate::fetch::FetchOutcome;

pub(crate) const UNSAFE_ADDRESS_DETAIL: &str = "URL points to a private or reserved address";
pub(crate) const FETCH_FAILED_DETAIL: &str = "Failed to fetch content from URL";
pub(crate) const RESOLUTION_FAILED_DETAIL: &str = "Failed to resolve URL host";

fn error_response(status: StatusCode, detail: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            detail: detail.into(),
        }),
    )
        .into_response()
}

/// Maps a rejection to 400. Transient failures get `transient_detail` and 422.
fn fetch_error_response(route: &str, url: &str, error: &FetchError, transient_detail: &str) -> Response {
    match error.kind() {
        ErrorKind::SecurityRejection => {
            warn!("{} rejected {}: {}", route, url, error);
            let detail = match error {
                FetchError::UnsafeAddress { .. } => UNSAFE_ADDRESS_DETAIL.to_string(),
                other => other.to_string(),
            };
            error_response(StatusCode::BAD_REQUEST, detail)
        }
        ErrorKind::TransientFailure => {
            info!("{} could not resolve {}: {}", route, url, error);
            error_response(StatusCode::UNPROCESSABLE_ENTITY, transient_detail)
        }
    }
}

/// `POST /validate`: checks a URL without fetching it.
pub async fn validate_handler(
    State(state): State<ServerState>,
    Json(request): Json<UrlRequest>,
) -> Response {
    match state.fetcher.validate(&request.url).await {
        Ok(safe) => (
            StatusCode::OK,
            Json(ValidateResponse {
                url: safe.into_string(),
            }),
        )
            .into_response(),
        Err(e) => fetch_error_response("validate", &request.url, &e, RESOLUTION_FAILED_DETAIL),
    }
}

/// `POST /fetch`: fetches a URL and returns its body and redirect chain.
pub async fn fetch_handler(
    State(state): State<ServerState>,
    Json(request): Json<UrlRequest>,
) -> Response {
    match state.fetcher.fetch(&request.url).await {
        Ok(FetchOutcome::Fetched(page)) => (
            StatusCode::OK,
            Json(FetchResponse {
                url: request.url,
                final_url: page.final_url,
                redirects: page.redirects,
                body: page.body,
            }),
        )
            .into_response(),
        Ok(FetchOutcome::Unavailable(reason)) => {
            info!("fetch of {} unavailable: {}", request.url, reason);
            error_response(StatusCode::UNPROCESSABLE_ENTITY, FETCH_FAILED_DETAIL)
        }
        Err(e) => fetch_error_response("fetch", &request.url, &e, FETCH_FAILED_DETAIL),
    }
}
