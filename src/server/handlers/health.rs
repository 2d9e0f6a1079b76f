//! Liveness handler.

use axum::Json;

use super::super::types::HealthResponse;

/// Always `{"status":"ok"}`; performs no network activity.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
