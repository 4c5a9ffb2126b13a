//! Health check handler

use axum::Json;
use std::time::{SystemTime, UNIX_EPOCH};

use super::super::types::HealthResponse;

/// Health check endpoint
///
/// Liveness only: the pinning provider and chain nodes are not probed.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service healthy", body = HealthResponse, content_type = "application/json")
    ),
    tag = "System"
)]
pub async fn health_check() -> Json<HealthResponse> {
    let timestamp_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);

    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp_ms,
        version: env!("GIT_HASH").to_string(),
    })
}
