//! Health endpoint

use axum::Json;

use crate::dto::HealthResponse;
use crate::VERSION;

/// Health check
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: VERSION.to_string(),
    })
}
