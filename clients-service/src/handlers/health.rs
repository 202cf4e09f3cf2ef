use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

/// Liveness check. Answers without touching the database; connectivity is
/// proven once at startup.
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
