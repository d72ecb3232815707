use axum::http::StatusCode;
use axum::response::IntoResponse;

/// GET /health
///
/// Liveness probe; returns 200 as long as the process is serving.
pub async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}
