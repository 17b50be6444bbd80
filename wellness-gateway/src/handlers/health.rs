use crate::startup::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

/// Public status endpoint used by the web client.
pub async fn api_health() -> impl IntoResponse {
    Json(json!({ "status": "Server is running" }))
}

/// Liveness probe.
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "wellness-gateway",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Readiness probe: ready when the ML inference server answers its health
/// check.
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.prediction_client.health_check().await {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "ready" }))),
        Err(e) => {
            tracing::warn!(error = %e, "ML server not ready");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unavailable" })),
            )
        }
    }
}
