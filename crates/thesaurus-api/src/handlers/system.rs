//! Health check handler.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use tracing::warn;

use thesaurus_db::{ping, pool_metrics};

use crate::AppState;

/// Service health. Reports `degraded` with 503 when the database does not
/// answer.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    responses(
        (status = 200, description = "Service healthy"),
        (status = 503, description = "Database unavailable")
    )
)]
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let mut body = serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "labeling_kinds": state.registry.len(),
    });

    let Some(pool) = &state.pool else {
        return (StatusCode::OK, Json(body));
    };

    let metrics = pool_metrics(pool);
    match ping(pool).await {
        Ok(latency) => {
            body["database"] = serde_json::json!({
                "status": "ok",
                "latency_ms": latency.as_millis() as u64,
                "pool_size": metrics.size,
                "pool_idle": metrics.idle,
            });
            (StatusCode::OK, Json(body))
        }
        Err(e) => {
            warn!(subsystem = "api", error = %e, "Database health check failed");
            body["status"] = "degraded".into();
            body["database"] = serde_json::json!({ "status": "unavailable" });
            (StatusCode::SERVICE_UNAVAILABLE, Json(body))
        }
    }
}
