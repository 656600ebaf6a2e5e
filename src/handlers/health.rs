use crate::{errors::ServiceError, AppState};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use utoipa::ToSchema;

/// Tracks application start time for uptime calculation
static START_TIME: std::sync::OnceLock<Instant> = std::sync::OnceLock::new();

/// Initialize the start time (call this on application startup)
pub fn init_start_time() {
    let _ = START_TIME.get_or_init(Instant::now);
}

fn uptime_secs() -> u64 {
    START_TIME.get().map(|t| t.elapsed().as_secs()).unwrap_or(0)
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LivenessResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReadinessResponse {
    /// "ready" or "not_ready"
    pub status: String,
    /// "memory" or "database"
    pub storage: String,
    pub latency_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(liveness_check))
        .route("/ready", get(readiness_check))
}

/// Liveness probe; answers as long as the process serves requests
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = LivenessResponse)),
    tag = "health"
)]
pub async fn liveness_check() -> impl IntoResponse {
    Json(LivenessResponse {
        status: "up".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: uptime_secs(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// Readiness probe; 503 while the storage backend cannot be reached
#[utoipa::path(
    get,
    path = "/health/ready",
    responses(
        (status = 200, description = "Storage reachable", body = ReadinessResponse),
        (status = 503, description = "Storage unreachable", body = ReadinessResponse),
    ),
    tag = "health"
)]
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    let started = Instant::now();
    let result = state.storage.ping().await;
    let latency_ms = started.elapsed().as_millis() as u64;
    let storage = state.config.storage_backend.to_string();

    match result {
        Ok(()) => (
            StatusCode::OK,
            Json(ReadinessResponse {
                status: "ready".to_string(),
                storage,
                latency_ms,
                error: None,
            }),
        ),
        Err(err) => {
            tracing::warn!(error = %err, "Readiness check failed");
            let unavailable = ServiceError::ServiceUnavailable(format!(
                "{storage} storage: {}",
                err.response_message()
            ));
            (
                unavailable.status_code(),
                Json(ReadinessResponse {
                    status: "not_ready".to_string(),
                    storage,
                    latency_ms,
                    error: Some(unavailable.response_message()),
                }),
            )
        }
    }
}
