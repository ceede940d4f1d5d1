//! HTTP API handlers.

use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

/// Greeting returned by the root endpoint.
pub const GREETING: &str = "Hello from FastAPI on Minikube 🚀";

/// Status reported by both probes.
pub const STATUS_OK: &str = "ok";

/// Root greeting response.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    /// Greeting text.
    #[schema(example = "Hello from FastAPI on Minikube 🚀")]
    pub message: &'static str,
}

/// Probe response shared by readiness and liveness.
#[derive(Debug, Serialize, ToSchema)]
pub struct StatusResponse {
    /// Status: "ok".
    #[schema(example = "ok")]
    pub status: &'static str,
}

/// Root handler - returns the greeting.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Greeting", body = MessageResponse)),
    tag = "greeting"
)]
pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse { message: GREETING })
}

/// Readiness check handler - always returns 200.
#[utoipa::path(
    get,
    path = "/ready",
    responses((status = 200, description = "Ready to receive traffic", body = StatusResponse)),
    tag = "probes"
)]
pub async fn ready() -> Json<StatusResponse> {
    Json(StatusResponse { status: STATUS_OK })
}

/// Health check handler - always returns 200.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Process is alive", body = StatusResponse)),
    tag = "probes"
)]
pub async fn health() -> Json<StatusResponse> {
    Json(StatusResponse { status: STATUS_OK })
}
