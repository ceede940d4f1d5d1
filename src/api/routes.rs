//! HTTP API route definitions.

use axum::{middleware, routing::get, Router};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use utoipa::OpenApi;

use super::handlers::{self, health, ready, root};
use crate::metrics::track_metrics;

/// OpenAPI description of the public routes.
#[derive(OpenApi)]
#[openapi(
    info(title = "minikube-probe", description = "Greeting and Kubernetes probe endpoints"),
    paths(handlers::root, handlers::ready, handlers::health),
    components(schemas(handlers::MessageResponse, handlers::StatusResponse))
)]
pub struct ApiDoc;

/// Create the API router.
///
/// Unknown paths get axum's default 404 and other methods on these paths
/// get 405.
pub fn create_router() -> Router {
    Router::new()
        .route("/", get(root))
        // Kubernetes probes
        .route("/ready", get(ready))
        .route("/health", get(health))
}

/// Create the router wrapped with request tracing and metrics.
pub fn create_app() -> Router {
    create_router()
        .layer(middleware::from_fn(track_metrics))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}
