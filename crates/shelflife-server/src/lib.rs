//! Ingredient expiry prediction service: library interface.
//!
//! Exposes the router, state and handlers so that integration tests and the
//! binary build the same service.

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod openapi;
pub mod request;
pub mod shutdown;
pub mod state;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

// Re-export key types for convenience
pub use api::{health_handler, index_handler, predict, predict_handler};
pub use error::PredictError;
pub use shutdown::{shutdown_signal, ShutdownCoordinator};
pub use state::{build_app_state, AppState};

/// Build the axum [`Router`] with all routes.
///
/// `/metrics` is mounted only when metrics are enabled in the configuration.
/// Any origin may call the service; preflights are answered by the CORS layer.
pub fn build_router(state: Arc<AppState>) -> Router {
    let body_limit = usize::try_from(state.config.max_request_size_bytes).unwrap_or(usize::MAX);

    let mut router = Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/predict", post(predict_handler))
        .route("/api-docs/openapi.json", get(openapi::openapi_handler));

    if state.config.metrics.enabled {
        router = router.route("/metrics", get(metrics::metrics_handler));
    }

    router
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
