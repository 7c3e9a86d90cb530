//! Shared application state.
//!
//! Built once before the listener binds and never mutated afterwards, so
//! handlers read the model and the loaded flag without locking.

use shelflife_core::{ExpiryModel, ServiceConfig};
use shelflife_model::load_model;
use std::path::Path;
use std::sync::Arc;

use crate::metrics::Metrics;

/// Shared state threaded through axum handlers via `State`.
pub struct AppState {
    /// Service configuration.
    pub config: ServiceConfig,
    /// The loaded model, or `None` when the service runs degraded.
    pub model: Option<Arc<dyn ExpiryModel>>,
    /// Prometheus collectors.
    pub metrics: Metrics,
}

impl AppState {
    /// Assemble state around an already-resolved model.
    pub fn new(config: ServiceConfig, model: Option<Arc<dyn ExpiryModel>>) -> Self {
        let metrics = Metrics::new();
        metrics.set_model_loaded(model.is_some());
        Self {
            config,
            model,
            metrics,
        }
    }

    /// Whether a model was loaded at startup.
    pub fn model_loaded(&self) -> bool {
        self.model.is_some()
    }
}

/// Load the configured model artifact and build the shared [`AppState`].
///
/// A missing or invalid artifact is not an error: the state is built without
/// a model and `/predict` answers "Model not loaded".
pub fn build_app_state(config: ServiceConfig) -> Arc<AppState> {
    let model = load_model(Path::new(&config.model_path)).into_model();
    Arc::new(AppState::new(config, model))
}
