//! Prometheus metrics for the prediction service.
//!
//! Provides a [`Metrics`] struct that holds the Prometheus collectors and a
//! handler that renders them in Prometheus exposition text format at
//! `/metrics`.

use axum::body::Body;
use axum::extract::State;
use axum::http::{Response, StatusCode};
use prometheus::{Encoder, Histogram, HistogramOpts, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};
use shelflife_core::Freshness;
use std::sync::Arc;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Metrics struct
// ---------------------------------------------------------------------------

/// Holds all Prometheus metric collectors for the service.
///
/// Constructed once at startup and shared via [`AppState`].
#[derive(Clone)]
pub struct Metrics {
    /// Private registry, so tests never see each other's counts.
    registry: Registry,

    /// Successful predictions, labelled by classification.
    pub predictions_total: IntCounterVec,

    /// Rejected or failed predictions, labelled by error kind.
    pub prediction_errors_total: IntCounterVec,

    /// Time spent handling `/predict`, successful or not.
    pub prediction_duration_seconds: Histogram,

    /// 1 when a model artifact was loaded at startup.
    pub model_loaded: IntGauge,
}

impl Metrics {
    /// Create a new `Metrics` instance with all collectors registered.
    ///
    /// # Panics
    ///
    /// Panics if any metric fails to register. This only happens on a
    /// duplicate or malformed metric definition.
    pub fn new() -> Self {
        let registry = Registry::new();

        let predictions_total = IntCounterVec::new(
            Opts::new("shelflife_predictions_total", "Total successful predictions"),
            &["classification"],
        )
        .expect("metric: predictions_total");
        registry
            .register(Box::new(predictions_total.clone()))
            .expect("register predictions_total");

        let prediction_errors_total = IntCounterVec::new(
            Opts::new(
                "shelflife_prediction_errors_total",
                "Total rejected or failed prediction requests",
            ),
            &["kind"],
        )
        .expect("metric: prediction_errors_total");
        registry
            .register(Box::new(prediction_errors_total.clone()))
            .expect("register prediction_errors_total");

        let prediction_duration_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "shelflife_prediction_duration_seconds",
                "Prediction request duration in seconds",
            )
            .buckets(vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5]),
        )
        .expect("metric: prediction_duration_seconds");
        registry
            .register(Box::new(prediction_duration_seconds.clone()))
            .expect("register prediction_duration_seconds");

        let model_loaded = IntGauge::new(
            "shelflife_model_loaded",
            "Whether a model artifact is loaded (1) or not (0)",
        )
        .expect("metric: model_loaded");
        registry
            .register(Box::new(model_loaded.clone()))
            .expect("register model_loaded");

        Self {
            registry,
            predictions_total,
            prediction_errors_total,
            prediction_duration_seconds,
            model_loaded,
        }
    }

    /// Render all registered metrics in Prometheus text exposition format.
    pub fn gather_text(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    // -- convenience helpers ------------------------------------------------

    /// Record a successful prediction.
    pub fn record_prediction(&self, classification: Freshness, duration_secs: f64) {
        self.predictions_total
            .with_label_values(&[classification.as_str()])
            .inc();
        self.prediction_duration_seconds.observe(duration_secs);
    }

    /// Record a rejected or failed prediction.
    pub fn record_error(&self, kind: &str, duration_secs: f64) {
        self.prediction_errors_total
            .with_label_values(&[kind])
            .inc();
        self.prediction_duration_seconds.observe(duration_secs);
    }

    /// Reflect the startup load outcome.
    pub fn set_model_loaded(&self, loaded: bool) {
        self.model_loaded.set(i64::from(loaded));
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// /metrics endpoint handler
// ---------------------------------------------------------------------------

/// Axum handler that returns Prometheus-format metrics.
pub async fn metrics_handler(State(state): State<Arc<AppState>>) -> Response<Body> {
    let (status, content_type, body) = match state.metrics.gather_text() {
        Ok(text) => (
            StatusCode::OK,
            "text/plain; version=0.0.4; charset=utf-8",
            text,
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "text/plain",
            format!("Failed to gather metrics: {e}"),
        ),
    };
    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    response.headers_mut().insert(
        axum::http::header::CONTENT_TYPE,
        axum::http::HeaderValue::from_static(content_type),
    );
    response
}
