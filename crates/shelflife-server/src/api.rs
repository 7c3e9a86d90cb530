//! HTTP handlers for prediction and service introspection.
//!
//! `/predict` runs the model synchronously on the request task: inference is
//! an in-memory tree walk or dot product and never waits on I/O. `/` and
//! `/health` only reflect the startup load outcome.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use shelflife_core::{PredictionResponse, ShelfLifeError};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};
use utoipa::ToSchema;

use crate::error::PredictError;
use crate::request::parse_prediction_request;
use crate::state::AppState;

/// Banner returned by `GET /`.
pub const SERVICE_MESSAGE: &str = "Ingredient Expiry Prediction API is running!";

/// Endpoints advertised by `GET /`.
pub const ADVERTISED_ENDPOINTS: [&str; 2] = ["/predict", "/health"];

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// `GET /health` body.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Always `"healthy"` while the process serves requests.
    pub status: String,
    /// Whether a model was loaded at startup.
    pub model_loaded: bool,
}

/// `GET /` body.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct IndexResponse {
    pub message: String,
    pub endpoints: Vec<String>,
    pub model_loaded: bool,
}

// ---------------------------------------------------------------------------
// Prediction
// ---------------------------------------------------------------------------

/// Run one prediction against the shared state.
///
/// The loaded check comes first, so a degraded service answers
/// "Model not loaded" whatever the body contains.
pub fn predict(state: &AppState, body: &[u8]) -> Result<PredictionResponse, PredictError> {
    let model = state.model.as_ref().ok_or(PredictError::ModelNotLoaded)?;
    let record = parse_prediction_request(body)?;
    let hours = model.predict(&record).map_err(|e| match e {
        ShelfLifeError::InvalidInput(detail) => PredictError::InvalidInput(detail),
        other => PredictError::Prediction(other.to_string()),
    })?;
    Ok(PredictionResponse::from_hours(hours))
}

/// `POST /predict`
#[utoipa::path(
    post,
    path = "/predict",
    tag = "shelflife",
    request_body(content = crate::request::PredictionRequest, content_type = "application/json"),
    responses(
        (status = 200, description = "Predicted hours until expiry and freshness", body = PredictionResponse),
        (status = 400, description = "Body missing, fields missing, or values not coercible", body = crate::error::ErrorBody),
        (status = 500, description = "Model not loaded or prediction failure", body = crate::error::ErrorBody)
    )
)]
pub async fn predict_handler(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let started = Instant::now();
    let result = predict(&state, &body);
    let elapsed = started.elapsed().as_secs_f64();

    match result {
        Ok(prediction) => {
            debug!(
                hours_until_expiry = prediction.hours_until_expiry,
                classification = %prediction.classification,
                "Prediction served"
            );
            state
                .metrics
                .record_prediction(prediction.classification, elapsed);
            (StatusCode::OK, Json(prediction)).into_response()
        }
        Err(e) => {
            match &e {
                PredictError::Prediction(_) => warn!(error = %e, "Prediction failed"),
                _ => debug!(error = %e, kind = e.kind(), "Prediction request rejected"),
            }
            state.metrics.record_error(e.kind(), elapsed);
            e.into_response()
        }
    }
}

// ---------------------------------------------------------------------------
// Introspection
// ---------------------------------------------------------------------------

/// `GET /health`
#[utoipa::path(
    get,
    path = "/health",
    tag = "shelflife",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        model_loaded: state.model_loaded(),
    })
}

/// `GET /`
#[utoipa::path(
    get,
    path = "/",
    tag = "shelflife",
    responses((status = 200, description = "Service banner", body = IndexResponse))
)]
pub async fn index_handler(State(state): State<Arc<AppState>>) -> Json<IndexResponse> {
    Json(IndexResponse {
        message: SERVICE_MESSAGE.to_string(),
        endpoints: ADVERTISED_ENDPOINTS.iter().map(|e| e.to_string()).collect(),
        model_loaded: state.model_loaded(),
    })
}
