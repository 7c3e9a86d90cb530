//! `/predict` failure modes and their HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

/// JSON error body: `{"error": "<message>"}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Human-readable description of the failure.
    pub error: String,
}

/// Every way a prediction request can fail.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PredictError {
    /// No model was loaded at startup.
    #[error("Model not loaded")]
    ModelNotLoaded,

    /// The body is empty, not JSON, or not a non-empty object.
    #[error("No data provided")]
    NoData,

    /// Required fields absent, in declared order.
    #[error("Missing fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// A field could not be coerced to its target type.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The model failed or produced an unusable value.
    #[error("Prediction error: {0}")]
    Prediction(String),
}

impl PredictError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::ModelNotLoaded | Self::Prediction(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NoData | Self::MissingFields(_) | Self::InvalidInput(_) => {
                StatusCode::BAD_REQUEST
            }
        }
    }

    /// Metric label.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ModelNotLoaded => "model_not_loaded",
            Self::NoData => "no_data",
            Self::MissingFields(_) => "missing_fields",
            Self::InvalidInput(_) => "invalid_input",
            Self::Prediction(_) => "prediction",
        }
    }
}

impl IntoResponse for PredictError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
