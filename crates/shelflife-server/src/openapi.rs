//! OpenAPI documentation for the prediction service.
//!
//! Collects the `#[utoipa::path]` annotations in [`crate::api`] into one
//! document served at `/api-docs/openapi.json`.

use axum::Json;
use shelflife_core::{Freshness, PredictionResponse};
use utoipa::OpenApi;

use crate::api::{HealthResponse, IndexResponse};
use crate::error::ErrorBody;
use crate::request::PredictionRequest;

/// Prediction service API documentation.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::predict_handler,
        crate::api::health_handler,
        crate::api::index_handler,
    ),
    components(schemas(
        PredictionRequest,
        PredictionResponse,
        Freshness,
        ErrorBody,
        HealthResponse,
        IndexResponse,
    )),
    tags(
        (name = "shelflife", description = "Ingredient expiry prediction API")
    )
)]
pub struct ApiDoc;

/// `GET /api-docs/openapi.json`
pub async fn openapi_handler() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
