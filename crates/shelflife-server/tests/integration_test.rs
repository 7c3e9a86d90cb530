//! End-to-end tests: a model artifact on disk, the full router, real HTTP
//! requests through `tower::ServiceExt::oneshot`.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use shelflife_core::ServiceConfig;
use shelflife_server::{build_app_state, build_router};
use std::io::Write;
use tempfile::NamedTempFile;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// One-tree forest over the full feature schema.
///
/// Encoded layout: temperature, humidity, time_in_inventory, BEEF, CHEESE,
/// FREEZER, FRIDGE, PANTRY. Time above 20h gives -10; otherwise FRIDGE gives
/// 100 and anything else gives 10.
fn forest_artifact() -> Value {
    json!({
        "format_version": 1,
        "name": "integration-forest",
        "preprocessor": {
            "numeric": ["temperature", "humidity", "time_in_inventory"],
            "categorical": [
                {"column": "ingredient_type", "categories": ["BEEF", "CHEESE"]},
                {"column": "storage_type", "categories": ["FREEZER", "FRIDGE", "PANTRY"]}
            ]
        },
        "estimator": {
            "type": "random_forest",
            "trees": [{
                "children_left": [1, 3, -1, -1, -1],
                "children_right": [2, 4, -1, -1, -1],
                "feature": [2, 6, -2, -2, -2],
                "threshold": [20.0, 0.5, -2.0, -2.0, -2.0],
                "value": [0.0, 0.0, -10.0, 10.0, 100.0]
            }]
        }
    })
}

/// Linear model returning the temperature unchanged, for boundary checks.
fn identity_artifact() -> Value {
    json!({
        "format_version": 1,
        "preprocessor": {"numeric": ["temperature"]},
        "estimator": {"type": "linear", "intercept": 0.0, "coef": [1.0]}
    })
}

fn write_artifact(artifact: &Value) -> NamedTempFile {
    let mut f = NamedTempFile::new().unwrap();
    f.write_all(artifact.to_string().as_bytes()).unwrap();
    f
}

fn app_for(model_path: &str) -> Router {
    let config = ServiceConfig {
        model_path: model_path.to_string(),
        ..ServiceConfig::default()
    };
    build_router(build_app_state(config))
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, req).await
}

async fn post_predict(app: &Router, body: impl Into<Body>) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("POST")
        .uri("/predict")
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap();
    send(app, req).await
}

fn cheese(storage: &str, time: f64) -> String {
    json!({
        "temperature": 4,
        "humidity": 65,
        "time_in_refrigerator": time,
        "ingredient_type": "CHEESE",
        "storage_type": storage
    })
    .to_string()
}

// ---------------------------------------------------------------------------
// Prediction
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_cheese_in_fridge_end_to_end() {
    let artifact = write_artifact(&forest_artifact());
    let app = app_for(artifact.path().to_str().unwrap());

    let (status, body) = post_predict(&app, cheese("fridge", 10.0)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["hours_until_expiry"], 100.0);
    assert_eq!(body["classification"], "Fresh");
}

#[tokio::test]
async fn test_forest_outputs_map_to_classes() {
    let artifact = write_artifact(&forest_artifact());
    let app = app_for(artifact.path().to_str().unwrap());

    let (_, pantry) = post_predict(&app, cheese("pantry", 10.0)).await;
    assert_eq!(pantry["hours_until_expiry"], 10.0);
    assert_eq!(pantry["classification"], "Stale");

    let (_, old) = post_predict(&app, cheese("fridge", 30.0)).await;
    assert_eq!(old["hours_until_expiry"], -10.0);
    assert_eq!(old["classification"], "Expired");
}

#[tokio::test]
async fn test_storage_type_is_case_insensitive() {
    let artifact = write_artifact(&forest_artifact());
    let app = app_for(artifact.path().to_str().unwrap());

    let (_, lower) = post_predict(&app, cheese("fridge", 10.0)).await;
    let (_, upper) = post_predict(&app, cheese("FRIDGE", 10.0)).await;
    let (_, mixed) = post_predict(&app, cheese("Fridge", 10.0)).await;
    assert_eq!(lower, upper);
    assert_eq!(lower, mixed);
}

#[tokio::test]
async fn test_unknown_category_still_predicts() {
    let artifact = write_artifact(&forest_artifact());
    let app = app_for(artifact.path().to_str().unwrap());

    let body = json!({
        "temperature": 4,
        "humidity": 65,
        "time_in_refrigerator": 10,
        "ingredient_type": "DRAGONFRUIT",
        "storage_type": "cellar"
    });
    let (status, resp) = post_predict(&app, body.to_string()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["hours_until_expiry"], 10.0);
}

#[tokio::test]
async fn test_classification_boundaries() {
    let artifact = write_artifact(&identity_artifact());
    let app = app_for(artifact.path().to_str().unwrap());

    for (temperature, expected) in [
        (48.0, "Fresh"),
        (24.5, "Fresh"),
        (24.0, "Stale"),
        (0.5, "Stale"),
        (0.0, "Expired"),
        (-3.0, "Expired"),
    ] {
        let body = json!({
            "temperature": temperature,
            "humidity": 50,
            "time_in_refrigerator": 1,
            "ingredient_type": "BEEF",
            "storage_type": "freezer"
        });
        let (status, resp) = post_predict(&app, body.to_string()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(resp["hours_until_expiry"], temperature);
        assert_eq!(resp["classification"], expected, "{temperature}");
    }
}

#[tokio::test]
async fn test_numeric_strings_are_coerced() {
    let artifact = write_artifact(&identity_artifact());
    let app = app_for(artifact.path().to_str().unwrap());

    let body = json!({
        "temperature": "30",
        "humidity": "65.5",
        "time_in_refrigerator": 2,
        "ingredient_type": "BEEF",
        "storage_type": "freezer"
    });
    let (status, resp) = post_predict(&app, body.to_string()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["hours_until_expiry"], 30.0);
}

// ---------------------------------------------------------------------------
// Input errors
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_missing_fields_listed_in_order() {
    let artifact = write_artifact(&forest_artifact());
    let app = app_for(artifact.path().to_str().unwrap());

    let body = json!({
        "temperature": 4,
        "time_in_refrigerator": 10,
        "ingredient_type": "CHEESE"
    });
    let (status, resp) = post_predict(&app, body.to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp["error"], "Missing fields: humidity, storage_type");
}

#[tokio::test]
async fn test_non_numeric_temperature_is_invalid_input() {
    let artifact = write_artifact(&forest_artifact());
    let app = app_for(artifact.path().to_str().unwrap());

    let body = json!({
        "temperature": "abc",
        "humidity": 65,
        "time_in_refrigerator": 10,
        "ingredient_type": "CHEESE",
        "storage_type": "fridge"
    });
    let (status, resp) = post_predict(&app, body.to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = resp["error"].as_str().unwrap();
    assert!(message.starts_with("Invalid input: "), "{message}");
}

#[tokio::test]
async fn test_non_finite_values_are_invalid_for_every_estimator() {
    for artifact in [forest_artifact(), identity_artifact()] {
        let file = write_artifact(&artifact);
        let app = app_for(file.path().to_str().unwrap());

        for raw in ["inf", "-inf", "nan"] {
            let body = json!({
                "temperature": raw,
                "humidity": 65,
                "time_in_refrigerator": 10,
                "ingredient_type": "CHEESE",
                "storage_type": "fridge"
            });
            let (status, resp) = post_predict(&app, body.to_string()).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{raw}");
            let message = resp["error"].as_str().unwrap();
            assert!(message.starts_with("Invalid input: "), "{message}");
        }
    }
}

#[tokio::test]
async fn test_empty_bodies_are_no_data() {
    let artifact = write_artifact(&forest_artifact());
    let app = app_for(artifact.path().to_str().unwrap());

    for body in ["", "{}", "not json", "[1, 2]"] {
        let (status, resp) = post_predict(&app, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body:?}");
        assert_eq!(resp["error"], "No data provided", "{body:?}");
    }
}

// ---------------------------------------------------------------------------
// Degraded mode
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_missing_artifact_runs_degraded() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.json");
    let app = app_for(missing.to_str().unwrap());

    let (status, health) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["model_loaded"], false);

    let (status, resp) = post_predict(&app, cheese("fridge", 10.0)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(resp["error"], "Model not loaded");

    let (status, resp) = post_predict(&app, "").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(resp["error"], "Model not loaded");
}

#[tokio::test]
async fn test_corrupt_artifact_runs_degraded() {
    let mut f = NamedTempFile::new().unwrap();
    f.write_all(b"\x80\x04\x95 not a model").unwrap();
    let app = app_for(f.path().to_str().unwrap());

    let (_, health) = get(&app, "/health").await;
    assert_eq!(health["model_loaded"], false);
    let (status, _) = post_predict(&app, cheese("fridge", 10.0)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

// ---------------------------------------------------------------------------
// Introspection
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_index_and_health_are_stable() {
    let artifact = write_artifact(&forest_artifact());
    let app = app_for(artifact.path().to_str().unwrap());

    let (status, first_index) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        first_index["message"],
        "Ingredient Expiry Prediction API is running!"
    );
    assert_eq!(first_index["endpoints"], json!(["/predict", "/health"]));
    assert_eq!(first_index["model_loaded"], true);

    let (_, first_health) = get(&app, "/health").await;
    post_predict(&app, cheese("fridge", 10.0)).await;
    post_predict(&app, "").await;

    let (_, second_index) = get(&app, "/").await;
    let (_, second_health) = get(&app, "/health").await;
    assert_eq!(first_index, second_index);
    assert_eq!(first_health, second_health);
}

#[tokio::test]
async fn test_metrics_count_predictions() {
    let artifact = write_artifact(&forest_artifact());
    let app = app_for(artifact.path().to_str().unwrap());

    post_predict(&app, cheese("fridge", 10.0)).await;
    post_predict(&app, "{}").await;

    let req = Request::builder().uri("/metrics").body(Body::empty()).unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("shelflife_predictions_total{classification=\"Fresh\"} 1"));
    assert!(text.contains("shelflife_prediction_errors_total{kind=\"no_data\"} 1"));
    assert!(text.contains("shelflife_model_loaded 1"));
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_for(dir.path().join("absent.json").to_str().unwrap());

    let (status, doc) = get(&app, "/api-docs/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/predict"]["post"].is_object());
}

#[tokio::test]
async fn test_cors_header_on_responses() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_for(dir.path().join("absent.json").to_str().unwrap());

    let req = Request::builder()
        .uri("/health")
        .header("origin", "http://localhost:8081")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.headers()["access-control-allow-origin"], "*");

    let preflight = Request::builder()
        .method("OPTIONS")
        .uri("/predict")
        .header("origin", "http://localhost:8081")
        .header("access-control-request-method", "POST")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(preflight).await.unwrap();
    assert!(response.status().is_success());
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
}
