//! Core types, traits, and errors for shelflife
//!
//! This crate contains the foundational types shared by the model and server
//! crates: the fixed-schema feature record handed to a model, the freshness
//! classification rule, the [`ExpiryModel`] inference trait, service
//! configuration, and the error enum.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ---------------------------------------------------------------------------
// Feature schema
// ---------------------------------------------------------------------------

/// Request fields required by `/predict`, in declared order.
///
/// Missing-field errors list names in this order regardless of the order the
/// client sent them.
pub const REQUIRED_FIELDS: [&str; 5] = [
    "temperature",
    "humidity",
    "time_in_refrigerator",
    "ingredient_type",
    "storage_type",
];

/// Numeric columns of a [`FeatureRecord`], as named in model artifacts.
pub const NUMERIC_COLUMNS: [&str; 3] = ["temperature", "humidity", "time_in_inventory"];

/// Categorical columns of a [`FeatureRecord`], as named in model artifacts.
pub const CATEGORICAL_COLUMNS: [&str; 2] = ["ingredient_type", "storage_type"];

/// Single-row input handed to an [`ExpiryModel`].
///
/// `time_in_inventory` carries the request's `time_in_refrigerator` value and
/// `storage_type` is always uppercase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    /// Storage temperature in °C.
    pub temperature: f64,
    /// Relative humidity in percent.
    pub humidity: f64,
    /// Hours the ingredient has been stored.
    pub time_in_inventory: f64,
    /// Food category (e.g. `"BEEF"`, `"CHEESE"`).
    pub ingredient_type: String,
    /// Storage location (`"FRIDGE"`, `"FREEZER"`, `"PANTRY"`).
    pub storage_type: String,
}

impl FeatureRecord {
    /// Build a record, uppercasing `storage_type`.
    pub fn new(
        temperature: f64,
        humidity: f64,
        time_in_inventory: f64,
        ingredient_type: impl Into<String>,
        storage_type: &str,
    ) -> Self {
        Self {
            temperature,
            humidity,
            time_in_inventory,
            ingredient_type: ingredient_type.into(),
            storage_type: storage_type.to_uppercase(),
        }
    }

    /// Look up a numeric column by its artifact name.
    pub fn numeric(&self, column: &str) -> Option<f64> {
        match column {
            "temperature" => Some(self.temperature),
            "humidity" => Some(self.humidity),
            "time_in_inventory" => Some(self.time_in_inventory),
            _ => None,
        }
    }

    /// Look up a categorical column by its artifact name.
    pub fn categorical(&self, column: &str) -> Option<&str> {
        match column {
            "ingredient_type" => Some(&self.ingredient_type),
            "storage_type" => Some(&self.storage_type),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Predictions at or below this many hours are [`Freshness::Stale`] (when positive).
pub const STALE_THRESHOLD_HOURS: f64 = 24.0;

/// Predictions at or below this many hours are [`Freshness::Expired`].
pub const EXPIRED_THRESHOLD_HOURS: f64 = 0.0;

/// Coarse freshness label derived from predicted hours until expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Freshness {
    /// More than 24 hours left.
    Fresh,
    /// Between zero (exclusive) and 24 hours (inclusive) left.
    Stale,
    /// No time left.
    Expired,
}

impl Freshness {
    /// Classify a predicted number of hours until expiry.
    ///
    /// `hours <= 0` is `Expired`, `0 < hours <= 24` is `Stale`, anything
    /// larger is `Fresh`.
    #[must_use]
    pub fn from_hours(hours: f64) -> Self {
        if hours <= EXPIRED_THRESHOLD_HOURS {
            Self::Expired
        } else if hours <= STALE_THRESHOLD_HOURS {
            Self::Stale
        } else {
            Self::Fresh
        }
    }

    /// Label as it appears in responses.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fresh => "Fresh",
            Self::Stale => "Stale",
            Self::Expired => "Expired",
        }
    }
}

impl std::fmt::Display for Freshness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Freshness {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Fresh" => Ok(Self::Fresh),
            "Stale" => Ok(Self::Stale),
            "Expired" => Ok(Self::Expired),
            _ => Err(format!("unknown classification: {s}")),
        }
    }
}

/// Successful `/predict` response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PredictionResponse {
    /// Predicted hours until expiry (may be negative).
    pub hours_until_expiry: f64,
    /// Freshness label derived from `hours_until_expiry`.
    pub classification: Freshness,
}

impl PredictionResponse {
    /// Build a response from a raw prediction, applying [`Freshness::from_hours`].
    pub fn from_hours(hours_until_expiry: f64) -> Self {
        Self {
            hours_until_expiry,
            classification: Freshness::from_hours(hours_until_expiry),
        }
    }
}

// ---------------------------------------------------------------------------
// Model interface
// ---------------------------------------------------------------------------

/// A loaded prediction model.
///
/// Implementations are immutable after construction and shared across request
/// handlers behind an `Arc`.
pub trait ExpiryModel: Send + Sync {
    /// Human-readable model name (for logs and introspection).
    fn name(&self) -> &str;

    /// Predict hours until expiry for one record.
    fn predict(&self, record: &FeatureRecord) -> Result<f64>;
}

// ---------------------------------------------------------------------------
// Configuration types
// ---------------------------------------------------------------------------

/// Configuration for the prediction service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Address and port to bind the HTTP server to.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    /// Filesystem path of the model artifact.
    #[serde(default = "default_model_path")]
    pub model_path: String,
    /// Maximum request body size in bytes.
    #[serde(default = "default_max_request_size_bytes")]
    pub max_request_size_bytes: u64,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Metrics endpoint configuration.
    #[serde(default)]
    pub metrics: MetricsConfig,
    /// Graceful shutdown configuration.
    #[serde(default)]
    pub shutdown: ShutdownConfig,
}

fn default_listen_addr() -> String {
    "0.0.0.0:5000".to_string()
}

fn default_model_path() -> String {
    "expiry_predictor_model.json".to_string()
}

fn default_max_request_size_bytes() -> u64 {
    1024 * 1024
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            model_path: default_model_path(),
            max_request_size_bytes: default_max_request_size_bytes(),
            logging: LoggingConfig::default(),
            metrics: MetricsConfig::default(),
            shutdown: ShutdownConfig::default(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: `trace`, `debug`, `info`, `warn`, or `error`.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Output format: `text` (human-readable) or `json` (structured).
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Prometheus metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Serve `/metrics`.
    #[serde(default = "default_metrics_enabled")]
    pub enabled: bool,
}

fn default_metrics_enabled() -> bool {
    true
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_metrics_enabled(),
        }
    }
}

/// Graceful shutdown configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShutdownConfig {
    /// Seconds to wait for in-flight requests after a shutdown signal.
    #[serde(default = "default_shutdown_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_shutdown_timeout_seconds() -> u64 {
    30
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_shutdown_timeout_seconds(),
        }
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Core error types.
#[derive(thiserror::Error, Debug)]
pub enum ShelfLifeError {
    /// The model artifact is structurally invalid.
    #[error("Invalid model artifact: {0}")]
    Artifact(String),

    /// A model failed while computing a prediction.
    #[error("{0}")]
    Prediction(String),

    /// A feature value the model cannot accept (NaN or infinity).
    #[error("{0}")]
    InvalidInput(String),

    /// Serialization / deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for `std::result::Result<T, ShelfLifeError>`.
pub type Result<T> = std::result::Result<T, ShelfLifeError>;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
