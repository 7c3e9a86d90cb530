//! Validation and coercion of `/predict` request bodies.
//!
//! The body is read as untyped JSON so that every rejection carries the
//! service's own message instead of a deserializer error.

use serde_json::{Map, Value};
use shelflife_core::{FeatureRecord, REQUIRED_FIELDS};
use utoipa::ToSchema;

use crate::error::PredictError;

/// Documented shape of a `/predict` body.
///
/// Numeric fields also accept numeric strings; `storage_type` is matched
/// case-insensitively.
#[derive(Debug, ToSchema)]
pub struct PredictionRequest {
    /// Storage temperature in °C.
    pub temperature: f64,
    /// Relative humidity in percent.
    pub humidity: f64,
    /// Hours the ingredient has been stored.
    pub time_in_refrigerator: f64,
    /// Food category, e.g. `BEEF` or `CHEESE`.
    pub ingredient_type: String,
    /// `FRIDGE`, `FREEZER`, or `PANTRY`.
    pub storage_type: String,
}

/// Parse a raw body into a [`FeatureRecord`].
///
/// Checks run in order: body present, required fields present, values
/// coercible.
pub fn parse_prediction_request(body: &[u8]) -> Result<FeatureRecord, PredictError> {
    let data = match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) if !map.is_empty() => map,
        _ => return Err(PredictError::NoData),
    };

    let missing: Vec<&'static str> = REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|field| !data.contains_key(*field))
        .collect();
    if !missing.is_empty() {
        return Err(PredictError::MissingFields(missing));
    }

    let temperature = coerce_float(&data, "temperature")?;
    let humidity = coerce_float(&data, "humidity")?;
    let time_in_inventory = coerce_float(&data, "time_in_refrigerator")?;
    let ingredient_type = coerce_string(&data, "ingredient_type")?;
    let storage_type = coerce_string(&data, "storage_type")?;

    Ok(FeatureRecord::new(
        temperature,
        humidity,
        time_in_inventory,
        ingredient_type,
        &storage_type,
    ))
}

fn field<'a>(data: &'a Map<String, Value>, name: &'static str) -> Result<&'a Value, PredictError> {
    data.get(name)
        .ok_or_else(|| PredictError::MissingFields(vec![name]))
}

fn coerce_float(data: &Map<String, Value>, name: &'static str) -> Result<f64, PredictError> {
    match field(data, name)? {
        Value::Number(n) => n.as_f64().ok_or_else(|| {
            PredictError::InvalidInput(format!("could not convert {name} value {n} to float"))
        }),
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => {
            let parsed = s.trim().parse::<f64>().map_err(|_| {
                PredictError::InvalidInput(format!("could not convert string to float: '{s}'"))
            })?;
            if parsed.is_finite() {
                Ok(parsed)
            } else {
                Err(PredictError::InvalidInput(format!(
                    "Input contains NaN or infinity: {name} = '{s}'"
                )))
            }
        }
        other => Err(PredictError::InvalidInput(format!(
            "could not convert {name} value {other} to float"
        ))),
    }
}

/// Coerce a categorical field to text.
///
/// Numbers and booleans use their JSON spelling (`7`, `true`, never `True`).
/// `null`, arrays and objects are rejected instead of being stringified into
/// an unknown category.
fn coerce_string(data: &Map<String, Value>, name: &'static str) -> Result<String, PredictError> {
    match field(data, name)? {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => Err(PredictError::InvalidInput(
            format!("{name} must be a string"),
        )),
    }
}
