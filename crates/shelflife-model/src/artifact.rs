//! On-disk model artifact format.
//!
//! An artifact is a JSON document written by the training pipeline. It
//! bundles the preprocessing stage with exactly one estimator:
//!
//! ```json
//! {
//!   "format_version": 1,
//!   "name": "expiry-random-forest",
//!   "preprocessor": { "numeric": ["temperature", "humidity", "time_in_inventory"],
//!                     "categorical": [{"column": "storage_type", "categories": ["FREEZER", "FRIDGE", "PANTRY"]}] },
//!   "estimator": { "type": "random_forest", "trees": [ ... ] }
//! }
//! ```

use serde::{Deserialize, Serialize};
use shelflife_core::{Result, ShelfLifeError};

use crate::encoding::FeatureEncoder;
use crate::forest::RandomForest;
use crate::linear::LinearRegressor;

/// Artifact format version understood by this build.
pub const FORMAT_VERSION: u32 = 1;

/// The regression stage of an artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Estimator {
    /// Averaged regression trees.
    RandomForest(RandomForest),
    /// Linear model.
    Linear(LinearRegressor),
}

impl Estimator {
    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RandomForest(_) => "random_forest",
            Self::Linear(_) => "linear",
        }
    }

    pub fn validate(&self, n_features: usize) -> Result<()> {
        match self {
            Self::RandomForest(forest) => forest.validate(n_features),
            Self::Linear(linear) => linear.validate(n_features),
        }
    }

    pub fn predict_row(&self, x: &[f64]) -> Result<f64> {
        match self {
            Self::RandomForest(forest) => forest.predict_row(x),
            Self::Linear(linear) => linear.predict_row(x),
        }
    }
}

/// A deserialized, not yet validated model artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Must equal [`FORMAT_VERSION`].
    pub format_version: u32,
    /// Model name reported in logs.
    #[serde(default = "default_model_name")]
    pub name: String,
    /// Preprocessing stage.
    pub preprocessor: FeatureEncoder,
    /// Regression stage.
    pub estimator: Estimator,
}

fn default_model_name() -> String {
    "expiry-predictor".to_string()
}

impl ModelArtifact {
    /// Parse an artifact from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Parse an artifact from raw bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Structural checks: version, schema columns, estimator shape.
    pub fn validate(&self) -> Result<()> {
        if self.format_version != FORMAT_VERSION {
            return Err(ShelfLifeError::Artifact(format!(
                "unsupported format_version {} (expected {FORMAT_VERSION})",
                self.format_version
            )));
        }
        self.preprocessor.validate()?;
        self.estimator.validate(self.preprocessor.width())
    }
}
