//! Feature encoding for tabular expiry models.
//!
//! Turns a [`FeatureRecord`] into the dense `f64` vector an estimator was
//! trained on. The layout is fixed by the artifact:
//!
//! ```text
//! [numeric columns (optionally standardised)] ++ one-hot(cat_1) ++ one-hot(cat_2) ...
//! ```
//!
//! Categories unseen at training time encode as an all-zero block, so a new
//! ingredient type degrades the prediction instead of failing it.

use serde::{Deserialize, Serialize};
use shelflife_core::{FeatureRecord, Result, ShelfLifeError, CATEGORICAL_COLUMNS, NUMERIC_COLUMNS};

/// Per-column standardisation: `(x - mean) / scale`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    /// Column means, aligned with [`FeatureEncoder::numeric`].
    pub means: Vec<f64>,
    /// Column scales, aligned with [`FeatureEncoder::numeric`].
    pub scales: Vec<f64>,
}

/// One-hot encoding of a single categorical column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneHotColumn {
    /// Column name in the feature record.
    pub column: String,
    /// Known categories, in output order.
    pub categories: Vec<String>,
}

impl OneHotColumn {
    /// Index of `value` among the known categories.
    fn position(&self, value: &str) -> Option<usize> {
        self.categories.iter().position(|c| c == value)
    }
}

/// Preprocessing stage that maps a record onto the estimator's input space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureEncoder {
    /// Numeric columns, in output order.
    pub numeric: Vec<String>,
    /// Optional standardisation applied to the numeric block.
    #[serde(default)]
    pub scaler: Option<StandardScaler>,
    /// Categorical columns, in output order.
    #[serde(default)]
    pub categorical: Vec<OneHotColumn>,
}

impl FeatureEncoder {
    /// Width of the encoded vector.
    pub fn width(&self) -> usize {
        self.numeric.len()
            + self
                .categorical
                .iter()
                .map(|c| c.categories.len())
                .sum::<usize>()
    }

    /// Check that every column exists in the feature schema and the scaler
    /// lines up with the numeric block.
    pub fn validate(&self) -> Result<()> {
        for column in &self.numeric {
            if !NUMERIC_COLUMNS.contains(&column.as_str()) {
                return Err(ShelfLifeError::Artifact(format!(
                    "unknown numeric column '{column}'"
                )));
            }
        }
        for one_hot in &self.categorical {
            if !CATEGORICAL_COLUMNS.contains(&one_hot.column.as_str()) {
                return Err(ShelfLifeError::Artifact(format!(
                    "unknown categorical column '{}'",
                    one_hot.column
                )));
            }
            if one_hot.categories.is_empty() {
                return Err(ShelfLifeError::Artifact(format!(
                    "categorical column '{}' has no categories",
                    one_hot.column
                )));
            }
        }
        if let Some(scaler) = &self.scaler {
            let n = self.numeric.len();
            if scaler.means.len() != n || scaler.scales.len() != n {
                return Err(ShelfLifeError::Artifact(format!(
                    "scaler expects {} means and scales, got {} and {}",
                    n,
                    scaler.means.len(),
                    scaler.scales.len()
                )));
            }
            if scaler.scales.iter().any(|s| *s == 0.0 || !s.is_finite()) {
                return Err(ShelfLifeError::Artifact(
                    "scaler scales must be finite and non-zero".to_string(),
                ));
            }
        }
        if self.width() == 0 {
            return Err(ShelfLifeError::Artifact(
                "preprocessor produces no features".to_string(),
            ));
        }
        Ok(())
    }

    /// Encode one record.
    pub fn encode(&self, record: &FeatureRecord) -> Result<Vec<f64>> {
        let mut out = Vec::with_capacity(self.width());

        for (i, column) in self.numeric.iter().enumerate() {
            let raw = record.numeric(column).ok_or_else(|| {
                ShelfLifeError::Prediction(format!("record has no numeric column '{column}'"))
            })?;
            if !raw.is_finite() {
                return Err(ShelfLifeError::InvalidInput(format!(
                    "Input contains NaN or infinity in column '{column}'"
                )));
            }
            let value = match &self.scaler {
                Some(scaler) => match (scaler.means.get(i), scaler.scales.get(i)) {
                    (Some(mean), Some(scale)) => (raw - mean) / scale,
                    _ => {
                        return Err(ShelfLifeError::Prediction(format!(
                            "scaler has no entry for column '{column}'"
                        )))
                    }
                },
                None => raw,
            };
            out.push(value);
        }

        for one_hot in &self.categorical {
            let value = record.categorical(&one_hot.column).ok_or_else(|| {
                ShelfLifeError::Prediction(format!(
                    "record has no categorical column '{}'",
                    one_hot.column
                ))
            })?;
            let hit = one_hot.position(value);
            out.extend((0..one_hot.categories.len()).map(|j| {
                if Some(j) == hit {
                    1.0
                } else {
                    0.0
                }
            }));
        }

        Ok(out)
    }
}
