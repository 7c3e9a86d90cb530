//! Linear regression over the encoded feature vector.

use serde::{Deserialize, Serialize};
use shelflife_core::{Result, ShelfLifeError};

/// `intercept + Σ coef[i] * x[i]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRegressor {
    /// Bias term.
    pub intercept: f64,
    /// One coefficient per encoded feature.
    pub coef: Vec<f64>,
}

impl LinearRegressor {
    /// Check the coefficient count against the encoded width.
    pub fn validate(&self, n_features: usize) -> Result<()> {
        if self.coef.len() != n_features {
            return Err(ShelfLifeError::Artifact(format!(
                "linear model has {} coefficients, but {} features are encoded",
                self.coef.len(),
                n_features
            )));
        }
        if !self.intercept.is_finite() || self.coef.iter().any(|c| !c.is_finite()) {
            return Err(ShelfLifeError::Artifact(
                "linear model has non-finite weights".to_string(),
            ));
        }
        Ok(())
    }

    pub fn predict_row(&self, x: &[f64]) -> Result<f64> {
        if x.len() != self.coef.len() {
            return Err(ShelfLifeError::Prediction(format!(
                "expected {} features, got {}",
                self.coef.len(),
                x.len()
            )));
        }
        Ok(self.intercept + self.coef.iter().zip(x).map(|(c, v)| c * v).sum::<f64>())
    }
}
