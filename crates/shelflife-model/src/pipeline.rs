//! Encoder + estimator pipeline implementing [`ExpiryModel`].

use shelflife_core::{ExpiryModel, FeatureRecord, Result, ShelfLifeError};

use crate::artifact::{Estimator, ModelArtifact};
use crate::encoding::FeatureEncoder;

/// A validated model ready to serve predictions.
#[derive(Debug, Clone)]
pub struct Pipeline {
    name: String,
    encoder: FeatureEncoder,
    estimator: Estimator,
}

impl Pipeline {
    /// Validate an artifact and turn it into a servable pipeline.
    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self> {
        artifact.validate()?;
        Ok(Self {
            name: artifact.name,
            encoder: artifact.preprocessor,
            estimator: artifact.estimator,
        })
    }

    /// Estimator kind (`random_forest` or `linear`).
    pub fn kind(&self) -> &'static str {
        self.estimator.kind()
    }

    /// Width of the encoded feature vector.
    pub fn n_features(&self) -> usize {
        self.encoder.width()
    }
}

impl ExpiryModel for Pipeline {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, record: &FeatureRecord) -> Result<f64> {
        let x = self.encoder.encode(record)?;
        let hours = self.estimator.predict_row(&x)?;
        if !hours.is_finite() {
            return Err(ShelfLifeError::Prediction(format!(
                "model produced a non-finite value ({hours})"
            )));
        }
        Ok(hours)
    }
}
