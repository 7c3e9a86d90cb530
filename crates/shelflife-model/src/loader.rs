//! One-shot model loading at startup.
//!
//! [`load_model`] never fails: a missing or broken artifact is reported as a
//! [`ModelLoad`] outcome and logged, so the service can still come up in a
//! degraded mode.

use std::path::Path;
use std::sync::Arc;

use shelflife_core::{ExpiryModel, Result, ShelfLifeError};
use tracing::{error, info, warn};

use crate::artifact::ModelArtifact;
use crate::pipeline::Pipeline;

/// Outcome of a startup model load.
pub enum ModelLoad {
    /// The artifact was read, parsed, and validated.
    Loaded(Arc<dyn ExpiryModel>),
    /// No file at the configured path.
    NotFound,
    /// The file exists but could not be turned into a model.
    Failed(String),
}

impl ModelLoad {
    /// Whether a model is available.
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    /// The model handle, if loaded.
    pub fn into_model(self) -> Option<Arc<dyn ExpiryModel>> {
        match self {
            Self::Loaded(model) => Some(model),
            Self::NotFound | Self::Failed(_) => None,
        }
    }
}

impl std::fmt::Debug for ModelLoad {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Loaded(model) => f.debug_tuple("Loaded").field(&model.name()).finish(),
            Self::NotFound => f.write_str("NotFound"),
            Self::Failed(reason) => f.debug_tuple("Failed").field(reason).finish(),
        }
    }
}

/// Read, parse, and validate the artifact at `path`.
pub fn read_pipeline(path: &Path) -> Result<Pipeline> {
    let bytes = std::fs::read(path)?;
    let artifact = ModelArtifact::from_slice(&bytes)?;
    Pipeline::from_artifact(artifact)
}

/// Load the model artifact at `path`, logging the outcome.
pub fn load_model(path: &Path) -> ModelLoad {
    match read_pipeline(path) {
        Ok(pipeline) => {
            info!(
                path = %path.display(),
                model = pipeline.name(),
                kind = pipeline.kind(),
                n_features = pipeline.n_features(),
                "Model loaded successfully"
            );
            ModelLoad::Loaded(Arc::new(pipeline))
        }
        Err(ShelfLifeError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!(path = %path.display(), "Model file not found");
            ModelLoad::NotFound
        }
        Err(e) => {
            error!(path = %path.display(), error = %e, "Error loading model");
            ModelLoad::Failed(e.to_string())
        }
    }
}
