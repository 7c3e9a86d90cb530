//! Model artifacts and inference for shelflife
//!
//! This crate turns a JSON model artifact into an [`ExpiryModel`]
//! implementation. An artifact pairs a [`FeatureEncoder`] (numeric
//! passthrough/standardisation plus one-hot categoricals) with one estimator:
//! a [`RandomForest`] of regression trees or a [`LinearRegressor`].
//!
//! [`load_model`] is called once at startup and reports whether a model is
//! available; it never aborts the process.
//!
//! [`ExpiryModel`]: shelflife_core::ExpiryModel

pub mod artifact;
pub mod encoding;
pub mod forest;
pub mod linear;
pub mod loader;
pub mod pipeline;

pub use artifact::{Estimator, ModelArtifact, FORMAT_VERSION};
pub use encoding::{FeatureEncoder, OneHotColumn, StandardScaler};
pub use forest::{RandomForest, RegressionTree};
pub use linear::LinearRegressor;
pub use loader::{load_model, read_pipeline, ModelLoad};
pub use pipeline::Pipeline;
