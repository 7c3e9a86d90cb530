//! Random forest regression.
//!
//! Trees are stored in parallel-array form: node `i` splits on
//! `feature[i] <= threshold[i]` and sends the row to `children_left[i]` or
//! `children_right[i]`. Leaves have both children set to [`LEAF`] and carry
//! the prediction in `value[i]`. The forest output is the mean over trees.

use serde::{Deserialize, Serialize};
use shelflife_core::{Result, ShelfLifeError};

/// Child index marking a leaf node.
pub const LEAF: i64 = -1;

/// A single regression tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    /// Left child per node, or [`LEAF`].
    pub children_left: Vec<i64>,
    /// Right child per node, or [`LEAF`].
    pub children_right: Vec<i64>,
    /// Split feature per node (ignored on leaves).
    pub feature: Vec<i64>,
    /// Split threshold per node (ignored on leaves).
    pub threshold: Vec<f64>,
    /// Node output (only read on leaves).
    pub value: Vec<f64>,
}

impl RegressionTree {
    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.value.len()
    }

    /// Check array shapes, child links and feature indices.
    ///
    /// Children must point strictly forward, which guarantees that
    /// [`predict_row`](Self::predict_row) terminates.
    pub fn validate(&self, n_features: usize) -> Result<()> {
        let n = self.node_count();
        if n == 0 {
            return Err(ShelfLifeError::Artifact("tree has no nodes".to_string()));
        }
        if self.children_left.len() != n
            || self.children_right.len() != n
            || self.feature.len() != n
            || self.threshold.len() != n
        {
            return Err(ShelfLifeError::Artifact(format!(
                "tree node arrays differ in length (expected {n})"
            )));
        }

        for node in 0..n {
            let left = self.children_left[node];
            let right = self.children_right[node];
            if left == LEAF && right == LEAF {
                if !self.value[node].is_finite() {
                    return Err(ShelfLifeError::Artifact(format!(
                        "leaf {node} has a non-finite value"
                    )));
                }
                continue;
            }
            for child in [left, right] {
                if child <= node as i64 || child >= n as i64 {
                    return Err(ShelfLifeError::Artifact(format!(
                        "node {node} has invalid child {child}"
                    )));
                }
            }
            let feature = self.feature[node];
            if feature < 0 || feature as usize >= n_features {
                return Err(ShelfLifeError::Artifact(format!(
                    "node {node} splits on feature {feature}, but only {n_features} features are encoded"
                )));
            }
        }
        Ok(())
    }

    /// Walk the tree for one encoded row.
    pub fn predict_row(&self, x: &[f64]) -> Result<f64> {
        let mut node = 0usize;
        loop {
            let (left, right) = match (self.children_left.get(node), self.children_right.get(node)) {
                (Some(&l), Some(&r)) => (l, r),
                _ => {
                    return Err(ShelfLifeError::Prediction(format!(
                        "tree node {node} out of range"
                    )))
                }
            };
            if left == LEAF {
                return self.value.get(node).copied().ok_or_else(|| {
                    ShelfLifeError::Prediction(format!("tree leaf {node} has no value"))
                });
            }
            let feature = self.feature.get(node).copied().unwrap_or(-1);
            let sample = usize::try_from(feature)
                .ok()
                .and_then(|f| x.get(f))
                .copied()
                .ok_or_else(|| {
                    ShelfLifeError::Prediction(format!(
                        "feature {feature} not present in a row of width {}",
                        x.len()
                    ))
                })?;
            let threshold = self.threshold.get(node).copied().unwrap_or(f64::NAN);
            let next = if sample <= threshold { left } else { right };
            node = usize::try_from(next).map_err(|_| {
                ShelfLifeError::Prediction(format!("tree node {node} has invalid child {next}"))
            })?;
        }
    }
}

/// An averaged ensemble of regression trees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    /// Member trees.
    pub trees: Vec<RegressionTree>,
}

impl RandomForest {
    /// Validate every member tree against the encoded width.
    pub fn validate(&self, n_features: usize) -> Result<()> {
        if self.trees.is_empty() {
            return Err(ShelfLifeError::Artifact(
                "random forest has no trees".to_string(),
            ));
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(n_features)
                .map_err(|e| ShelfLifeError::Artifact(format!("tree {i}: {e}")))?;
        }
        Ok(())
    }

    /// Mean of the member tree predictions.
    pub fn predict_row(&self, x: &[f64]) -> Result<f64> {
        if self.trees.is_empty() {
            return Err(ShelfLifeError::Prediction(
                "random forest has no trees".to_string(),
            ));
        }
        let mut sum = 0.0;
        for tree in &self.trees {
            sum += tree.predict_row(x)?;
        }
        Ok(sum / self.trees.len() as f64)
    }
}
