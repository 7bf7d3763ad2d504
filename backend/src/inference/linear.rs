//! Multi-output linear regressor loaded from a JSON artifact
//!
//! Artifact layout:
//!
//! ```json
//! {
//!   "name": "weather",
//!   "features": ["DATE", "MONTH", "HOUR"],
//!   "outputs": ["BASEL_temp_mean"],
//!   "intercepts": [9.1],
//!   "coefficients": [[0.01, 0.4, 0.05]]
//! }
//! ```

use super::{ModelError, Regressor};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModel {
    pub name: String,
    pub features: Vec<String>,
    pub outputs: Vec<String>,
    pub intercepts: Vec<f64>,
    /// One row per output, one column per feature
    pub coefficients: Vec<Vec<f64>>,
}

impl LinearModel {
    /// Read and shape-check an artifact
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ModelError::InvalidArtifact(format!("{}: {}", path.display(), e))
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, ModelError> {
        let model: LinearModel = serde_json::from_str(raw)
            .map_err(|e| ModelError::InvalidArtifact(e.to_string()))?;
        model.check_shape()?;
        Ok(model)
    }

    fn check_shape(&self) -> Result<(), ModelError> {
        if self.outputs.is_empty() {
            return Err(ModelError::InvalidArtifact(format!(
                "model '{}' has no outputs",
                self.name
            )));
        }
        if self.intercepts.len() != self.outputs.len()
            || self.coefficients.len() != self.outputs.len()
        {
            return Err(ModelError::InvalidArtifact(format!(
                "model '{}' needs one intercept and one coefficient row per output",
                self.name
            )));
        }
        if let Some(row) = self
            .coefficients
            .iter()
            .find(|row| row.len() != self.features.len())
        {
            return Err(ModelError::InvalidArtifact(format!(
                "model '{}' has a coefficient row of length {} for {} features",
                self.name,
                row.len(),
                self.features.len()
            )));
        }
        Ok(())
    }
}

impl Regressor for LinearModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn feature_count(&self) -> usize {
        self.features.len()
    }

    fn output_count(&self) -> usize {
        self.outputs.len()
    }

    fn predict(&self, features: &[f64]) -> Result<Vec<f64>, ModelError> {
        if features.len() != self.features.len() {
            return Err(ModelError::FeatureMismatch {
                expected: self.features.len(),
                actual: features.len(),
            });
        }
        if features.iter().any(|value| !value.is_finite()) {
            return Err(ModelError::InvalidInput("features must be finite numbers".to_string()));
        }

        Ok(self
            .coefficients
            .iter()
            .zip(&self.intercepts)
            .map(|(row, intercept)| {
                intercept + row.iter().zip(features).map(|(w, x)| w * x).sum::<f64>()
            })
            .collect())
    }
}
