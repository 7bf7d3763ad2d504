//! Regression model inference
//!
//! Models are loaded once at startup. A model that fails to load leaves an
//! empty slot; requests for it fail with `ModelError::Unavailable` instead of
//! taking the server down.

mod linear;

pub use linear::LinearModel;

use crate::config::ModelsConfig;
use std::fmt::Debug;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Inference failures
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("{0} model is not loaded")]
    Unavailable(&'static str),

    #[error("Invalid model artifact: {0}")]
    InvalidArtifact(String),

    #[error("Expected {expected} features, got {actual}")]
    FeatureMismatch { expected: usize, actual: usize },

    #[error("Invalid model input: {0}")]
    InvalidInput(String),
}

/// A fitted model mapping a feature vector to a fixed number of outputs
pub trait Regressor: Send + Sync + Debug {
    fn name(&self) -> &str;

    fn feature_count(&self) -> usize;

    fn output_count(&self) -> usize;

    fn predict(&self, features: &[f64]) -> Result<Vec<f64>, ModelError>;
}

/// The models this service exposes
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    weather: Option<Arc<dyn Regressor>>,
    energy: Option<Arc<dyn Regressor>>,
    co2: Option<Arc<dyn Regressor>>,
}

impl ModelRegistry {
    /// Registry with no models loaded
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load every configured artifact, logging the ones that fail
    pub fn load(config: &ModelsConfig) -> Self {
        Self {
            weather: load_slot("weather", &config.weather_path),
            energy: load_slot("energy", &config.energy_path),
            co2: load_slot("co2", &config.co2_path),
        }
    }

    pub fn with_weather(mut self, model: impl Regressor + 'static) -> Self {
        self.weather = Some(Arc::new(model));
        self
    }

    pub fn with_energy(mut self, model: impl Regressor + 'static) -> Self {
        self.energy = Some(Arc::new(model));
        self
    }

    pub fn with_co2(mut self, model: impl Regressor + 'static) -> Self {
        self.co2 = Some(Arc::new(model));
        self
    }

    pub fn weather(&self) -> Result<&dyn Regressor, ModelError> {
        self.weather.as_deref().ok_or(ModelError::Unavailable("weather"))
    }

    pub fn energy(&self) -> Result<&dyn Regressor, ModelError> {
        self.energy.as_deref().ok_or(ModelError::Unavailable("energy"))
    }

    pub fn co2(&self) -> Result<&dyn Regressor, ModelError> {
        self.co2.as_deref().ok_or(ModelError::Unavailable("co2"))
    }

    /// Names of the models that loaded
    pub fn loaded(&self) -> Vec<&'static str> {
        [
            ("weather", self.weather.is_some()),
            ("energy", self.energy.is_some()),
            ("co2", self.co2.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, loaded)| loaded.then_some(name))
        .collect()
    }
}

fn load_slot(slot: &'static str, path: &str) -> Option<Arc<dyn Regressor>> {
    match LinearModel::from_path(path) {
        Ok(model) => {
            info!(
                model = slot,
                path,
                features = model.feature_count(),
                outputs = model.output_count(),
                "Model loaded"
            );
            Some(Arc::new(model))
        }
        Err(e) => {
            warn!(model = slot, path, error = %e, "Model unavailable");
            None
        }
    }
}
