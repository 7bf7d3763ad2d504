//! Prediction service - turns typed request inputs into model features
//!
//! The energy model was trained on lag and rolling-mean features. Live
//! meter data is not wired in, so those inputs use fixed recent values.

use crate::inference::{ModelError, ModelRegistry, Regressor};
use metrics::counter;
use smartcity_nexus_shared::types::{
    Co2Features, Co2Prediction, EnergyDemandQuery, EnergyPrediction, WeatherFeatures,
    WeatherPrediction,
};
use std::f64::consts::PI;

/// Stand-in demand history (MWh) for the energy model's lag features
pub const ENERGY_LAGS: [f64; 3] = [20000.0, 20500.0, 21000.0];

/// Stand-in rolling means (MWh) over 3, 6 and 12 hours
pub const ENERGY_ROLLING_MEANS: [f64; 3] = [22000.0, 22500.0, 23000.0];

/// Prediction service
pub struct PredictionService;

impl PredictionService {
    /// Predict mean/min/max temperature
    pub fn predict_weather(
        models: &ModelRegistry,
        input: &WeatherFeatures,
    ) -> Result<WeatherPrediction, ModelError> {
        let outputs = run(models.weather()?, &input.to_vector(), 3)?;
        counter!("predictions_total", "model" => "weather").increment(1);

        Ok(WeatherPrediction {
            temp_mean: outputs[0],
            temp_min: outputs[1],
            temp_max: outputs[2],
        })
    }

    /// Predict hourly energy demand
    pub fn predict_energy(
        models: &ModelRegistry,
        query: &EnergyDemandQuery,
    ) -> Result<EnergyPrediction, ModelError> {
        let outputs = run(models.energy()?, &Self::energy_features(query), 1)?;
        counter!("predictions_total", "model" => "energy").increment(1);

        Ok(EnergyPrediction {
            predicted_mwh: outputs[0],
        })
    }

    /// Predict CO2 emissions of a vehicle
    pub fn predict_co2(
        models: &ModelRegistry,
        input: &Co2Features,
    ) -> Result<Co2Prediction, ModelError> {
        let outputs = run(models.co2()?, &input.to_vector(), 1)?;
        counter!("predictions_total", "model" => "co2").increment(1);

        Ok(Co2Prediction {
            co2_emissions_g_per_km: outputs[0],
        })
    }

    /// Feature vector for the energy model, hour encoded cyclically
    pub fn energy_features(query: &EnergyDemandQuery) -> Vec<f64> {
        let angle = 2.0 * PI * f64::from(query.hour) / 24.0;

        let mut features = vec![
            f64::from(query.year),
            f64::from(query.month),
            f64::from(query.day),
            f64::from(query.hour),
            f64::from(query.day_of_week),
        ];
        features.extend_from_slice(&ENERGY_LAGS);
        features.extend_from_slice(&ENERGY_ROLLING_MEANS);
        features.push(angle.sin());
        features.push(angle.cos());
        features
    }
}

/// Run a model and check it produced at least `outputs` values
fn run(model: &dyn Regressor, features: &[f64], outputs: usize) -> Result<Vec<f64>, ModelError> {
    let prediction = model.predict(features)?;
    if prediction.len() < outputs {
        return Err(ModelError::InvalidArtifact(format!(
            "model '{}' returned {} outputs, expected {}",
            model.name(),
            prediction.len(),
            outputs
        )));
    }
    Ok(prediction)
}
