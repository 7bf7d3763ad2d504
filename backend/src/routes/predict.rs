//! Prediction routes
//!
//! Each handler validates its input before touching a model, so a missing
//! model never masks a bad request.

use crate::error::{ApiError, ApiResult};
use crate::services::PredictionService;
use crate::state::AppState;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use smartcity_nexus_shared::types::{
    Co2Features, Co2Prediction, EnergyDemandQuery, EnergyPrediction, WeatherFeatures,
    WeatherPrediction,
};
use validator::Validate;

/// POST /predict/weather
pub async fn weather(
    State(state): State<AppState>,
    Json(input): Json<WeatherFeatures>,
) -> ApiResult<Json<WeatherPrediction>> {
    input.validate()?;
    let prediction = PredictionService::predict_weather(state.models(), &input)?;
    Ok(Json(prediction))
}

/// POST /predict/aep?year=..&month=..&day=..&hour=..&day_of_week=..
pub async fn energy(
    State(state): State<AppState>,
    query: Result<Query<EnergyDemandQuery>, QueryRejection>,
) -> ApiResult<Json<EnergyPrediction>> {
    let Query(query) = query.map_err(|e| ApiError::Validation(e.body_text()))?;
    query.validate()?;
    let prediction = PredictionService::predict_energy(state.models(), &query)?;
    Ok(Json(prediction))
}

/// POST /predict/co2
pub async fn co2(
    State(state): State<AppState>,
    Json(input): Json<Co2Features>,
) -> ApiResult<Json<Co2Prediction>> {
    input.validate()?;
    let prediction = PredictionService::predict_co2(state.models(), &input)?;
    Ok(Json(prediction))
}
