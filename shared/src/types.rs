//! API request and response types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;
use validator::Validate;

// ============================================================================
// Authentication Types
// ============================================================================

/// Registration request (form or JSON)
#[derive(Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(max = 128))]
    #[serde(default)]
    pub name: String,
    #[validate(length(min = 3, max = 64))]
    pub username: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("name", &self.name)
            .field("username", &self.username)
            .field("password", &"[redacted]")
            .finish()
    }
}

/// Login request (form or JSON)
#[derive(Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 64))]
    pub username: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"[redacted]")
            .finish()
    }
}

/// Bearer token issued on successful login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
    /// Seconds until expiry, relative to issuance
    pub expires_in: i64,
}

/// Public view of a registered user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Prediction Types
// ============================================================================

fn default_cloud_cover() -> f64 {
    50.0
}

fn default_humidity() -> f64 {
    70.0
}

fn default_pressure() -> f64 {
    1010.0
}

fn default_global_radiation() -> f64 {
    200.0
}

fn default_precipitation() -> f64 {
    5.0
}

fn default_sunshine() -> f64 {
    4.0
}

/// Weather model input. Field names on the wire follow the training dataset.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct WeatherFeatures {
    #[serde(rename = "DATE")]
    #[validate(range(min = 1, max = 31))]
    pub day: u32,
    #[serde(rename = "MONTH")]
    #[validate(range(min = 1, max = 12))]
    pub month: u32,
    #[serde(rename = "HOUR")]
    #[validate(range(max = 23))]
    pub hour: u32,
    #[serde(rename = "BASEL_cloud_cover", default = "default_cloud_cover")]
    pub cloud_cover: f64,
    #[serde(rename = "BASEL_humidity", default = "default_humidity")]
    pub humidity: f64,
    #[serde(rename = "BASEL_pressure", default = "default_pressure")]
    pub pressure: f64,
    #[serde(rename = "BASEL_global_radiation", default = "default_global_radiation")]
    pub global_radiation: f64,
    #[serde(rename = "BASEL_precipitation", default = "default_precipitation")]
    pub precipitation: f64,
    #[serde(rename = "BASEL_sunshine", default = "default_sunshine")]
    pub sunshine: f64,
}

impl WeatherFeatures {
    /// Feature vector in the order the model was trained on
    pub fn to_vector(&self) -> Vec<f64> {
        vec![
            f64::from(self.day),
            f64::from(self.month),
            f64::from(self.hour),
            self.cloud_cover,
            self.humidity,
            self.pressure,
            self.global_radiation,
            self.precipitation,
            self.sunshine,
        ]
    }
}

/// Weather model output (degrees Celsius)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherPrediction {
    #[serde(rename = "BASEL_temp_mean")]
    pub temp_mean: f64,
    #[serde(rename = "BASEL_temp_min")]
    pub temp_min: f64,
    #[serde(rename = "BASEL_temp_max")]
    pub temp_max: f64,
}

/// Energy demand query parameters
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EnergyDemandQuery {
    #[validate(range(min = 1900, max = 2200))]
    pub year: i32,
    #[validate(range(min = 1, max = 12))]
    pub month: u32,
    #[validate(range(min = 1, max = 31))]
    pub day: u32,
    #[validate(range(max = 23))]
    pub hour: u32,
    #[validate(range(max = 6))]
    pub day_of_week: u32,
}

/// Energy demand forecast
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnergyPrediction {
    #[serde(rename = "Predicted AEP (MWh)")]
    pub predicted_mwh: f64,
}

/// Vehicle characteristics for CO2 emission estimation
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Co2Features {
    #[validate(range(min = 0.0, max = 10.0))]
    pub engine_size_l: f64,
    #[validate(range(min = 1, max = 16))]
    pub cylinders: u32,
    /// L/100 km
    #[validate(range(min = 0.0, max = 50.0))]
    pub fuel_consumption_city: f64,
    /// L/100 km
    #[validate(range(min = 0.0, max = 50.0))]
    pub fuel_consumption_hwy: f64,
    /// L/100 km
    #[validate(range(min = 0.0, max = 50.0))]
    pub fuel_consumption_comb: f64,
}

impl Co2Features {
    pub fn to_vector(&self) -> Vec<f64> {
        vec![
            self.engine_size_l,
            f64::from(self.cylinders),
            self.fuel_consumption_city,
            self.fuel_consumption_hwy,
            self.fuel_consumption_comb,
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Co2Prediction {
    pub co2_emissions_g_per_km: f64,
}

// ============================================================================
// Geospatial Types
// ============================================================================

/// Rectangular region as `[west, south, east, north]` in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl BoundingBox {
    pub fn from_array(bounds: [f64; 4]) -> Self {
        Self {
            west: bounds[0],
            south: bounds[1],
            east: bounds[2],
            north: bounds[3],
        }
    }

    pub fn to_array(self) -> [f64; 4] {
        [self.west, self.south, self.east, self.north]
    }
}

/// Land-cover processing request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessRequest {
    pub bounds: [f64; 4],
}

/// Population time series for a region
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PopulationSeries {
    pub date: Vec<String>,
    pub pop: Vec<f64>,
    #[serde(default)]
    pub change: Vec<f64>,
}

/// Built-up area time series for a region (km²)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuiltAreaSeries {
    pub date: Vec<String>,
    pub area: Vec<f64>,
    #[serde(default)]
    pub change: Vec<f64>,
}

/// Land-cover analysis result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandCoverReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub population_data: PopulationSeries,
    pub built_area_data: BuiltAreaSeries,
}
