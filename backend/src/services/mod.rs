//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! repositories, models and external systems.

pub mod auth;
pub mod prediction;

pub use auth::AuthService;
pub use prediction::PredictionService;
