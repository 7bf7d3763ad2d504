//! SmartCity Nexus Shared Library
//!
//! Request/response types and validation helpers shared by the backend
//! and its clients.

pub mod types;
pub mod validation;

// Re-export commonly used items
pub use types::*;
