//! Application error handling
//!
//! This module provides unified error handling for the API,
//! converting domain errors to appropriate HTTP responses.

use crate::auth::{AuthError, HashError, TokenError};
use crate::geo::GeoError;
use crate::inference::ModelError;
use crate::repositories::StoreError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// API error type that can be converted to HTTP responses
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Upstream service error: {0}")]
    Upstream(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),

    #[error("Storage error")]
    Storage(#[source] StoreError),
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            ApiError::ModelUnavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "MODEL_UNAVAILABLE", msg.clone())
            }
            ApiError::Upstream(msg) => {
                error!("Upstream error: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_ERROR",
                    "The geospatial service request failed".to_string(),
                )
            }
            ApiError::Internal(err) => {
                error!("Internal error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
            ApiError::Storage(err) => {
                error!("Storage error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                field: None,
            },
        });

        (status, body).into_response()
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::ExpiredToken | TokenError::InvalidSignature | TokenError::MalformedToken => {
                ApiError::Unauthorized(err.to_string())
            }
            TokenError::NonPositiveTtl | TokenError::Signing(_) => {
                ApiError::Internal(anyhow::Error::new(err))
            }
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateUsername => ApiError::Conflict(err.to_string()),
            StoreError::Database(_) => ApiError::Storage(err),
        }
    }
}

impl From<HashError> for ApiError {
    fn from(err: HashError) -> Self {
        ApiError::Internal(anyhow::Error::new(err))
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::UsernameTaken => ApiError::Conflict(err.to_string()),
            AuthError::UserNotFound => ApiError::NotFound(err.to_string()),
            AuthError::InvalidCredentials => ApiError::Unauthorized(err.to_string()),
            AuthError::Storage(e) => e.into(),
            AuthError::Token(e) => e.into(),
            AuthError::Hashing(e) => e.into(),
        }
    }
}

impl From<ModelError> for ApiError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::Unavailable(_) => ApiError::ModelUnavailable(err.to_string()),
            ModelError::FeatureMismatch { .. } | ModelError::InvalidInput(_) => {
                ApiError::BadRequest(err.to_string())
            }
            ModelError::InvalidArtifact(_) => ApiError::Internal(anyhow::Error::new(err)),
        }
    }
}

impl From<GeoError> for ApiError {
    fn from(err: GeoError) -> Self {
        ApiError::Upstream(err.to_string())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        ApiError::Validation(err.to_string())
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_validation_error_status() {
        let error = ApiError::Validation("Invalid input".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[rstest]
    #[case(AuthError::UsernameTaken, StatusCode::CONFLICT)]
    #[case(AuthError::UserNotFound, StatusCode::NOT_FOUND)]
    #[case(AuthError::InvalidCredentials, StatusCode::UNAUTHORIZED)]
    #[case(AuthError::Token(TokenError::ExpiredToken), StatusCode::UNAUTHORIZED)]
    #[case(AuthError::Token(TokenError::InvalidSignature), StatusCode::UNAUTHORIZED)]
    #[case(AuthError::Token(TokenError::MalformedToken), StatusCode::UNAUTHORIZED)]
    #[case(AuthError::Storage(StoreError::Database(sqlx::Error::PoolTimedOut)), StatusCode::INTERNAL_SERVER_ERROR)]
    #[case(AuthError::Hashing(HashError::Task("cancelled".to_string())), StatusCode::INTERNAL_SERVER_ERROR)]
    fn test_auth_error_status(#[case] error: AuthError, #[case] expected: StatusCode) {
        let response = ApiError::from(error).into_response();
        assert_eq!(response.status(), expected);
    }

    #[test]
    fn test_model_unavailable_status() {
        let response = ApiError::from(ModelError::Unavailable("weather")).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_feature_mismatch_is_bad_request() {
        let error = ModelError::FeatureMismatch {
            expected: 9,
            actual: 3,
        };
        let response = ApiError::from(error).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_upstream_error_status() {
        let response = ApiError::from(GeoError::NotConfigured).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_duplicate_username_is_conflict() {
        let response = ApiError::from(StoreError::DuplicateUsername).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
