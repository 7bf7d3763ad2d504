//! Authentication error taxonomy

use crate::repositories::StoreError;
use thiserror::Error;

/// Password hashing failures
#[derive(Error, Debug)]
pub enum HashError {
    /// Stored hash is not a parseable PHC string
    #[error("Invalid hash format")]
    InvalidHashFormat,

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Hashing task failed: {0}")]
    Task(String),
}

/// Token issuance and validation failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token has expired")]
    ExpiredToken,

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token is malformed")]
    MalformedToken,

    #[error("Token lifetime must be at least one second")]
    NonPositiveTtl,

    #[error("Failed to sign token: {0}")]
    Signing(String),
}

/// Registration and login outcomes other than success
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Username already taken")]
    UsernameTaken,

    #[error("User not found")]
    UserNotFound,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error(transparent)]
    Storage(#[from] StoreError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Hashing(#[from] HashError),
}
