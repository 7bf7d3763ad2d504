//! Password hashing using argon2
//!
//! Provides secure password hashing and verification.
//!
//! # Performance Considerations
//!
//! Argon2 is intentionally CPU- and memory-intensive. Request handlers go
//! through the `*_async` variants, which run on the blocking thread pool.

use super::error::HashError;
use argon2::{
    password_hash::{
        rand_core::OsRng, Error as PhcError, PasswordHash, PasswordHasher, PasswordVerifier,
        SaltString,
    },
    Algorithm, Argon2, Params, Version,
};
use secrecy::{ExposeSecret, SecretString};

/// Password hashing service
///
/// Uses Argon2id with configurable cost. The produced PHC string embeds the
/// algorithm, parameters and salt, so verification does not depend on the
/// parameters this service was built with.
#[derive(Debug, Clone)]
pub struct PasswordService {
    params: Params,
}

impl PasswordService {
    /// Create a service with the given Argon2 cost parameters
    pub fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Result<Self, HashError> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| HashError::Hashing(format!("Invalid argon2 parameters: {}", e)))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a password (blocking operation)
    pub fn hash(&self, password: &str) -> Result<String, HashError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| HashError::Hashing(e.to_string()))?;
        Ok(hash.to_string())
    }

    /// Hash a password on the blocking thread pool
    pub async fn hash_async(&self, password: SecretString) -> Result<String, HashError> {
        let service = self.clone();
        tokio::task::spawn_blocking(move || service.hash(password.expose_secret()))
            .await
            .map_err(|e| HashError::Task(e.to_string()))?
    }

    /// Verify a password against a stored hash (blocking operation)
    ///
    /// A mismatch is `Ok(false)`. Only an unparseable hash is an error.
    pub fn verify(hash: &str, password: &str) -> Result<bool, HashError> {
        let parsed_hash = PasswordHash::new(hash).map_err(|_| HashError::InvalidHashFormat)?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(PhcError::Password) => Ok(false),
            Err(_) => Err(HashError::InvalidHashFormat),
        }
    }

    /// Verify a password on the blocking thread pool
    pub async fn verify_async(hash: String, password: SecretString) -> Result<bool, HashError> {
        tokio::task::spawn_blocking(move || Self::verify(&hash, password.expose_secret()))
            .await
            .map_err(|e| HashError::Task(e.to_string()))?
    }
}
