//! Registration and login
//!
//! # Performance Optimizations
//!
//! - Password hashing/verification runs on the blocking thread pool
//! - Token keys are pre-computed once in `TokenIssuer`

use crate::auth::{AuthError, HashError, IssuedToken, PasswordService, TokenIssuer};
use crate::repositories::{CredentialStore, NewUser, StoreError, User};
use metrics::counter;
use secrecy::SecretString;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Orchestrates the credential store, password hasher and token issuer
#[derive(Debug, Clone)]
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    passwords: PasswordService,
    tokens: TokenIssuer,
}

impl AuthService {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        passwords: PasswordService,
        tokens: TokenIssuer,
    ) -> Self {
        Self {
            store,
            passwords,
            tokens,
        }
    }

    #[inline]
    pub fn store(&self) -> &dyn CredentialStore {
        self.store.as_ref()
    }

    #[inline]
    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }

    /// Register a new user
    ///
    /// The up-front lookup only avoids hashing for names that are obviously
    /// taken. The store's atomic insert is what guarantees uniqueness, and a
    /// lost race reports the same `UsernameTaken` as the lookup.
    pub async fn register(
        &self,
        name: &str,
        username: &str,
        password: SecretString,
    ) -> Result<User, AuthError> {
        if self.store.find_by_username(username).await?.is_some() {
            counter!("auth_registrations_total", "outcome" => "username_taken").increment(1);
            return Err(AuthError::UsernameTaken);
        }

        let password_hash = self.passwords.hash_async(password).await?;

        let user = self
            .store
            .insert(NewUser {
                name: name.to_string(),
                username: username.to_string(),
                password_hash,
            })
            .await
            .map_err(|e| match e {
                StoreError::DuplicateUsername => {
                    counter!("auth_registrations_total", "outcome" => "username_taken")
                        .increment(1);
                    AuthError::UsernameTaken
                }
                other => AuthError::Storage(other),
            })?;

        counter!("auth_registrations_total", "outcome" => "success").increment(1);
        info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Verify credentials and issue a token with the default lifetime
    pub async fn login(&self, username: &str, password: SecretString) -> Result<IssuedToken, AuthError> {
        let Some(user) = self.store.find_by_username(username).await? else {
            counter!("auth_logins_total", "outcome" => "user_not_found").increment(1);
            return Err(AuthError::UserNotFound);
        };

        let valid = match PasswordService::verify_async(user.password_hash.clone(), password).await {
            Ok(valid) => valid,
            Err(HashError::InvalidHashFormat) => {
                // Reported to the caller as a plain credential failure
                warn!(user_id = %user.id, "Stored password hash is malformed");
                false
            }
            Err(e) => return Err(e.into()),
        };

        if !valid {
            counter!("auth_logins_total", "outcome" => "invalid_credentials").increment(1);
            debug!(user_id = %user.id, "Password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.tokens.issue_default(user.id)?;

        counter!("auth_logins_total", "outcome" => "success").increment(1);
        info!(user_id = %user.id, expires_at = %token.expires_at, "Token issued");
        Ok(token)
    }

    /// Look up the user a validated token refers to
    pub async fn profile(&self, user_id: Uuid) -> Result<User, AuthError> {
        self.store
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }
}
