//! Application state management
//!
//! This module provides the shared application state that is passed
//! to all request handlers via Axum's state extraction.
//!
//! # Design Principles
//!
//! 1. **Pre-compute expensive resources**: token keys, models and the store
//!    handle are created once at startup
//! 2. **Cheap cloning**: All fields use Arc or are already Clone-cheap
//! 3. **Immutable after creation**: State is read-only during request handling

use crate::auth::{Clock, PasswordService, SystemClock, TokenIssuer, MAX_TOKEN_TTL_SECS};
use crate::config::AppConfig;
use crate::geo::GeoAnalytics;
use crate::inference::ModelRegistry;
use crate::repositories::CredentialStore;
use crate::services::AuthService;
use anyhow::Result;
use chrono::Duration;
use metrics_exporter_prometheus::PrometheusHandle;
use secrecy::SecretString;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Registration and login
    pub auth: AuthService,
    /// Loaded regression models
    pub models: Arc<ModelRegistry>,
    /// Geospatial analytics upstream
    pub geo: Arc<dyn GeoAnalytics>,
    /// Prometheus exporter, when installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create a new application state using the wall clock
    pub fn new(
        config: AppConfig,
        store: Arc<dyn CredentialStore>,
        models: ModelRegistry,
        geo: Arc<dyn GeoAnalytics>,
    ) -> Result<Self> {
        Self::with_clock(config, store, models, geo, Arc::new(SystemClock))
    }

    /// Create a new application state with an explicit time source
    ///
    /// # Note
    /// This derives token keys from the configured secret. Call it once at
    /// startup.
    pub fn with_clock(
        config: AppConfig,
        store: Arc<dyn CredentialStore>,
        models: ModelRegistry,
        geo: Arc<dyn GeoAnalytics>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let auth_config = &config.auth;

        let passwords = PasswordService::new(
            auth_config.argon2_memory_kib,
            auth_config.argon2_iterations,
            auth_config.argon2_parallelism,
        )?;
        anyhow::ensure!(
            (1..=MAX_TOKEN_TTL_SECS).contains(&auth_config.token_ttl_secs),
            "auth.token_ttl_secs must be between 1 and {}",
            MAX_TOKEN_TTL_SECS
        );
        let tokens = TokenIssuer::new(
            &SecretString::new(auth_config.token_secret.clone()),
            Duration::seconds(auth_config.token_ttl_secs),
            clock,
        );

        Ok(Self {
            config: Arc::new(config),
            auth: AuthService::new(store, passwords, tokens),
            models: Arc::new(models),
            geo,
            metrics: None,
        })
    }

    /// Attach the Prometheus handle rendered by `GET /metrics`
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Get a reference to the configuration
    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[inline]
    pub fn auth(&self) -> &AuthService {
        &self.auth
    }

    /// Get a reference to the token issuer
    #[inline]
    pub fn tokens(&self) -> &TokenIssuer {
        self.auth.tokens()
    }

    #[inline]
    pub fn models(&self) -> &ModelRegistry {
        &self.models
    }

    #[inline]
    pub fn geo(&self) -> &dyn GeoAnalytics {
        self.geo.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeoConfig;
    use crate::geo::HttpGeoClient;
    use crate::repositories::InMemoryCredentialStore;

    fn test_state() -> AppState {
        let mut config = AppConfig::default();
        config.auth.argon2_memory_kib = 1024;
        config.auth.argon2_iterations = 1;
        AppState::new(
            config,
            Arc::new(InMemoryCredentialStore::new()),
            ModelRegistry::empty(),
            Arc::new(HttpGeoClient::new(&GeoConfig::default()).unwrap()),
        )
        .unwrap()
    }

    #[test]
    fn test_state_clone_is_cheap() {
        // Clone should be O(1) - just Arc increments
        let state = test_state();
        let _cloned = state.clone();
    }

    #[test]
    fn test_token_issuer_is_precomputed() {
        let state = test_state();

        let user_id = uuid::Uuid::new_v4();
        let token = state.tokens().issue_default(user_id).unwrap();
        assert!(!token.access_token.is_empty());
        assert_eq!(token.expires_in(), state.config().auth.token_ttl_secs);
    }

    fn build(config: AppConfig) -> Result<AppState> {
        AppState::new(
            config,
            Arc::new(InMemoryCredentialStore::new()),
            ModelRegistry::empty(),
            Arc::new(HttpGeoClient::new(&GeoConfig::default()).unwrap()),
        )
    }

    #[test]
    fn test_invalid_argon2_config_rejected() {
        let mut config = AppConfig::default();
        config.auth.argon2_parallelism = 0;
        assert!(build(config).is_err());
    }

    #[test]
    fn test_token_ttl_out_of_range_rejected() {
        for ttl in [0, -60, MAX_TOKEN_TTL_SECS + 1, i64::MAX] {
            let mut config = AppConfig::default();
            config.auth.token_ttl_secs = ttl;
            let err = build(config).err().expect("ttl should be rejected");
            assert!(err.to_string().contains("token_ttl_secs"), "ttl {}", ttl);
        }
    }

    #[test]
    fn test_token_ttl_bounds_accepted() {
        for ttl in [1, MAX_TOKEN_TTL_SECS] {
            let mut config = AppConfig::default();
            config.auth.argon2_memory_kib = 1024;
            config.auth.argon2_iterations = 1;
            config.auth.token_ttl_secs = ttl;
            let state = build(config).unwrap();
            let token = state.tokens().issue_default(uuid::Uuid::new_v4()).unwrap();
            assert_eq!(token.expires_in(), ttl);
        }
    }
}
