//! Geospatial analytics proxy
//!
//! Forwards a bounding box to the configured analytics service and returns
//! its land-cover report unchanged. Every failure surfaces as
//! `GeoError::Upstream`; nothing is retried.

use crate::config::GeoConfig;
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use smartcity_nexus_shared::types::{BoundingBox, LandCoverReport};
use std::fmt::Debug;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum GeoError {
    #[error("Geospatial service error: {0}")]
    Upstream(String),

    #[error("Geospatial service is not configured")]
    NotConfigured,
}

/// Remote land-cover analysis
#[async_trait]
pub trait GeoAnalytics: Send + Sync + Debug {
    async fn land_cover(&self, bbox: BoundingBox) -> Result<LandCoverReport, GeoError>;
}

#[derive(Serialize)]
struct LandCoverQuery {
    bbox: [f64; 4],
}

/// reqwest-based client for the analytics service
pub struct HttpGeoClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<SecretString>,
}

impl Debug for HttpGeoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpGeoClient")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[hidden]"))
            .finish()
    }
}

impl HttpGeoClient {
    pub fn new(config: &GeoConfig) -> Result<Self, GeoError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GeoError::Upstream(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone().map(SecretString::new),
        })
    }
}

#[async_trait]
impl GeoAnalytics for HttpGeoClient {
    async fn land_cover(&self, bbox: BoundingBox) -> Result<LandCoverReport, GeoError> {
        if self.base_url.is_empty() {
            return Err(GeoError::NotConfigured);
        }

        let url = format!("{}/land-cover", self.base_url);
        debug!(url = %url, ?bbox, "Requesting land-cover analysis");

        let mut request = self.client.post(&url).json(&LandCoverQuery {
            bbox: bbox.to_array(),
        });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key.expose_secret());
        }

        let response = request
            .send()
            .await
            .map_err(|e| GeoError::Upstream(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(%status, "Geospatial service returned an error");
            return Err(GeoError::Upstream(format!("HTTP {}: {}", status, body)));
        }

        response
            .json::<LandCoverReport>()
            .await
            .map_err(|e| GeoError::Upstream(format!("Failed to parse response: {}", e)))
    }
}
