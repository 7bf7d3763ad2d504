//! Common test utilities for integration tests
//!
//! Builds the full router over the in-memory credential store so the HTTP
//! surface can be exercised without a database.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, HeaderMap, Request, StatusCode},
    Router,
};
use serde_json::Value;
use smartcity_nexus_backend::{
    config::{AppConfig, GeoConfig},
    geo::HttpGeoClient,
    inference::ModelRegistry,
    repositories::InMemoryCredentialStore,
    routes,
    state::AppState,
};
use std::sync::Arc;
use tower::ServiceExt;

/// Response captured by the helpers
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or_else(|e| {
            panic!("response body is not JSON ({}): {}", e, self.body)
        })
    }
}

/// Test application wrapper
pub struct TestApp {
    pub app: Router,
    pub state: AppState,
}

impl TestApp {
    /// App with no models and no geospatial upstream
    pub fn new() -> Self {
        Self::with(ModelRegistry::empty(), GeoConfig::default())
    }

    pub fn with_models(models: ModelRegistry) -> Self {
        Self::with(models, GeoConfig::default())
    }

    pub fn with_geo(base_url: &str) -> Self {
        let geo = GeoConfig {
            base_url: base_url.to_string(),
            api_key: Some("test-geo-key".to_string()),
            timeout_secs: 5,
        };
        Self::with(ModelRegistry::empty(), geo)
    }

    pub fn with(models: ModelRegistry, geo: GeoConfig) -> Self {
        let config = test_config(geo);
        let geo = HttpGeoClient::new(&config.geo).expect("Failed to build geo client");
        let state = AppState::new(
            config,
            Arc::new(InMemoryCredentialStore::new()),
            models,
            Arc::new(geo),
        )
        .expect("Failed to build app state");
        let app = routes::create_router(state.clone());

        Self { app, state }
    }

    /// Send a request through the router
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        TestResponse {
            status,
            headers,
            body: String::from_utf8(body.to_vec()).unwrap(),
        }
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    /// Make a GET request with a bearer token
    pub async fn get_auth(&self, path: &str, token: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    /// Make a GET request carrying a cookie header
    pub async fn get_with_cookie(&self, path: &str, cookie: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .header(header::COOKIE, cookie)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    /// Make a POST request with JSON body
    pub async fn post_json(&self, path: &str, body: &Value) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// Make a POST request with a urlencoded form body
    pub async fn post_form(&self, path: &str, fields: &[(&str, &str)]) -> TestResponse {
        let body = fields
            .iter()
            .map(|(k, v)| format!("{}={}", k, form_encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    /// Register then log in, returning the access token
    pub async fn register_and_login(&self, username: &str, password: &str) -> String {
        let registered = self
            .post_form(
                "/user",
                &[("name", "Test User"), ("username", username), ("password", password)],
            )
            .await;
        assert_eq!(registered.status, StatusCode::CREATED, "{}", registered.body);

        let login = self
            .post_form("/token", &[("username", username), ("password", password)])
            .await;
        assert_eq!(login.status, StatusCode::OK, "{}", login.body);

        login.json()["access_token"]
            .as_str()
            .expect("access_token missing")
            .to_string()
    }
}

fn form_encode(value: &str) -> String {
    value
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                (b as char).to_string()
            }
            _ => format!("%{:02X}", b),
        })
        .collect()
}

fn test_config(geo: GeoConfig) -> AppConfig {
    let mut config = AppConfig::default();
    config.auth.token_secret = "test-secret-key-for-testing-only-32chars".to_string();
    // Cheap hashing keeps the suite fast
    config.auth.argon2_memory_kib = 1024;
    config.auth.argon2_iterations = 1;
    config.geo = geo;
    config
}
