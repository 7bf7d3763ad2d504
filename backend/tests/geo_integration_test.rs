//! Integration tests for the land-cover proxy against a mock upstream

mod common;

use axum::http::StatusCode;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn upstream_report() -> serde_json::Value {
    json!({
        "image_url": "https://tiles.example/land-cover/abc.png",
        "population_data": {
            "date": ["2020", "2021", "2022"],
            "pop": [1000.0, 1050.0, 1100.0],
            "change": [0.0, 5.0, 4.76]
        },
        "built_area_data": {
            "date": ["2020", "2021", "2022"],
            "area": [12.5, 12.9, 13.4],
            "change": [0.0, 3.2, 3.88]
        }
    })
}

#[tokio::test]
async fn test_process_forwards_bounds() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/land-cover"))
        .and(header("authorization", "Bearer test-geo-key"))
        .and(body_json(json!({ "bbox": [7.5, 47.5, 7.7, 47.6] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(upstream_report()))
        .expect(1)
        .mount(&server)
        .await;

    let app = common::TestApp::with_geo(&server.uri());
    let response = app
        .post_json("/process", &json!({ "bounds": [7.5, 47.5, 7.7, 47.6] }))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json(), upstream_report());
}

#[tokio::test]
async fn test_process_upstream_failure_is_bad_gateway() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/land-cover"))
        .respond_with(ResponseTemplate::new(500).set_body_string("engine exploded"))
        .mount(&server)
        .await;

    let app = common::TestApp::with_geo(&server.uri());
    let response = app
        .post_json("/process", &json!({ "bounds": [7.5, 47.5, 7.7, 47.6] }))
        .await;

    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
    assert_eq!(response.json()["error"]["code"], "UPSTREAM_ERROR");
    // Upstream detail stays in the logs
    assert!(!response.body.contains("engine exploded"));
}

#[tokio::test]
async fn test_process_malformed_upstream_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/land-cover"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "unexpected": true })))
        .mount(&server)
        .await;

    let app = common::TestApp::with_geo(&server.uri());
    let response = app
        .post_json("/process", &json!({ "bounds": [7.5, 47.5, 7.7, 47.6] }))
        .await;

    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_process_rejects_inverted_bounds() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(upstream_report()))
        .expect(0)
        .mount(&server)
        .await;

    let app = common::TestApp::with_geo(&server.uri());
    let response = app
        .post_json("/process", &json!({ "bounds": [7.7, 47.5, 7.5, 47.6] }))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_process_rejects_out_of_range_latitude() {
    let app = common::TestApp::new();

    let response = app
        .post_json("/process", &json!({ "bounds": [7.5, 47.5, 7.7, 95.0] }))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_process_without_upstream_configured() {
    let app = common::TestApp::new();

    let response = app
        .post_json("/process", &json!({ "bounds": [7.5, 47.5, 7.7, 47.6] }))
        .await;

    assert_eq!(response.status, StatusCode::BAD_GATEWAY);
}
