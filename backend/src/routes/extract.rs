//! Body extractor accepting either a urlencoded form or JSON

use crate::error::ApiError;
use axum::{
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
    Form, Json,
};
use serde::de::DeserializeOwned;

/// Deserializes `T` from a JSON body when the content type says so,
/// otherwise from a urlencoded form.
#[derive(Debug, Clone)]
pub struct FormOrJson<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for FormOrJson<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.trim_start().starts_with("application/json"))
            .unwrap_or(false);

        if is_json {
            let Json(value) = Json::<T>::from_request(req, state)
                .await
                .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
            Ok(FormOrJson(value))
        } else {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
            Ok(FormOrJson(value))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Credentials {
        username: String,
        password: String,
    }

    async fn extract(content_type: &str, body: &str) -> Result<Credentials, ApiError> {
        let request = Request::builder()
            .method("POST")
            .uri("/token")
            .header(CONTENT_TYPE, content_type)
            .body(Body::from(body.to_string()))
            .unwrap();

        FormOrJson::<Credentials>::from_request(request, &())
            .await
            .map(|FormOrJson(value)| value)
    }

    #[tokio::test]
    async fn test_form_body() {
        let creds = extract(
            "application/x-www-form-urlencoded",
            "username=alice&password=pw%26123",
        )
        .await
        .unwrap();
        assert_eq!(creds.username, "alice");
        assert_eq!(creds.password, "pw&123");
    }

    #[tokio::test]
    async fn test_json_body() {
        let creds = extract(
            "application/json; charset=utf-8",
            r#"{"username": "alice", "password": "pw123"}"#,
        )
        .await
        .unwrap();
        assert_eq!(creds.username, "alice");
    }

    #[tokio::test]
    async fn test_missing_field_is_bad_request() {
        let result = extract("application/json", r#"{"username": "alice"}"#).await;
        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }
}
