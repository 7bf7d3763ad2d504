//! Authentication routes
//!
//! `POST /user` registers, `POST /token` logs in and `GET /me` returns the
//! caller's profile.
//!
//! # Performance Optimizations
//!
//! - Uses pre-computed token keys from AppState (no per-request allocation)
//! - Password hashing runs on blocking thread pool (doesn't block async runtime)

use super::extract::FormOrJson;
use crate::auth::{AuthUser, IssuedToken};
use crate::config::CookieConfig;
use crate::error::{ApiError, ApiResult};
use crate::repositories::User;
use crate::state::AppState;
use axum::{
    extract::State,
    http::{header::SET_COOKIE, StatusCode},
    response::IntoResponse,
    Json,
};
use secrecy::SecretString;
use smartcity_nexus_shared::types::{LoginRequest, RegisterRequest, TokenResponse, UserProfile};
use smartcity_nexus_shared::validation::validate_username;
use validator::Validate;

/// Register a new user
///
/// POST /user
pub async fn register(
    State(state): State<AppState>,
    FormOrJson(req): FormOrJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<UserProfile>)> {
    req.validate()?;
    validate_username(&req.username).map_err(ApiError::Validation)?;

    let user = state
        .auth()
        .register(&req.name, &req.username, SecretString::new(req.password))
        .await?;

    Ok((StatusCode::CREATED, Json(to_profile(user))))
}

/// Exchange username and password for a bearer token
///
/// POST /token
///
/// The token is returned in the body and also set as a cookie whose
/// lifetime matches the token's.
pub async fn login(
    State(state): State<AppState>,
    FormOrJson(req): FormOrJson<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    req.validate()?;

    let token = state
        .auth()
        .login(&req.username, SecretString::new(req.password))
        .await?;

    let cookie = session_cookie(&state.config().cookie, &token);
    let body = TokenResponse {
        expires_in: token.expires_in(),
        access_token: token.access_token,
        token_type: token.token_type.to_string(),
        expires_at: token.expires_at,
    };

    Ok(([(SET_COOKIE, cookie)], Json(body)))
}

/// Get current user profile (requires authentication)
///
/// GET /me
///
/// # Authentication
/// Requires a valid token in the Authorization header or session cookie.
pub async fn current_user(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> ApiResult<Json<UserProfile>> {
    let user = state.auth().profile(auth_user.user_id).await?;
    Ok(Json(to_profile(user)))
}

fn to_profile(user: User) -> UserProfile {
    UserProfile {
        id: user.id,
        name: user.name,
        username: user.username,
        created_at: user.created_at,
    }
}

/// `Set-Cookie` value carrying the token
fn session_cookie(config: &CookieConfig, token: &IssuedToken) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; Max-Age={}; SameSite={}",
        config.name,
        token.access_token,
        token.expires_in(),
        config.same_site.as_str()
    );
    if config.secure {
        cookie.push_str("; Secure");
    }
    if config.http_only {
        cookie.push_str("; HttpOnly");
    }
    cookie
}
