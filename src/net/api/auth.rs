//! `/auth` endpoints: login, registration, profile, provider keys, admin.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use reqwest::multipart::Form;

use super::v1;
use crate::net::error::ApiError;
use crate::net::http::HttpClient;
use crate::net::types::{ApiKey, ApiKeyPayload, LoginResponse, RegisterPayload, User, UserUpdate};
use crate::state::session::ProfileSource;

/// Provider used when none is given for API-key operations.
pub const DEFAULT_KEY_PROVIDER: &str = "qwen";

/// Exchange credentials for a token and user via `POST /auth/login`.
///
/// The backend expects an OAuth2 password form, so credentials go out as
/// multipart form fields rather than JSON. Blank credentials are rejected
/// locally without a request.
///
/// # Errors
///
/// Returns an error for blank credentials or when the backend rejects the login.
pub async fn login(http: &HttpClient, username: &str, password: &str) -> Result<LoginResponse, ApiError> {
    if username.trim().is_empty() || password.is_empty() {
        return Err(ApiError::new("username and password are required"));
    }
    let form = Form::new()
        .text("username", username.to_owned())
        .text("password", password.to_owned());
    http.post_multipart(&v1("/auth/login"), form).await
}

/// Create an account with an invite code via `POST /auth/register`.
///
/// # Errors
///
/// Returns the normalized error on failure.
pub async fn register(http: &HttpClient, payload: &RegisterPayload) -> Result<User, ApiError> {
    http.post_json(&v1("/auth/register"), payload).await
}

/// Fetch the current user via `GET /auth/me`.
///
/// # Errors
///
/// Returns the normalized error on failure, including an expired token.
pub async fn fetch_me(http: &HttpClient) -> Result<User, ApiError> {
    http.get(&v1("/auth/me")).await
}

/// Store a provider API key (admin). Provider defaults to [`DEFAULT_KEY_PROVIDER`].
///
/// # Errors
///
/// Returns the normalized error on failure.
pub async fn set_api_key(http: &HttpClient, payload: &ApiKeyPayload) -> Result<ApiKey, ApiError> {
    let body = ApiKey {
        provider: payload
            .provider
            .clone()
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| DEFAULT_KEY_PROVIDER.to_owned()),
        key: payload.key.clone(),
    };
    http.post_json(&v1("/auth/apikey"), &body).await
}

/// Read a provider API key (admin).
///
/// # Errors
///
/// Returns the normalized error on failure.
pub async fn get_api_key(http: &HttpClient, provider: Option<&str>) -> Result<ApiKey, ApiError> {
    let provider = provider.filter(|p| !p.is_empty()).unwrap_or(DEFAULT_KEY_PROVIDER);
    http.get(&v1(&format!("/auth/apikey/{provider}"))).await
}

/// List all users (admin).
///
/// # Errors
///
/// Returns the normalized error on failure.
pub async fn list_users(http: &HttpClient) -> Result<Vec<User>, ApiError> {
    http.get(&v1("/auth/users")).await
}

/// Change a user's role or allowed spaces (admin).
///
/// # Errors
///
/// Returns the normalized error on failure.
pub async fn update_user(http: &HttpClient, user_id: i64, patch: &UserUpdate) -> Result<User, ApiError> {
    http.patch_json(&v1(&format!("/auth/users/{user_id}")), patch).await
}

#[async_trait::async_trait]
impl ProfileSource for HttpClient {
    async fn fetch_profile(&self) -> Result<User, ApiError> {
        fetch_me(self).await
    }
}
