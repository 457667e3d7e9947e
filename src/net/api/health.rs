//! Liveness and greeting endpoints. Both are unauthenticated on the backend.

#[cfg(test)]
#[path = "health_test.rs"]
mod health_test;

use super::v1;
use crate::net::error::ApiError;
use crate::net::http::HttpClient;
use crate::net::types::{HealthResponse, HelloResponse};

/// # Errors
///
/// Returns the normalized error on failure.
pub async fn fetch_health(http: &HttpClient) -> Result<HealthResponse, ApiError> {
    http.get(&v1("/health")).await
}

/// Greet `name`, passed as the `name` query parameter.
///
/// # Errors
///
/// Returns the normalized error on failure.
pub async fn say_hello(http: &HttpClient, name: &str) -> Result<HelloResponse, ApiError> {
    http.get_with_query(&v1("/hello"), &[("name", name)]).await
}
