//! Typed resource clients, one function per backend operation.
//!
//! Each function performs exactly one request through the shared
//! [`HttpClient`](super::http::HttpClient) and returns the decoded body.
//! Failures are the pipeline's [`ApiError`](super::error::ApiError),
//! propagated unchanged.

pub mod auth;
pub mod couples;
pub mod health;
pub mod media;
pub mod spaces;

/// Versioned prefix every backend route lives under.
pub const API_V1: &str = "/api/v1";

fn v1(path: &str) -> String {
    format!("{API_V1}{path}")
}
