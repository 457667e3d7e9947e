//! `/spaces` endpoints: AI chat and image generation plus saved sessions.
//!
//! Chat and image calls can take tens of seconds upstream; they rely on the
//! client-wide request timeout rather than their own.

#[cfg(test)]
#[path = "spaces_test.rs"]
mod spaces_test;

use super::v1;
use crate::net::error::ApiError;
use crate::net::http::HttpClient;
use crate::net::types::{ChatMessage, ChatRequest, ChatResponse, ChatSession, ChatSessionCreate, ImageRequest, ImageResponse};

/// # Errors
///
/// Returns the normalized error on failure.
pub async fn chat(http: &HttpClient, request: &ChatRequest) -> Result<ChatResponse, ApiError> {
    http.post_json(&v1("/spaces/ai/chat"), request).await
}

/// # Errors
///
/// Returns the normalized error on failure.
pub async fn generate_image(http: &HttpClient, request: &ImageRequest) -> Result<ImageResponse, ApiError> {
    http.post_json(&v1("/spaces/ai/image"), request).await
}

/// # Errors
///
/// Returns the normalized error on failure.
pub async fn list_sessions(http: &HttpClient) -> Result<Vec<ChatSession>, ApiError> {
    http.get(&v1("/spaces/sessions")).await
}

/// # Errors
///
/// Returns the normalized error on failure.
pub async fn create_session(http: &HttpClient, payload: &ChatSessionCreate) -> Result<ChatSession, ApiError> {
    http.post_json(&v1("/spaces/sessions"), payload).await
}

/// # Errors
///
/// Returns the normalized error on failure.
pub async fn list_session_messages(http: &HttpClient, session_id: i64) -> Result<Vec<ChatMessage>, ApiError> {
    http.get(&v1(&format!("/spaces/sessions/{session_id}/messages"))).await
}

/// Pin or unpin a session. The flag travels as the `is_pinned` query
/// parameter; the request has no body.
///
/// # Errors
///
/// Returns the normalized error on failure.
pub async fn set_session_pin(http: &HttpClient, session_id: i64, is_pinned: bool) -> Result<ChatSession, ApiError> {
    http.post_query(&v1(&format!("/spaces/sessions/{session_id}/pin")), &[("is_pinned", is_pinned)])
        .await
}

/// # Errors
///
/// Returns the normalized error on failure.
pub async fn delete_session(http: &HttpClient, session_id: i64) -> Result<(), ApiError> {
    http.delete(&v1(&format!("/spaces/sessions/{session_id}"))).await
}
