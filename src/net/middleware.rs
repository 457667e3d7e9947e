//! Request/response hooks composed into the HTTP pipeline.
//!
//! ARCHITECTURE
//! ============
//! Request hooks rewrite an outgoing `reqwest::Request` before it is sent.
//! Response hooks see the outcome of the send, either a response or an
//! already-normalized transport error, and may replace it. Both lists run in
//! the order they were registered on the client builder.

#[cfg(test)]
#[path = "middleware_test.rs"]
mod middleware_test;

use reqwest::header::{AUTHORIZATION, HeaderValue};

use super::error::ApiError;
use crate::state::session::SessionStore;

/// Outcome passed through the response hook chain.
pub type Outcome = Result<reqwest::Response, ApiError>;

/// Rewrites an outgoing request.
pub trait RequestHook: Send + Sync {
    fn on_request(&self, request: reqwest::Request) -> reqwest::Request;
}

/// Inspects or replaces the outcome of a request.
#[async_trait::async_trait]
pub trait ResponseHook: Send + Sync {
    async fn on_response(&self, outcome: Outcome) -> Outcome;
}

// =============================================================================
// BEARER AUTH
// =============================================================================

/// Attaches `Authorization: Bearer <token>` from the session store.
///
/// Without a store, or with an empty token, the request goes out without a
/// credential. An `Authorization` header set explicitly by the caller is kept.
#[derive(Clone, Debug, Default)]
pub struct BearerAuth {
    session: Option<SessionStore>,
}

impl BearerAuth {
    #[must_use]
    pub fn new(session: Option<SessionStore>) -> Self {
        Self { session }
    }
}

impl RequestHook for BearerAuth {
    fn on_request(&self, mut request: reqwest::Request) -> reqwest::Request {
        if request.headers().contains_key(AUTHORIZATION) {
            return request;
        }
        let Some(session) = &self.session else {
            return request;
        };
        let token = session.token();
        if token.is_empty() {
            return request;
        }
        match HeaderValue::from_str(&format!("Bearer {token}")) {
            Ok(mut value) => {
                value.set_sensitive(true);
                request.headers_mut().insert(AUTHORIZATION, value);
            }
            Err(e) => tracing::warn!(error = %e, "stored token is not a valid header value"),
        }
        request
    }
}

// =============================================================================
// TRACING
// =============================================================================

/// Debug-level request/response logging.
#[derive(Clone, Copy, Debug, Default)]
pub struct RequestTrace;

impl RequestHook for RequestTrace {
    fn on_request(&self, request: reqwest::Request) -> reqwest::Request {
        tracing::debug!(
            method = %request.method(),
            path = request.url().path(),
            authenticated = request.headers().contains_key(AUTHORIZATION),
            "http request"
        );
        request
    }
}

#[async_trait::async_trait]
impl ResponseHook for RequestTrace {
    async fn on_response(&self, outcome: Outcome) -> Outcome {
        match &outcome {
            Ok(response) => {
                tracing::debug!(status = response.status().as_u16(), path = response.url().path(), "http response");
            }
            Err(e) => tracing::debug!(error = %e, "http transport failure"),
        }
        outcome
    }
}

// =============================================================================
// ERROR NORMALIZATION
// =============================================================================

/// Turns non-success responses into [`ApiError`]s.
///
/// Message preference: body `detail` string, then the status-derived
/// transport message, then [`super::error::GENERIC_FAILURE`].
#[derive(Clone, Copy, Debug, Default)]
pub struct NormalizeErrors;

#[async_trait::async_trait]
impl ResponseHook for NormalizeErrors {
    async fn on_response(&self, outcome: Outcome) -> Outcome {
        let response = outcome?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.bytes().await.unwrap_or_default();
        let error = ApiError::from_status(status.as_u16(), &body);
        tracing::debug!(status = status.as_u16(), error = %error, "request rejected");
        Err(error)
    }
}
