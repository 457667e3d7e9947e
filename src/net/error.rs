//! Normalized request error.
//!
//! ERROR HANDLING
//! ==============
//! Every failure that leaves the HTTP pipeline (transport errors, non-2xx
//! statuses, undecodable bodies) collapses into one [`ApiError`] carrying a
//! single human-readable message. Callers never match on transport shapes.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use serde_json::Value;

/// Last-resort message when neither the body nor the transport says anything.
pub const GENERIC_FAILURE: &str = "Request failed";

/// Error surfaced by every resource client call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    message: String,
}

impl ApiError {
    /// Build an error from a message; blank messages become [`GENERIC_FAILURE`].
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            return Self { message: GENERIC_FAILURE.to_owned() };
        }
        Self { message }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Wrap a transport-level failure (connect, timeout, body read).
    #[must_use]
    pub fn from_transport(error: &reqwest::Error) -> Self {
        Self::new(error.to_string())
    }

    /// Build the error for a non-success HTTP status.
    ///
    /// Prefers the body's `detail` string, then the status-derived transport
    /// message.
    #[must_use]
    pub fn from_status(status: u16, body: &[u8]) -> Self {
        match extract_detail(body) {
            Some(detail) => Self::new(detail),
            None => Self::new(status_failure_message(status)),
        }
    }
}

/// Pull a non-empty `detail` string out of a JSON error body.
#[must_use]
pub fn extract_detail(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    value
        .get("detail")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

fn status_failure_message(status: u16) -> String {
    format!("Request failed with status code {status}")
}
