//! Backend networking: HTTP pipeline, hooks, wire types, resource clients.
//!
//! SYSTEM CONTEXT
//! ==============
//! Everything the client says to the backend goes through [`http::HttpClient`].
//! The resource functions in [`api`] are thin, one-request wrappers over it;
//! the hook chain in [`middleware`] attaches the session's bearer token and
//! turns every failure into a single [`error::ApiError`].

pub mod api;
pub mod error;
pub mod http;
pub mod middleware;
pub mod types;

#[cfg(test)]
pub(crate) mod mock_backend;
