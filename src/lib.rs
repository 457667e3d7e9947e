//! Client for the couples app backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! The backend is a REST API under `/api/v1` (auth, AI spaces, couple
//! collections, media, health). This crate holds the client side of it:
//!
//! - [`state::session::SessionStore`]: token and cached user, persisted
//!   through a [`storage::Storage`] implementation.
//! - [`net::http::HttpClient`]: the single request pipeline, with bearer
//!   auth and error normalization as hooks.
//! - [`net::api`]: one typed function per backend operation.
//! - [`router::RouteGuard`]: page access decisions from session state.
//! - [`context::AppContext`]: wires the above together for one client.

pub mod config;
pub mod context;
pub mod net;
pub mod router;
pub mod state;
pub mod storage;

pub use config::ClientConfig;
pub use context::AppContext;
pub use net::error::ApiError;
pub use net::http::HttpClient;
pub use router::{Navigation, Route, RouteGuard};
pub use state::session::{Session, SessionStore};
pub use storage::{FileStorage, MemoryStorage, Storage};
