//! Per-client wiring of session, HTTP pipeline, and route guard.
//!
//! SYSTEM CONTEXT
//! ==============
//! One `AppContext` per running client. It owns the [`SessionStore`], builds
//! the [`HttpClient`] so the bearer hook reads that store, and exposes the
//! user-level flows (login, logout, profile resolution, navigation) that
//! touch more than one of them.
//!
//! ERROR HANDLING
//! ==============
//! Flow failures surface as [`ApiError`] with the server's message. A failed
//! login never touches the session. A failed profile fetch clears it and is
//! reported only through the resulting navigation decision.

#[cfg(test)]
#[path = "context_test.rs"]
mod context_test;

use std::sync::Arc;

use crate::config::ClientConfig;
use crate::net::api::auth;
use crate::net::error::ApiError;
use crate::net::http::HttpClient;
use crate::net::types::{RegisterPayload, User};
use crate::router::{Navigation, Route, RouteGuard};
use crate::state::session::SessionStore;
use crate::storage::Storage;

#[derive(Clone, Debug)]
pub struct AppContext {
    config: ClientConfig,
    session: SessionStore,
    http: HttpClient,
    guard: RouteGuard,
}

impl AppContext {
    /// Load the persisted session from `storage` and build the pipeline on it.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: ClientConfig, storage: Arc<dyn Storage>) -> Result<Self, ApiError> {
        let session = SessionStore::load(storage);
        let http = HttpClient::new(&config, Some(session.clone()))?;
        let guard = RouteGuard::new(session.clone());
        tracing::debug!(base_url = %config.api_base_url, "app context ready");
        Ok(Self { config, session, http, guard })
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    #[must_use]
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    #[must_use]
    pub fn guard(&self) -> &RouteGuard {
        &self.guard
    }

    /// Log in and adopt the returned session.
    ///
    /// # Errors
    ///
    /// Returns the server's message (or a local validation message); the
    /// session is left as it was.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, ApiError> {
        let response = auth::login(&self.http, username, password).await?;
        self.session.set_session(&response);
        Ok(response.user)
    }

    /// Create an account. The backend returns the user, not a token, so the
    /// session is unchanged; log in afterwards.
    ///
    /// # Errors
    ///
    /// Returns the server's message on failure.
    pub async fn register(&self, payload: &RegisterPayload) -> Result<User, ApiError> {
        let user = auth::register(&self.http, payload).await?;
        tracing::info!(user_id = user.id, "account registered");
        Ok(user)
    }

    pub fn logout(&self) {
        self.session.clear();
    }

    /// Resolve the profile for a token loaded without a user.
    pub async fn ensure_user(&self) -> Option<User> {
        self.session.ensure_user(&self.http).await
    }

    /// Guarded navigation to `path`.
    ///
    /// When the decision lands on a private page the profile is resolved
    /// afterwards; if that clears the session the navigation is re-decided
    /// and ends at Login.
    pub async fn navigate(&self, path: &str) -> Navigation {
        let decision = self.guard.check(path);
        let landing = match decision {
            Navigation::Allow => Route::from_path(path),
            Navigation::Redirect(route) => Some(route),
        };
        if landing.is_some_and(Route::is_public) {
            return decision;
        }

        self.ensure_user().await;
        if self.session.is_authenticated() {
            decision
        } else {
            tracing::info!(path, "session invalid after profile check, redirecting to login");
            self.guard.check(path)
        }
    }
}
