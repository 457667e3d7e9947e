//! Auth-session state for the running client.
//!
//! SYSTEM CONTEXT
//! ==============
//! Single source of truth for "am I logged in, and as whom". The HTTP
//! pipeline reads the token from here on every request and the route guard
//! reads it on every navigation. One store per running client; handles are
//! cheap clones over shared state and are passed explicitly.
//!
//! PERSISTENCE
//! ===========
//! The whole session is one JSON blob under [`SESSION_STORAGE_KEY`], rewritten
//! on every mutation. Unreadable blobs load as the empty session.
//!
//! CONCURRENCY
//! ===========
//! Session fields sit behind a `std` lock that is never held across an
//! `.await`. Profile refreshes are serialized by an async lock so concurrent
//! [`SessionStore::ensure_user`] callers share one fetch.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};

use crate::net::error::ApiError;
use crate::net::types::{LoginResponse, User};
use crate::storage::Storage;

/// Storage key holding the serialized `{token, user}` blob.
pub const SESSION_STORAGE_KEY: &str = "app_auth";

/// Authenticated identity: bearer token plus cached profile.
///
/// An empty token means logged out. `user` is only set alongside a token,
/// though a token may briefly exist without a user while the profile is
/// being fetched.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    #[serde(default)]
    pub user: Option<User>,
}

impl Session {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        !self.token.is_empty()
    }

    /// Parse a stored blob. Anything unusable yields the empty session.
    #[must_use]
    pub fn from_blob(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::default();
        };
        match serde_json::from_str::<Self>(raw) {
            Ok(session) if session.is_authenticated() => session,
            Ok(_) => Self::default(),
            Err(e) => {
                tracing::warn!(error = %e, "discarding malformed stored session");
                Self::default()
            }
        }
    }
}

/// Anything able to fetch the current user's profile.
#[async_trait::async_trait]
pub trait ProfileSource: Send + Sync {
    async fn fetch_profile(&self) -> Result<User, ApiError>;
}

/// Shared handle to the session state and its durable copy.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    state: RwLock<Session>,
    storage: Arc<dyn Storage>,
    refresh: tokio::sync::Mutex<()>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.read();
        f.debug_struct("SessionStore")
            .field("authenticated", &state.is_authenticated())
            .field("user_id", &state.user.as_ref().map(|u| u.id))
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Build a store from whatever `storage` currently holds.
    pub fn load(storage: Arc<dyn Storage>) -> Self {
        let session = Session::from_blob(storage.get_item(SESSION_STORAGE_KEY).as_deref());
        tracing::debug!(
            authenticated = session.is_authenticated(),
            cached_user = session.user.is_some(),
            "session loaded"
        );
        Self {
            inner: Arc::new(StoreInner {
                state: RwLock::new(session),
                storage,
                refresh: tokio::sync::Mutex::new(()),
            }),
        }
    }

    /// Current bearer token; empty when logged out.
    #[must_use]
    pub fn token(&self) -> String {
        self.read().token.clone()
    }

    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.read().user.clone()
    }

    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.read().clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.read().is_authenticated()
    }

    /// Adopt a login result and persist it.
    pub fn set_session(&self, login: &LoginResponse) {
        let mut state = self.write();
        *state = Session { token: login.token.access_token.clone(), user: Some(login.user.clone()) };
        self.persist(&state);
        tracing::info!(user_id = login.user.id, "session established");
    }

    /// Forget the session in memory and in storage.
    pub fn clear(&self) {
        let mut state = self.write();
        *state = Session::default();
        if let Err(e) = self.inner.storage.remove_item(SESSION_STORAGE_KEY) {
            tracing::warn!(error = %e, "failed to remove stored session");
        }
        tracing::info!("session cleared");
    }

    /// Resolve a token without a cached user by fetching the profile.
    ///
    /// No-op when logged out or when the user is already cached. Any fetch
    /// failure is treated as an invalid session and clears it; nothing is
    /// returned to the caller as an error. Returns the cached user, if any,
    /// once resolution finishes.
    pub async fn ensure_user<P>(&self, source: &P) -> Option<User>
    where
        P: ProfileSource + ?Sized,
    {
        if !self.needs_profile() {
            return self.user();
        }

        let _refresh = self.inner.refresh.lock().await;
        if !self.needs_profile() {
            return self.user();
        }

        let token = self.token();
        match source.fetch_profile().await {
            Ok(user) => {
                let mut state = self.write();
                // A logout or re-login during the fetch wins over this result.
                if state.token == token {
                    state.user = Some(user);
                    self.persist(&state);
                }
                state.user.clone()
            }
            Err(e) => {
                tracing::warn!(error = %e, "profile refresh failed, clearing session");
                if self.token() == token {
                    self.clear();
                }
                self.user()
            }
        }
    }

    fn needs_profile(&self) -> bool {
        let state = self.read();
        state.is_authenticated() && state.user.is_none()
    }

    fn persist(&self, session: &Session) {
        let raw = match serde_json::to_string(session) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize session");
                return;
            }
        };
        if let Err(e) = self.inner.storage.set_item(SESSION_STORAGE_KEY, &raw) {
            tracing::warn!(error = %e, "failed to persist session");
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Session> {
        self.inner.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Session> {
        self.inner.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
