//! Page routes and the navigation guard.
//!
//! The guard is a pure decision over `(target, authenticated)`: Login and
//! Register are public, everything else (unknown paths included) needs a
//! token, and a logged-in user asking for Login is sent Home. Profile
//! resolution is left to the caller; see [`crate::context::AppContext::navigate`].

#[cfg(test)]
#[path = "router_test.rs"]
mod router_test;

use crate::state::session::SessionStore;

/// A known page of the app.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Register,
    Home,
    Ai,
    Couple,
    Album,
    Notes,
    Settings,
}

impl Route {
    pub const ALL: [Self; 8] =
        [Self::Login, Self::Register, Self::Home, Self::Ai, Self::Couple, Self::Album, Self::Notes, Self::Settings];

    /// Match a location path. A trailing slash and any query or fragment are
    /// ignored.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        let path = if trimmed.is_empty() { "/" } else { trimmed };
        Self::ALL.into_iter().find(|route| route.path() == path)
    }

    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Register => "/register",
            Self::Home => "/",
            Self::Ai => "/ai",
            Self::Couple => "/couple",
            Self::Album => "/album",
            Self::Notes => "/notes",
            Self::Settings => "/settings",
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Register => "Register",
            Self::Home => "Home",
            Self::Ai => "Ai",
            Self::Couple => "Couple",
            Self::Album => "Album",
            Self::Notes => "Notes",
            Self::Settings => "Settings",
        }
    }

    #[must_use]
    pub fn is_public(self) -> bool {
        matches!(self, Self::Login | Self::Register)
    }
}

/// Outcome of a guarded navigation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Navigation {
    Allow,
    Redirect(Route),
}

/// Decide a navigation. `target` is `None` for paths that match no route.
#[must_use]
pub fn decide(target: Option<Route>, authenticated: bool) -> Navigation {
    let public = target.is_some_and(Route::is_public);
    if !public && !authenticated {
        return Navigation::Redirect(Route::Login);
    }
    if authenticated && target == Some(Route::Login) {
        return Navigation::Redirect(Route::Home);
    }
    Navigation::Allow
}

/// Guard bound to a session store; reads the token at decision time.
#[derive(Clone, Debug)]
pub struct RouteGuard {
    session: SessionStore,
}

impl RouteGuard {
    #[must_use]
    pub fn new(session: SessionStore) -> Self {
        Self { session }
    }

    #[must_use]
    pub fn check(&self, path: &str) -> Navigation {
        let target = Route::from_path(path);
        let decision = decide(target, self.session.is_authenticated());
        tracing::debug!(path, ?target, ?decision, "route guard");
        decision
    }
}
