use std::sync::Arc;

use super::*;
use crate::net::types::{LoginResponse, Token, User};
use crate::storage::MemoryStorage;

fn login_response() -> LoginResponse {
    LoginResponse {
        token: Token { access_token: "abc".to_owned(), token_type: "bearer".to_owned() },
        user: User {
            id: 1,
            email: "a@example.com".to_owned(),
            is_active: true,
            is_admin: false,
            role: None,
            allowed_spaces: None,
        },
    }
}

#[test]
fn from_path_matches_known_routes() {
    for route in Route::ALL {
        assert_eq!(Route::from_path(route.path()), Some(route));
    }
    assert_eq!(Route::from_path("/notes/"), Some(Route::Notes));
    assert_eq!(Route::from_path("/album?tab=recent"), Some(Route::Album));
    assert_eq!(Route::from_path(""), Some(Route::Home));
    assert_eq!(Route::from_path("/nowhere"), None);
}

#[test]
fn only_login_and_register_are_public() {
    let public: Vec<Route> = Route::ALL.into_iter().filter(|r| r.is_public()).collect();
    assert_eq!(public, vec![Route::Login, Route::Register]);
}

#[test]
fn anonymous_user_is_sent_to_login_from_private_pages() {
    for route in Route::ALL.into_iter().filter(|r| !r.is_public()) {
        assert_eq!(decide(Some(route), false), Navigation::Redirect(Route::Login), "{route:?}");
    }
}

#[test]
fn anonymous_user_may_open_public_pages() {
    assert_eq!(decide(Some(Route::Login), false), Navigation::Allow);
    assert_eq!(decide(Some(Route::Register), false), Navigation::Allow);
}

#[test]
fn authenticated_user_on_login_goes_home() {
    assert_eq!(decide(Some(Route::Login), true), Navigation::Redirect(Route::Home));
}

#[test]
fn authenticated_user_may_open_register_and_private_pages() {
    assert_eq!(decide(Some(Route::Register), true), Navigation::Allow);
    for route in Route::ALL.into_iter().filter(|r| !r.is_public()) {
        assert_eq!(decide(Some(route), true), Navigation::Allow, "{route:?}");
    }
}

#[test]
fn unknown_paths_are_treated_as_private() {
    assert_eq!(decide(None, false), Navigation::Redirect(Route::Login));
    assert_eq!(decide(None, true), Navigation::Allow);
}

#[test]
fn guard_follows_session_changes() {
    let session = SessionStore::load(Arc::new(MemoryStorage::new()));
    let guard = RouteGuard::new(session.clone());

    assert_eq!(guard.check("/ai"), Navigation::Redirect(Route::Login));
    session.set_session(&login_response());
    assert_eq!(guard.check("/ai"), Navigation::Allow);
    assert_eq!(guard.check("/login"), Navigation::Redirect(Route::Home));
    session.clear();
    assert_eq!(guard.check("/settings"), Navigation::Redirect(Route::Login));
}
