//! Fake backend for end-to-end flows: real routes, one known account.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::extract::{Multipart, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;

pub const EMAIL: &str = "ada@example.com";
pub const PASSWORD: &str = "correct horse";
pub const TOKEN: &str = "tok-ada";

#[derive(Default)]
pub struct Counters {
    pub me_calls: AtomicUsize,
}

pub struct FakeBackend {
    pub base_url: String,
    pub counters: Arc<Counters>,
}

impl FakeBackend {
    pub async fn start() -> Self {
        let counters = Arc::new(Counters::default());
        let app = Router::new()
            .route("/api/v1/auth/login", post(login))
            .route("/api/v1/auth/me", get(me))
            .route("/api/v1/health", get(health))
            .with_state(counters.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind fake backend");
        let addr = listener.local_addr().expect("fake backend addr");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        Self { base_url: format!("http://{addr}"), counters }
    }

    pub fn me_calls(&self) -> usize {
        self.counters.me_calls.load(Ordering::SeqCst)
    }
}

fn user() -> serde_json::Value {
    json!({ "id": 1, "email": EMAIL, "is_active": true, "is_admin": false, "role": "member" })
}

async fn login(mut form: Multipart) -> Response {
    let mut username = String::new();
    let mut password = String::new();
    while let Ok(Some(field)) = form.next_field().await {
        let name = field.name().unwrap_or_default().to_owned();
        let value = field.text().await.unwrap_or_default();
        match name.as_str() {
            "username" => username = value,
            "password" => password = value,
            _ => {}
        }
    }
    if username == EMAIL && password == PASSWORD {
        Json(json!({ "token": { "access_token": TOKEN, "token_type": "bearer" }, "user": user() })).into_response()
    } else {
        (StatusCode::BAD_REQUEST, Json(json!({ "detail": "invalid credentials" }))).into_response()
    }
}

async fn me(State(counters): State<Arc<Counters>>, headers: HeaderMap) -> Response {
    counters.me_calls.fetch_add(1, Ordering::SeqCst);
    let expected = format!("Bearer {TOKEN}");
    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == expected);
    if authorized {
        Json(user()).into_response()
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({ "detail": "Could not validate credentials" }))).into_response()
    }
}

async fn health() -> Response {
    StatusCode::SERVICE_UNAVAILABLE.into_response()
}
