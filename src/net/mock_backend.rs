//! Canned-response backend for pipeline and resource-client tests.
//!
//! Serves on an ephemeral localhost port, records every request it sees, and
//! answers from a `(method, path)` table. Unmatched routes answer 404 with a
//! FastAPI-style `{"detail": "Not Found"}` body.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};

use crate::config::{ClientConfig, Timeouts};

#[derive(Clone, Debug)]
pub(crate) struct Recorded {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl Recorded {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or(Value::Null)
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Reply {
    status: u16,
    body: Option<Value>,
    delay: Duration,
}

impl Reply {
    pub fn json(status: u16, body: Value) -> Self {
        Self { status, body: Some(body), delay: Duration::ZERO }
    }

    pub fn empty(status: u16) -> Self {
        Self { status, body: None, delay: Duration::ZERO }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[derive(Default)]
struct MockState {
    routes: Mutex<HashMap<(String, String), Reply>>,
    recorded: Mutex<Vec<Recorded>>,
}

pub(crate) struct MockBackend {
    pub base_url: String,
    state: Arc<MockState>,
}

impl MockBackend {
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        let app = Router::new().fallback(handle).with_state(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("mock backend should bind");
        let addr = listener.local_addr().expect("mock backend addr");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        Self { base_url: format!("http://{addr}"), state }
    }

    /// Register a reply for `method path` (path without query string).
    pub fn on(&self, method: &str, path: &str, reply: Reply) -> &Self {
        self.state
            .routes
            .lock()
            .expect("routes lock")
            .insert((method.to_owned(), path.to_owned()), reply);
        self
    }

    pub fn config(&self) -> ClientConfig {
        ClientConfig::with_base_url(&self.base_url)
    }

    pub fn config_with_timeout(&self, request_secs: u64) -> ClientConfig {
        ClientConfig { timeouts: Timeouts { request_secs, connect_secs: 1 }, ..self.config() }
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.recorded.lock().expect("recorded lock").clone()
    }

    pub fn last(&self) -> Recorded {
        self.requests().pop().expect("at least one request recorded")
    }
}

async fn handle(State(state): State<Arc<MockState>>, method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Response {
    let path = uri.path().to_owned();
    state.recorded.lock().expect("recorded lock").push(Recorded {
        method: method.as_str().to_owned(),
        path: path.clone(),
        query: uri.query().map(str::to_owned),
        headers,
        body: body.to_vec(),
    });

    let reply = state
        .routes
        .lock()
        .expect("routes lock")
        .get(&(method.as_str().to_owned(), path))
        .cloned();
    let Some(reply) = reply else {
        return (StatusCode::NOT_FOUND, axum::Json(json!({ "detail": "Not Found" }))).into_response();
    };
    if !reply.delay.is_zero() {
        tokio::time::sleep(reply.delay).await;
    }
    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    match reply.body {
        Some(body) => (status, axum::Json(body)).into_response(),
        None => status.into_response(),
    }
}
