use super::*;
use crate::net::mock_backend::{MockBackend, Reply};
use crate::net::types::{LoginResponse, Token, User};
use crate::storage::MemoryStorage;
use serde_json::{Value, json};
use std::sync::atomic::{AtomicUsize, Ordering};

fn session_with(token: &str) -> SessionStore {
    let store = SessionStore::load(Arc::new(MemoryStorage::new()));
    if !token.is_empty() {
        store.set_session(&LoginResponse {
            token: Token { access_token: token.into(), token_type: "bearer".into() },
            user: User {
                id: 1,
                email: "a@example.com".into(),
                is_active: true,
                is_admin: false,
                role: None,
                allowed_spaces: None,
            },
        });
    }
    store
}

#[test]
fn url_joins_base_and_path() {
    let client = HttpClient::new(&ClientConfig::with_base_url("http://h:1/api/"), None).unwrap();
    assert_eq!(client.base_url(), "http://h:1/api");
    assert_eq!(client.url("/api/v1/health"), "http://h:1/api/api/v1/health");
    assert_eq!(client.url("x"), "http://h:1/api/x");
}

#[tokio::test]
async fn request_carries_bearer_token_from_session() {
    let backend = MockBackend::start().await;
    backend.on("GET", "/ping", Reply::json(200, json!({ "ok": true })));
    let client = HttpClient::new(&backend.config(), Some(session_with("abc"))).unwrap();

    let _: Value = client.get("/ping").await.unwrap();
    assert_eq!(backend.last().header("authorization"), Some("Bearer abc"));
}

#[tokio::test]
async fn request_without_token_has_no_authorization() {
    let backend = MockBackend::start().await;
    backend.on("GET", "/ping", Reply::json(200, json!({ "ok": true })));
    let client = HttpClient::new(&backend.config(), Some(session_with(""))).unwrap();

    let _: Value = client.get("/ping").await.unwrap();
    assert_eq!(backend.last().header("authorization"), None);
}

#[tokio::test]
async fn token_change_applies_to_next_request() {
    let backend = MockBackend::start().await;
    backend.on("GET", "/ping", Reply::json(200, json!({})));
    let session = session_with("");
    let client = HttpClient::new(&backend.config(), Some(session.clone())).unwrap();

    let _: Value = client.get("/ping").await.unwrap();
    session.set_session(&LoginResponse {
        token: Token { access_token: "fresh".into(), token_type: "bearer".into() },
        user: session_with("x").user().unwrap(),
    });
    let _: Value = client.get("/ping").await.unwrap();

    let seen = backend.requests();
    assert_eq!(seen[0].header("authorization"), None);
    assert_eq!(seen[1].header("authorization"), Some("Bearer fresh"));
}

#[tokio::test]
async fn json_body_sets_content_type() {
    let backend = MockBackend::start().await;
    backend.on("POST", "/echo", Reply::json(200, json!({ "id": 1 })));
    let client = HttpClient::new(&backend.config(), None).unwrap();

    let _: Value = client.post_json("/echo", &json!({ "title": "t" })).await.unwrap();
    let seen = backend.last();
    assert_eq!(seen.header("content-type"), Some("application/json"));
    assert_eq!(seen.json(), json!({ "title": "t" }));
}

#[tokio::test]
async fn detail_body_becomes_error_message() {
    let backend = MockBackend::start().await;
    backend.on("POST", "/login", Reply::json(401, json!({ "detail": "invalid credentials" })));
    let client = HttpClient::new(&backend.config(), None).unwrap();

    let err = client.post_json::<_, Value>("/login", &json!({})).await.unwrap_err();
    assert_eq!(err.message(), "invalid credentials");
}

#[tokio::test]
async fn bodyless_failure_uses_transport_message() {
    let backend = MockBackend::start().await;
    backend.on("GET", "/boom", Reply::empty(500));
    let client = HttpClient::new(&backend.config(), None).unwrap();

    let err = client.get::<Value>("/boom").await.unwrap_err();
    assert_eq!(err.message(), "Request failed with status code 500");
}

#[tokio::test]
async fn unreachable_server_surfaces_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = HttpClient::new(&ClientConfig::with_base_url(&format!("http://{addr}")), None).unwrap();
    let err = client.get::<Value>("/ping").await.unwrap_err();
    assert!(!err.message().is_empty());
    assert_ne!(err.message(), crate::net::error::GENERIC_FAILURE);
}

#[tokio::test]
async fn slow_response_times_out_through_same_error_path() {
    let backend = MockBackend::start().await;
    backend.on("POST", "/slow", Reply::json(200, json!({})).delayed(Duration::from_secs(3)));
    let client = HttpClient::new(&backend.config_with_timeout(1), None).unwrap();

    let started = std::time::Instant::now();
    let err = client.post_json::<_, Value>("/slow", &json!({})).await.unwrap_err();
    assert!(started.elapsed() < Duration::from_secs(3));
    assert!(!err.message().is_empty());
}

#[tokio::test]
async fn undecodable_success_body_is_an_error() {
    let backend = MockBackend::start().await;
    backend.on("GET", "/user", Reply::json(200, json!({ "unexpected": true })));
    let client = HttpClient::new(&backend.config(), None).unwrap();

    let err = client.get::<User>("/user").await.unwrap_err();
    assert!(err.message().starts_with("invalid response body"));
}

#[tokio::test]
async fn delete_ignores_empty_body() {
    let backend = MockBackend::start().await;
    backend.on("DELETE", "/thing/1", Reply::empty(204));
    let client = HttpClient::new(&backend.config(), None).unwrap();

    client.delete("/thing/1").await.unwrap();
    assert_eq!(backend.last().method, "DELETE");
}

#[tokio::test]
async fn post_query_sends_parameters_without_body() {
    let backend = MockBackend::start().await;
    backend.on("POST", "/pin", Reply::json(200, json!({})));
    let client = HttpClient::new(&backend.config(), None).unwrap();

    let _: Value = client.post_query("/pin", &[("is_pinned", true)]).await.unwrap();
    let seen = backend.last();
    assert_eq!(seen.query.as_deref(), Some("is_pinned=true"));
    assert!(seen.body.is_empty());
}

struct CountingHook(Arc<AtomicUsize>);

impl RequestHook for CountingHook {
    fn on_request(&self, request: reqwest::Request) -> reqwest::Request {
        self.0.fetch_add(1, Ordering::SeqCst);
        request
    }
}

struct TagHeader(&'static str);

impl RequestHook for TagHeader {
    fn on_request(&self, mut request: reqwest::Request) -> reqwest::Request {
        let previous = request
            .headers()
            .get("x-chain")
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
            .unwrap_or_default();
        let value = HeaderValue::from_str(&format!("{previous}{}", self.0)).unwrap();
        request.headers_mut().insert("x-chain", value);
        request
    }
}

#[tokio::test]
async fn custom_hooks_run_in_registration_order() {
    let backend = MockBackend::start().await;
    backend.on("GET", "/ping", Reply::json(200, json!({})));
    let count = Arc::new(AtomicUsize::new(0));
    let client = HttpClient::builder(&backend.config())
        .request_hook(TagHeader("a"))
        .request_hook(CountingHook(count.clone()))
        .request_hook(TagHeader("b"))
        .response_hook(NormalizeErrors)
        .build()
        .unwrap();

    let _: Value = client.get("/ping").await.unwrap();
    assert_eq!(count.load(Ordering::SeqCst), 1);
    assert_eq!(backend.last().header("x-chain"), Some("ab"));
}

#[tokio::test]
async fn without_normalizer_error_statuses_pass_through() {
    let backend = MockBackend::start().await;
    backend.on("GET", "/gone", Reply::empty(410));
    let client = HttpClient::builder(&backend.config()).build().unwrap();

    let response = client.execute(client.request(Method::GET, "/gone")).await.unwrap();
    assert_eq!(response.status().as_u16(), 410);
}
