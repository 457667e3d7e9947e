use super::*;
use crate::net::mock_backend::{MockBackend, Reply};
use serde_json::json;

fn user_json(id: i64) -> serde_json::Value {
    json!({ "id": id, "email": "a@example.com", "is_active": true, "is_admin": false, "role": "member" })
}

#[tokio::test]
async fn login_posts_multipart_form() {
    let backend = MockBackend::start().await;
    backend.on(
        "POST",
        "/api/v1/auth/login",
        Reply::json(200, json!({ "token": { "access_token": "tok", "token_type": "bearer" }, "user": user_json(1) })),
    );
    let http = HttpClient::new(&backend.config(), None).unwrap();

    let resp = login(&http, "a@example.com", "pw").await.unwrap();
    assert_eq!(resp.token.access_token, "tok");
    assert_eq!(resp.user.id, 1);

    let seen = backend.last();
    assert!(seen.header("content-type").unwrap().starts_with("multipart/form-data"));
    let body = seen.body_text();
    assert!(body.contains("name=\"username\""));
    assert!(body.contains("a@example.com"));
    assert!(body.contains("name=\"password\""));
}

#[tokio::test]
async fn login_rejects_blank_credentials_without_request() {
    let backend = MockBackend::start().await;
    let http = HttpClient::new(&backend.config(), None).unwrap();

    let err = login(&http, "  ", "pw").await.unwrap_err();
    assert_eq!(err.message(), "username and password are required");
    assert!(login(&http, "a@example.com", "").await.is_err());
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn login_failure_carries_server_detail() {
    let backend = MockBackend::start().await;
    backend.on("POST", "/api/v1/auth/login", Reply::json(400, json!({ "detail": "Incorrect email or password" })));
    let http = HttpClient::new(&backend.config(), None).unwrap();

    let err = login(&http, "a@example.com", "wrong").await.unwrap_err();
    assert_eq!(err.to_string(), "Incorrect email or password");
}

#[tokio::test]
async fn register_sends_json_payload() {
    let backend = MockBackend::start().await;
    backend.on("POST", "/api/v1/auth/register", Reply::json(200, user_json(2)));
    let http = HttpClient::new(&backend.config(), None).unwrap();

    let payload = RegisterPayload {
        email: "b@example.com".into(),
        password: "pw".into(),
        invite_code: "LOVE".into(),
        is_admin: None,
    };
    let user = register(&http, &payload).await.unwrap();
    assert_eq!(user.id, 2);
    assert_eq!(
        backend.last().json(),
        json!({ "email": "b@example.com", "password": "pw", "invite_code": "LOVE" })
    );
}

#[tokio::test]
async fn api_key_provider_defaults_to_qwen() {
    let backend = MockBackend::start().await;
    backend.on("POST", "/api/v1/auth/apikey", Reply::json(200, json!({ "provider": "qwen", "key": "k" })));
    backend.on("GET", "/api/v1/auth/apikey/qwen", Reply::json(200, json!({ "provider": "qwen", "key": "k" })));
    let http = HttpClient::new(&backend.config(), None).unwrap();

    set_api_key(&http, &ApiKeyPayload { provider: None, key: "k".into() }).await.unwrap();
    assert_eq!(backend.last().json(), json!({ "provider": "qwen", "key": "k" }));

    let key = get_api_key(&http, None).await.unwrap();
    assert_eq!(key.key, "k");
}

#[tokio::test]
async fn update_user_patches_admin_fields() {
    let backend = MockBackend::start().await;
    backend.on("PATCH", "/api/v1/auth/users/5", Reply::json(200, user_json(5)));
    let http = HttpClient::new(&backend.config(), None).unwrap();

    let patch = UserUpdate { role: Some("admin".into()), allowed_spaces: None };
    update_user(&http, 5, &patch).await.unwrap();
    assert_eq!(backend.last().json(), json!({ "role": "admin" }));
}

#[tokio::test]
async fn http_client_is_a_profile_source() {
    let backend = MockBackend::start().await;
    backend.on("GET", "/api/v1/auth/me", Reply::json(200, user_json(9)));
    let http = HttpClient::new(&backend.config(), None).unwrap();

    let user = http.fetch_profile().await.unwrap();
    assert_eq!(user.id, 9);
}
