//! Shared HTTP pipeline used by every resource client.
//!
//! DESIGN
//! ======
//! One `reqwest::Client` configured once (base URL, JSON content type,
//! generous timeout for slow AI calls) plus an ordered hook chain composed at
//! construction. The default chain attaches the session's bearer token and
//! normalizes failures into [`ApiError`]. Calls are fire-once: no retries,
//! no deduplication.

#[cfg(test)]
#[path = "http_test.rs"]
mod http_test;

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::multipart::Form;
use reqwest::{Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error::ApiError;
use super::middleware::{BearerAuth, NormalizeErrors, RequestHook, RequestTrace, ResponseHook};
use crate::config::{ClientConfig, Timeouts};
use crate::state::session::SessionStore;

/// Cloneable handle to the configured request pipeline.
#[derive(Clone)]
pub struct HttpClient {
    inner: Arc<Inner>,
}

struct Inner {
    http: reqwest::Client,
    base_url: String,
    request_hooks: Vec<Box<dyn RequestHook>>,
    response_hooks: Vec<Box<dyn ResponseHook>>,
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.inner.base_url)
            .field("request_hooks", &self.inner.request_hooks.len())
            .field("response_hooks", &self.inner.response_hooks.len())
            .finish()
    }
}

/// Builder for an [`HttpClient`] with a custom hook chain.
pub struct HttpClientBuilder {
    base_url: String,
    timeouts: Timeouts,
    request_hooks: Vec<Box<dyn RequestHook>>,
    response_hooks: Vec<Box<dyn ResponseHook>>,
}

impl HttpClientBuilder {
    #[must_use]
    pub fn request_hook(mut self, hook: impl RequestHook + 'static) -> Self {
        self.request_hooks.push(Box::new(hook));
        self
    }

    #[must_use]
    pub fn response_hook(mut self, hook: impl ResponseHook + 'static) -> Self {
        self.response_hooks.push(Box::new(hook));
        self
    }

    /// Finish construction.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying `reqwest` client cannot be built.
    pub fn build(self) -> Result<HttpClient, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(self.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(self.timeouts.connect_secs))
            .build()
            .map_err(|e| ApiError::new(format!("HTTP client build failed: {e}")))?;

        Ok(HttpClient {
            inner: Arc::new(Inner {
                http,
                base_url: self.base_url,
                request_hooks: self.request_hooks,
                response_hooks: self.response_hooks,
            }),
        })
    }
}

impl HttpClient {
    /// Start a builder with an empty hook chain.
    #[must_use]
    pub fn builder(config: &ClientConfig) -> HttpClientBuilder {
        HttpClientBuilder {
            base_url: config.api_base_url.trim_end_matches('/').to_owned(),
            timeouts: config.timeouts,
            request_hooks: Vec::new(),
            response_hooks: Vec::new(),
        }
    }

    /// Build the standard pipeline: tracing, bearer auth from `session`, and
    /// error normalization.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying `reqwest` client cannot be built.
    pub fn new(config: &ClientConfig, session: Option<SessionStore>) -> Result<Self, ApiError> {
        Self::builder(config)
            .request_hook(BearerAuth::new(session))
            .request_hook(RequestTrace)
            .response_hook(RequestTrace)
            .response_hook(NormalizeErrors)
            .build()
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Absolute URL for an API path such as `/api/v1/health`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.inner.base_url, path)
        } else {
            format!("{}/{}", self.inner.base_url, path)
        }
    }

    /// Start a request against an API path; send it with [`HttpClient::execute`].
    #[must_use]
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.inner.http.request(method, self.url(path))
    }

    /// Run a request through the hook chain.
    ///
    /// # Errors
    ///
    /// Returns the normalized error for transport failures and non-2xx statuses.
    pub async fn execute(&self, builder: RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let request = builder.build().map_err(|e| ApiError::from_transport(&e))?;
        let request = self
            .inner
            .request_hooks
            .iter()
            .fold(request, |request, hook| hook.on_request(request));

        let mut outcome = self
            .inner
            .http
            .execute(request)
            .await
            .map_err(|e| ApiError::from_transport(&e));
        for hook in &self.inner.response_hooks {
            outcome = hook.on_response(outcome).await;
        }
        outcome
    }

    /// # Errors
    ///
    /// Returns the normalized error on failure or an undecodable body.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.execute(self.request(Method::GET, path)).await?;
        decode(response).await
    }

    /// # Errors
    ///
    /// Returns the normalized error on failure or an undecodable body.
    pub async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let response = self.execute(self.request(Method::GET, path).query(query)).await?;
        decode(response).await
    }

    /// # Errors
    ///
    /// Returns the normalized error on failure or an undecodable body.
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.execute(self.request(Method::POST, path).json(body)).await?;
        decode(response).await
    }

    /// POST with no body, parameters carried in the query string.
    ///
    /// # Errors
    ///
    /// Returns the normalized error on failure or an undecodable body.
    pub async fn post_query<T, Q>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let response = self.execute(self.request(Method::POST, path).query(query)).await?;
        decode(response).await
    }

    /// POST a multipart form. The form's own content type replaces the JSON default.
    ///
    /// # Errors
    ///
    /// Returns the normalized error on failure or an undecodable body.
    pub async fn post_multipart<T: DeserializeOwned>(&self, path: &str, form: Form) -> Result<T, ApiError> {
        let response = self.execute(self.request(Method::POST, path).multipart(form)).await?;
        decode(response).await
    }

    /// # Errors
    ///
    /// Returns the normalized error on failure or an undecodable body.
    pub async fn patch_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.execute(self.request(Method::PATCH, path).json(body)).await?;
        decode(response).await
    }

    /// DELETE and discard whatever body comes back.
    ///
    /// # Errors
    ///
    /// Returns the normalized error on failure.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.execute(self.request(Method::DELETE, path)).await?;
        Ok(())
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let bytes = response.bytes().await.map_err(|e| ApiError::from_transport(&e))?;
    serde_json::from_slice(&bytes).map_err(|e| ApiError::new(format!("invalid response body: {e}")))
}
