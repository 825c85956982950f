//! Shared HTTP plumbing for the hosted backend (auth + REST endpoints).

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Deserialize;

/// Connection settings for the hosted backend.
#[derive(Debug, Clone)]
pub struct HostedConfig {
    /// Project base URL, e.g. `https://xyz.example.co`.
    pub base_url: String,
    /// Public API key, sent as `apikey` on every request.
    pub anon_key: String,
    /// Privileged key for table access; falls back to `anon_key`.
    pub service_key: Option<String>,
    pub timeout: Duration,
}

/// Cheap-to-clone handle over one pooled `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HostedClient {
    http: reqwest::Client,
    config: Arc<HostedConfig>,
}

impl HostedClient {
    pub fn new(config: HostedConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            config: Arc::new(config),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Request against the auth API (`/auth/v1/...`).
    pub(crate) fn auth(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, self.url(path))
            .header("apikey", &self.config.anon_key)
    }

    /// Request against the REST table API (`/rest/v1/...`).
    pub(crate) fn rest(&self, method: Method, path: &str) -> RequestBuilder {
        let key = self
            .config
            .service_key
            .as_deref()
            .unwrap_or(&self.config.anon_key);
        self.http
            .request(method, self.url(path))
            .header("apikey", key)
            .bearer_auth(key)
    }
}

/// How a hosted response status should be treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StatusClass {
    Success,
    /// The backend understood the request and said no.
    Rejected,
    /// The backend is unhealthy or throttling us.
    Unavailable,
    Unexpected,
}

pub(crate) fn classify_status(status: StatusCode) -> StatusClass {
    if status.is_success() {
        return StatusClass::Success;
    }
    match status.as_u16() {
        429 | 502 | 503 | 504 => StatusClass::Unavailable,
        400 | 401 | 403 | 404 | 422 => StatusClass::Rejected,
        s if s >= 500 => StatusClass::Unavailable,
        _ => StatusClass::Unexpected,
    }
}

/// Transport failures that mean "could not reach the backend".
pub(crate) fn is_unreachable(err: &reqwest::Error) -> bool {
    err.is_connect() || err.is_timeout() || err.is_request()
}

/// Error payload shapes the hosted backend uses across its APIs.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct HostedErrorBody {
    error_description: Option<String>,
    msg: Option<String>,
    message: Option<String>,
    error: Option<String>,
}

impl HostedErrorBody {
    pub(crate) fn into_message(self) -> Option<String> {
        self.error_description
            .or(self.msg)
            .or(self.message)
            .or(self.error)
    }
}

/// Best-effort extraction of the backend's error message.
pub(crate) async fn error_message(resp: reqwest::Response) -> Option<String> {
    let text = resp.text().await.ok()?;
    serde_json::from_str::<HostedErrorBody>(&text)
        .ok()
        .and_then(HostedErrorBody::into_message)
}
