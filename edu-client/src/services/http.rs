//! HTTP client core shared by every domain service.
//!
//! Requests go to a fixed base URL with JSON bodies and a global timeout.
//! Authenticated requests pass through the [`AuthInterceptor`]; every failure
//! is normalized into an [`ApiError`] and reported once through the shared
//! notifier before it is returned to the caller.

use crate::auth::session::SessionSlot;
use crate::config::ApiSettings;
use crate::services::interceptor::AuthInterceptor;
use crate::services::notify::{NotificationLevel, Notifier};
use client_core::observability::TracedClientExt;
use client_core::{ApiError, TokenStore};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Per-request options, applied on top of the client-wide defaults.
#[derive(Debug, Clone, Copy)]
pub struct RequestConfig {
    /// Send without a bearer token and without refresh-on-401.
    pub skip_auth: bool,
    /// Report failures through the shared notifier.
    pub notify_errors: bool,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            skip_auth: false,
            notify_errors: true,
        }
    }
}

impl RequestConfig {
    pub fn unauthenticated() -> Self {
        Self {
            skip_auth: true,
            ..Default::default()
        }
    }

    pub fn silent(self) -> Self {
        Self {
            notify_errors: false,
            ..self
        }
    }
}

/// Status and body text of a response, before classification.
#[derive(Debug, Clone)]
pub(crate) struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Base URL plus the configured `reqwest::Client`. Cheap to clone.
#[derive(Debug, Clone)]
pub(crate) struct Transport {
    client: reqwest::Client,
    base_url: String,
}

impl Transport {
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Issue one request. Only transport failures are errors here; any
    /// received status, including 4xx/5xx, comes back as a [`RawResponse`].
    pub async fn dispatch(
        &self,
        method: &Method,
        path: &str,
        body: Option<&serde_json::Value>,
        bearer: Option<&str>,
    ) -> Result<RawResponse, ApiError> {
        let url = self.url(path);

        let mut request = self.client.traced_request(method.clone(), &url);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        let request_id = request.request_id().to_string();

        let response = request.send().await.map_err(|e| {
            tracing::error!(
                method = %method,
                url = %url,
                request_id = %request_id,
                error = %e,
                "HTTP request failed"
            );
            ApiError::from(e)
        })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(ApiError::from)?;

        tracing::debug!(
            method = %method,
            path = %path,
            status = status,
            request_id = %request_id,
            "API response"
        );

        Ok(RawResponse { status, body })
    }
}

/// List endpoints answer either with a bare array or with `{ "items": [...] }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListResponse<T> {
    Bare(Vec<T>),
    Wrapped { items: Vec<T> },
}

impl<T> From<ListResponse<T>> for Vec<T> {
    fn from(list: ListResponse<T>) -> Self {
        match list {
            ListResponse::Bare(items) | ListResponse::Wrapped { items } => items,
        }
    }
}

/// Configured API client. Clones share the connection pool, token store and
/// session slot.
#[derive(Clone)]
pub struct ApiClient {
    transport: Transport,
    interceptor: AuthInterceptor,
    notifier: Arc<dyn Notifier>,
}

impl ApiClient {
    pub fn new(
        settings: &ApiSettings,
        tokens: Arc<dyn TokenStore>,
        session: SessionSlot,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(settings.timeout())
            .build()
            .map_err(|e| ApiError::Network(format!("Failed to build HTTP client: {}", e)))?;

        let transport = Transport {
            client,
            base_url: settings.normalized_base_url().to_string(),
        };
        let interceptor =
            AuthInterceptor::new(transport.clone(), tokens, session, notifier.clone());

        Ok(Self {
            transport,
            interceptor,
            notifier,
        })
    }

    /// The underlying `reqwest::Client`, for calls this wrapper does not cover.
    pub fn inner(&self) -> &reqwest::Client {
        &self.transport.client
    }

    pub fn base_url(&self) -> &str {
        &self.transport.base_url
    }

    pub(crate) fn interceptor(&self) -> &AuthInterceptor {
        &self.interceptor
    }

    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
        config: RequestConfig,
    ) -> Result<T, ApiError> {
        let result = self
            .execute(&method, path, body.as_ref(), config)
            .await
            .and_then(|raw| decode(&raw.body));

        if let Err(err) = &result {
            self.handle_error(&method, path, err, config);
        }
        result
    }

    /// Like [`request`](Self::request) for endpoints whose body is irrelevant.
    pub async fn request_empty(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
        config: RequestConfig,
    ) -> Result<(), ApiError> {
        let result = self
            .execute(&method, path, body.as_ref(), config)
            .await
            .map(|_| ());

        if let Err(err) = &result {
            self.handle_error(&method, path, err, config);
        }
        result
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(Method::GET, path, None, RequestConfig::default())
            .await
    }

    pub async fn get_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, ApiError> {
        let list: ListResponse<T> = self.get(path).await?;
        Ok(list.into())
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = to_body(body)?;
        self.request(Method::POST, path, Some(body), RequestConfig::default())
            .await
    }

    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = to_body(body)?;
        self.request(Method::PUT, path, Some(body), RequestConfig::default())
            .await
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.request_empty(Method::DELETE, path, None, RequestConfig::default())
            .await
    }

    pub fn notify_success(&self, message: &str) {
        self.notifier.notify(NotificationLevel::Success, message);
    }

    pub(crate) fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    async fn execute(
        &self,
        method: &Method,
        path: &str,
        body: Option<&serde_json::Value>,
        config: RequestConfig,
    ) -> Result<RawResponse, ApiError> {
        let raw = if config.skip_auth {
            self.transport.dispatch(method, path, body, None).await?
        } else {
            self.interceptor.send(method, path, body).await?
        };

        if raw.is_success() {
            Ok(raw)
        } else {
            Err(ApiError::from_response(raw.status, &raw.body))
        }
    }

    /// Shared error handler: log and notify once per failed request.
    ///
    /// 401s on authenticated requests were already reported by the
    /// interceptor when it ended the session.
    fn handle_error(&self, method: &Method, path: &str, err: &ApiError, config: RequestConfig) {
        tracing::warn!(
            method = %method,
            path = %path,
            kind = %err.kind(),
            status = ?err.status(),
            error = %err,
            "API request failed"
        );

        let reported_by_interceptor = !config.skip_auth && err.is_unauthorized();
        if config.notify_errors && !reported_by_interceptor {
            self.notifier
                .notify(NotificationLevel::Error, err.message());
        }
    }
}

fn to_body<B: Serialize + ?Sized>(body: &B) -> Result<serde_json::Value, ApiError> {
    serde_json::to_value(body).map_err(ApiError::from)
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    let text = if body.trim().is_empty() { "null" } else { body };
    serde_json::from_str(text).map_err(ApiError::from)
}
