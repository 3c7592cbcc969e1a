//! Authenticated HTTP client for the bot REST API

use qqbot_common::{ApiSettings, Token};
use reqwest::{header, Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error};

use crate::error::{ApiError, ApiErrorKind};

/// Response header carrying the platform trace id
pub const X_TPS_TRACE_ID: &str = "X-Tps-trace-Id";

const X_UNION_APPID: &str = "X-Union-Appid";

/// An API endpoint: method plus a path template with `{name}` placeholders
#[derive(Debug, Clone)]
pub struct Route {
    method: Method,
    path: String,
}

impl Route {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Fill one `{name}` placeholder
    #[must_use]
    pub fn param(mut self, name: &str, value: &str) -> Self {
        self.path = self.path.replace(&format!("{{{name}}}"), value);
        self
    }

    #[inline]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Absolute URL under `base_url`
    pub fn url(&self, base_url: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), self.path)
    }
}

/// HTTP client that signs every request with the bot credential
#[derive(Debug, Clone)]
pub struct BotHttp {
    client: Client,
    base_url: String,
    token: Arc<Token>,
}

impl BotHttp {
    /// Build a client from settings
    pub fn new(settings: &ApiSettings, token: Arc<Token>) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(settings.timeout).build()?;
        Ok(Self::with_client(client, settings.base_url.clone(), token))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>, token: Arc<Token>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            token,
        }
    }

    #[inline]
    pub fn token(&self) -> &Arc<Token> {
        &self.token
    }

    #[inline]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a request and decode the JSON response
    pub async fn request<T, B>(&self, route: &Route, body: Option<&B>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let authorization = self.token.authorize().await?;
        let url = route.url(&self.base_url);

        let mut request = self
            .client
            .request(route.method().clone(), &url)
            .header(header::AUTHORIZATION, authorization)
            .header(X_UNION_APPID, self.token.app_id());
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            error!(error = %e, url = %url, "Request failed");
            ApiError::Transport(e)
        })?;

        handle_response(&url, response).await
    }

    /// GET with no body
    pub async fn get<T: DeserializeOwned>(&self, route: &Route) -> Result<T, ApiError> {
        self.request::<T, ()>(route, None).await
    }
}

/// Decode a success body or turn the status into an [`ApiError`]
pub(crate) async fn handle_response<T: DeserializeOwned>(
    url: &str,
    response: Response,
) -> Result<T, ApiError> {
    let status = response.status();
    let trace_id = response
        .headers()
        .get(X_TPS_TRACE_ID)
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    let text = response.text().await?;

    if matches!(
        status,
        StatusCode::OK | StatusCode::ACCEPTED | StatusCode::NO_CONTENT
    ) {
        debug!(url = %url, status = %status, trace_id = ?trace_id, "Request succeeded");
        let body = if text.trim().is_empty() { "null" } else { &text };
        return Ok(serde_json::from_str(body)?);
    }

    error!(
        url = %url,
        status = %status,
        body = %text,
        trace_id = ?trace_id,
        "API returned error status"
    );
    Err(ApiError::Status {
        status,
        kind: ApiErrorKind::from_status(status),
        message: error_message(&text),
        trace_id,
    })
}

/// Use the body's `message` field when it is JSON, the raw body otherwise
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
        .unwrap_or_else(|| body.to_string())
}
