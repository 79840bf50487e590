//! reqwest-backed response source for JSON/REST APIs.

use crate::error::UpstreamError;
use crate::traits::ResponseSource;
use crate::types::{ApiRequest, AuthHeader, PayloadFormat, RawResponse};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 120;
const DEFAULT_USER_AGENT: &str = "clamp/0.1";

/// Configuration for an HTTP response source.
#[derive(Debug, Clone)]
pub struct HttpSourceConfig {
    /// Source name used in logs (e.g., "figma").
    pub name: String,
    /// Base URL every request path is joined onto.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// User agent sent with every request.
    pub user_agent: String,
}

impl HttpSourceConfig {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// A source that performs real HTTP calls.
#[derive(Debug, Clone)]
pub struct HttpSource {
    config: HttpSourceConfig,
    client: Client,
}

impl HttpSource {
    /// Create a new HTTP source.
    pub fn new(config: HttpSourceConfig) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { config, client })
    }

    /// Absolute URL for a request path.
    pub fn url_for(&self, path: &str) -> String {
        join_url(&self.config.base_url, path)
    }
}

#[async_trait]
impl ResponseSource for HttpSource {
    fn name(&self) -> &str {
        &self.config.name
    }

    async fn fetch(
        &self,
        request: ApiRequest,
        auth: &AuthHeader,
    ) -> Result<RawResponse, UpstreamError> {
        let url = self.url_for(&request.path);
        tracing::debug!(
            source = %self.config.name,
            method = request.method.as_str(),
            url = %url,
            "upstream request"
        );

        let mut builder = self
            .client
            .request(request.method.into(), &url)
            .header("Accept", "application/json")
            .header(auth.name.as_str(), auth.value.expose_secret());
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(ref body) = request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            tracing::debug!(source = %self.config.name, status = status.as_u16(), "upstream error status");
            return Err(UpstreamError::from_status(status.as_u16(), body));
        }

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.text().await?;

        normalize_body(status.as_u16(), content_type.as_deref(), body)
    }
}

/// Turn a successful body into a `RawResponse`.
///
/// JSON is re-serialized compactly. Empty results (`""`, `null`, `{}`, `[]`)
/// are reported as `EmptyResponse`.
pub(crate) fn normalize_body(
    status: u16,
    content_type: Option<&str>,
    body: String,
) -> Result<RawResponse, UpstreamError> {
    if body.trim().is_empty() {
        return Err(UpstreamError::EmptyResponse);
    }

    let format = match content_type {
        Some(ct) => PayloadFormat::from_content_type(ct),
        None => PayloadFormat::detect(&body),
    };

    if format == PayloadFormat::Text {
        return Ok(RawResponse {
            status,
            body,
            format,
        });
    }

    match serde_json::from_str::<serde_json::Value>(&body) {
        Ok(value) => {
            let empty = match &value {
                serde_json::Value::Null => true,
                serde_json::Value::Object(map) => map.is_empty(),
                serde_json::Value::Array(items) => items.is_empty(),
                _ => false,
            };
            if empty {
                return Err(UpstreamError::EmptyResponse);
            }
            Ok(RawResponse {
                status,
                body: value.to_string(),
                format: PayloadFormat::Json,
            })
        }
        // Declared JSON that does not parse is passed through as text.
        Err(_) => Ok(RawResponse {
            status,
            body,
            format: PayloadFormat::Text,
        }),
    }
}

fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        base.to_string()
    } else {
        format!("{base}/{path}")
    }
}
