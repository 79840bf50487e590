//! Common types shared by response sources and their callers.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// HTTP method of an upstream call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// A single upstream API call, relative to a source's base URL.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Path relative to the base URL (e.g., "files/abc/nodes").
    pub path: String,
    /// Query parameters, in insertion order.
    pub query: Vec<(String, String)>,
    /// Optional JSON body.
    pub body: Option<Value>,
}

impl ApiRequest {
    /// Create a request with the given method and path.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    /// Create a GET request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    /// Create a POST request.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    /// Append a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Append a query parameter only when a value is present.
    pub fn query_opt(self, key: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    /// Attach a JSON body.
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// One authentication header ready to be attached to a request.
///
/// The value is kept secret so it never leaks through `Debug` or logs.
#[derive(Debug, Clone)]
pub struct AuthHeader {
    /// Header name (e.g., "Authorization").
    pub name: String,
    /// Header value (e.g., "Bearer abc").
    pub value: SecretString,
}

impl AuthHeader {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: SecretString::from(value.into()),
        }
    }
}

/// Declared serialization format of a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PayloadFormat {
    /// Structured JSON.
    Json,
    /// Free text with no structure to preserve.
    #[default]
    Text,
}

impl PayloadFormat {
    /// Guess the format from the first non-whitespace character.
    pub fn detect(text: &str) -> Self {
        match text.trim_start().chars().next() {
            Some('{') | Some('[') => PayloadFormat::Json,
            _ => PayloadFormat::Text,
        }
    }

    /// Map a `Content-Type` header value to a format.
    pub fn from_content_type(content_type: &str) -> Self {
        if content_type.to_ascii_lowercase().contains("json") {
            PayloadFormat::Json
        } else {
            PayloadFormat::Text
        }
    }
}

/// Unbounded payload returned by a source.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    /// HTTP status code (200 for non-HTTP sources).
    pub status: u16,
    /// Response body as text.
    pub body: String,
    /// Declared format of `body`.
    pub format: PayloadFormat,
}

impl RawResponse {
    /// A JSON response serialized compactly.
    pub fn json(value: &Value) -> Self {
        Self {
            status: 200,
            body: value.to_string(),
            format: PayloadFormat::Json,
        }
    }

    /// A plain-text response.
    pub fn text(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
            format: PayloadFormat::Text,
        }
    }
}
