//! Error types for the clamp-client crate.

/// Errors raised while fetching a raw response from an upstream API.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// Transport-level failure (DNS, TLS, timeout, connection reset)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream rejected the credential
    #[error("Authentication rejected (HTTP {status}): {body}")]
    Auth { status: u16, body: String },

    /// Upstream returned a non-success status
    #[error("API error (HTTP {status}): {body}")]
    Status { status: u16, body: String },

    /// Upstream answered successfully but with nothing to show
    #[error("Response result is empty. Check input parameters")]
    EmptyResponse,

    /// Request could not be built from the given inputs
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl UpstreamError {
    /// Classify a non-success HTTP status.
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        match status {
            401 | 403 => Self::Auth { status, body },
            _ => Self::Status { status, body },
        }
    }
}
