//! Error types for the clamp-tools crate.

use clamp_client::UpstreamError;

/// Errors that can occur while invoking a tool.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// Invalid or missing credential, non-positive limit, invalid pattern.
    /// Always raised before any upstream call.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Failure reported by the response source, passed through unchanged
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    /// Invalid API arguments passed to a tool
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// Tool name not known to a toolkit or registry
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
}

impl ToolError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Whether this error was raised before reaching the upstream API.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}
