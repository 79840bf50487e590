//! Error types for the clamp-core crate.

use clamp_tools::ToolError;

/// Core error type for configuration loading and registry assembly.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A toolkit could not be built from its configuration
    #[error("Toolkit '{name}': {source}")]
    Toolkit {
        name: String,
        #[source]
        source: ToolError,
    },

    /// Tool-level error outside any toolkit
    #[error(transparent)]
    Tool(#[from] ToolError),
}
