//! The agent-facing tool interface.

use crate::bounding::BoundedResult;
use crate::error::ToolError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Per-call context handed to a tool by its caller.
#[derive(Debug, Clone, Default)]
pub struct ToolContext {
    /// Caller's session, recorded on the invocation span.
    pub session_id: String,
}

impl ToolContext {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
        }
    }
}

/// What a tool hands back to the agent: bounded text plus the flags that
/// describe how it was cut.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub output: String,
    /// `{truncated, filtered, well_formed, original_len, filtered_len}` for
    /// bounded tools, `null` otherwise.
    #[serde(default)]
    pub metadata: Value,
}

impl ToolResult {
    pub fn text(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            metadata: Value::Null,
        }
    }

    pub fn flag(&self, key: &str) -> Option<bool> {
        self.metadata.get(key).and_then(Value::as_bool)
    }
}

impl From<BoundedResult> for ToolResult {
    fn from(result: BoundedResult) -> Self {
        let metadata = result.metadata();
        Self {
            output: result.text,
            metadata,
        }
    }
}

/// Kind reported by tools that belong to no toolkit.
pub const CUSTOM_KIND: &str = "custom";

/// A callable operation exposed to an agent.
///
/// Failures surface as `Err`; a returned result is always usable output,
/// already sized for a model's context.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Registry key, e.g. `get_file_nodes` or `design__get_file`.
    fn name(&self) -> &str;

    /// Display label, e.g. "Get File Nodes".
    fn label(&self) -> &str;

    fn description(&self) -> &str;

    /// Wrapper that produced the tool, e.g. `figma`.
    fn kind(&self) -> &str {
        CUSTOM_KIND
    }

    /// JSON Schema of the accepted arguments, `limit` and `regexp` included.
    fn parameters_schema(&self) -> Value;

    async fn execute(&self, args: Value, ctx: &ToolContext) -> Result<ToolResult, ToolError>;
}

// Tools are stored as trait objects.
const _: () = {
    fn _assert_object_safe(_: &dyn Tool) {}
};
