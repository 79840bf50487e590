//! Tool façade: wires credentials, parameter binding, the response source
//! and the bounding engine into one callable tool.

use crate::bounding::{bound_as, BoundedResult};
use crate::config::ToolConfig;
use crate::credentials::resolve_credential;
use crate::error::ToolError;
use crate::params::{bind, CallParams};
use crate::traits::{Tool, ToolContext, ToolResult, CUSTOM_KIND};
use async_trait::async_trait;
use clamp_client::{ApiRequest, ResponseSource};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::Instrument;

type BuildFn = dyn Fn(&Value) -> Result<ApiRequest, ToolError> + Send + Sync;

/// One upstream API operation: how it is described to the agent and how its
/// arguments turn into a request.
#[derive(Clone)]
pub struct Endpoint {
    pub name: String,
    pub label: String,
    pub description: String,
    pub parameters: Value,
    build: Arc<BuildFn>,
}

impl Endpoint {
    pub fn new<F>(
        name: impl Into<String>,
        label: impl Into<String>,
        description: impl Into<String>,
        parameters: Value,
        build: F,
    ) -> Self
    where
        F: Fn(&Value) -> Result<ApiRequest, ToolError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            label: label.into(),
            description: description.into(),
            parameters,
            build: Arc::new(build),
        }
    }

    /// Build the upstream request from API arguments.
    pub fn build_request(&self, args: &Value) -> Result<ApiRequest, ToolError> {
        (self.build)(args)
    }
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("name", &self.name)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// A tool whose output is always bounded.
///
/// Each call is one-shot: resolve credential, bind parameters, fetch, bound.
/// Any failure aborts the call; nothing partial is returned.
#[derive(Clone)]
pub struct BoundedTool {
    name: String,
    kind: String,
    config: Arc<ToolConfig>,
    endpoint: Endpoint,
    source: Arc<dyn ResponseSource>,
}

impl BoundedTool {
    pub fn new(config: Arc<ToolConfig>, endpoint: Endpoint, source: Arc<dyn ResponseSource>) -> Self {
        Self {
            name: endpoint.name.clone(),
            kind: CUSTOM_KIND.to_string(),
            config,
            endpoint,
            source,
        }
    }

    /// Expose the tool under a different name (e.g., with a toolkit prefix).
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Tag the tool with the toolkit kind that built it.
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    /// Name of the underlying operation, without any prefix.
    pub fn operation(&self) -> &str {
        &self.endpoint.name
    }

    pub fn config(&self) -> &ToolConfig {
        &self.config
    }

    /// Invoke and return only the bounded text.
    pub async fn invoke(&self, args: &Value, call: &CallParams) -> Result<String, ToolError> {
        Ok(self.invoke_detailed(args, call).await?.text)
    }

    /// Invoke and return the bounded text with its flags.
    pub async fn invoke_detailed(
        &self,
        args: &Value,
        call: &CallParams,
    ) -> Result<BoundedResult, ToolError> {
        let auth = resolve_credential(&self.config)?;
        let params = bind(&self.config, call)?;
        let request = self.endpoint.build_request(args)?;

        tracing::debug!(
            tool = %self.name,
            source = self.source.name(),
            limit = params.limit(),
            pattern = params.pattern.as_ref().map(|p| p.as_str()),
            "fetching raw response"
        );

        let raw = match self.source.fetch(request, &auth).await {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(tool = %self.name, error = %err, "upstream call failed");
                return Err(err.into());
            }
        };

        let result = bound_as(&raw.body, &params, raw.format);
        tracing::debug!(
            tool = %self.name,
            original_len = result.original_len,
            returned_len = result.text.chars().count(),
            truncated = result.truncated,
            filtered = result.filtered,
            well_formed = result.well_formed,
            "bounded tool output"
        );
        Ok(result)
    }
}

impl fmt::Debug for BoundedTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedTool")
            .field("name", &self.name)
            .field("endpoint", &self.endpoint)
            .field("source", &self.source.name())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Tool for BoundedTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn label(&self) -> &str {
        &self.endpoint.label
    }

    fn description(&self) -> &str {
        &self.endpoint.description
    }

    fn kind(&self) -> &str {
        &self.kind
    }

    fn parameters_schema(&self) -> Value {
        self.endpoint.parameters.clone()
    }

    async fn execute(&self, args: Value, ctx: &ToolContext) -> Result<ToolResult, ToolError> {
        let mut args = args;
        let call = CallParams::extract(&mut args)?;

        let span = tracing::debug_span!(
            "tool_invocation",
            tool = %self.name,
            session = %ctx.session_id,
            invocation = %ulid::Ulid::new(),
        );
        let result = self.invoke_detailed(&args, &call).instrument(span).await?;
        Ok(ToolResult::from(result))
    }
}

// One tool and its config are shared by every concurrent invocation.
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn _assert_shareable() {
        assert_send_sync::<BoundedTool>();
        assert_send_sync::<ToolConfig>();
        assert_send_sync::<Endpoint>();
    }
};
