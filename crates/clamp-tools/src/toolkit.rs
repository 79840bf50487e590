//! Toolkits: a named group of bounded tools sharing one configuration.

use crate::error::ToolError;
use crate::facade::BoundedTool;
use crate::registry::ToolRegistry;
use crate::traits::{Tool, ToolContext, ToolResult};
use serde_json::Value;
use std::sync::Arc;

/// Separator between a toolkit prefix and an operation name.
pub const TOOLKIT_SPLITTER: &str = "__";

/// Normalize a toolkit name into a tool-name-safe prefix.
pub fn clean_name(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|ch| {
            let ch = ch.to_ascii_lowercase();
            if ch.is_ascii_lowercase() || ch.is_ascii_digit() || matches!(ch, '_' | '-') {
                ch
            } else {
                '_'
            }
        })
        .collect();
    cleaned.trim_matches('_').to_string()
}

/// A group of tools built from one API wrapper.
#[derive(Debug, Clone)]
pub struct Toolkit {
    name: Option<String>,
    tools: Vec<Arc<BoundedTool>>,
}

impl Toolkit {
    /// Assemble a toolkit.
    ///
    /// `selected` limits which operations are exposed (empty means all);
    /// naming an operation that does not exist is an error. When `name` is
    /// set every tool is exposed as `<clean name>__<operation>`.
    pub fn new(
        name: Option<&str>,
        tools: Vec<BoundedTool>,
        selected: &[String],
    ) -> Result<Self, ToolError> {
        if let Some(unknown) = selected
            .iter()
            .find(|s| !tools.iter().any(|t| t.operation() == s.as_str()))
        {
            return Err(ToolError::UnknownTool(unknown.clone()));
        }

        let prefix = name
            .map(clean_name)
            .filter(|n| !n.is_empty())
            .map(|n| format!("{n}{TOOLKIT_SPLITTER}"));

        let tools = tools
            .into_iter()
            .filter(|t| selected.is_empty() || selected.iter().any(|s| s == t.operation()))
            .map(|t| match prefix {
                Some(ref prefix) => {
                    let full = format!("{prefix}{}", t.operation());
                    Arc::new(t.with_name(full))
                }
                None => Arc::new(t),
            })
            .collect();

        Ok(Self {
            name: name.map(str::to_string),
            tools,
        })
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn tools(&self) -> &[Arc<BoundedTool>] {
        &self.tools
    }

    /// Exposed tool names, in declaration order.
    pub fn names(&self) -> Vec<String> {
        self.tools.iter().map(|t| t.name().to_string()).collect()
    }

    /// Find a tool by exposed name or bare operation name.
    pub fn get(&self, mode: &str) -> Option<&Arc<BoundedTool>> {
        self.tools
            .iter()
            .find(|t| t.name() == mode || t.operation() == mode)
    }

    /// Dispatch a call by tool name.
    pub async fn run(
        &self,
        mode: &str,
        args: Value,
        ctx: &ToolContext,
    ) -> Result<ToolResult, ToolError> {
        let tool = self
            .get(mode)
            .ok_or_else(|| ToolError::UnknownTool(mode.to_string()))?;
        tool.execute(args, ctx).await
    }

    /// Add every tool to a registry, refusing duplicates.
    pub fn register_into(&self, registry: &mut ToolRegistry) -> Result<(), ToolError> {
        for tool in &self.tools {
            registry.register(tool.clone())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ToolConfig;
    use crate::facade::tests::MockSource;
    use crate::facade::Endpoint;
    use clamp_client::{ApiRequest, RawResponse};
    use serde_json::json;

    fn tools(source: Arc<MockSource>) -> Vec<BoundedTool> {
        let config = Arc::new(ToolConfig::builder().token("tok").build().unwrap());
        ["list_things", "get_thing"]
            .into_iter()
            .map(|op| {
                let endpoint = Endpoint::new(op, op, op, json!({"type": "object"}), move |_| {
                    Ok(ApiRequest::get(op))
                });
                BoundedTool::new(config.clone(), endpoint, source.clone())
            })
            .collect()
    }

    #[test]
    fn test_clean_name() {
        assert_eq!(clean_name("My Design Team!"), "my_design_team");
        assert_eq!(clean_name("  ops-2 "), "ops-2");
        assert_eq!(clean_name("***"), "");
    }

    #[test]
    fn test_prefix_and_selection() {
        let source = MockSource::returning(RawResponse::text("x"));
        let kit = Toolkit::new(Some("Design Team"), tools(source), &["get_thing".to_string()]).unwrap();

        assert_eq!(kit.names(), vec!["design_team__get_thing"]);
        assert!(kit.get("get_thing").is_some());
        assert!(kit.get("design_team__get_thing").is_some());
        assert!(kit.get("list_things").is_none());
    }

    #[test]
    fn test_unknown_selection_is_rejected() {
        let source = MockSource::returning(RawResponse::text("x"));
        let err = Toolkit::new(None, tools(source), &["nope".to_string()]).unwrap_err();
        assert!(matches!(err, ToolError::UnknownTool(ref n) if n == "nope"));
    }

    #[tokio::test]
    async fn test_run_dispatches_by_mode() {
        let source = MockSource::returning(RawResponse::text("hello world"));
        let kit = Toolkit::new(None, tools(source.clone()), &[]).unwrap();

        let result = kit
            .run("get_thing", json!({"limit": 5}), &ToolContext::default())
            .await
            .unwrap();
        assert_eq!(result.output, "hello");
        assert_eq!(source.calls.lock().unwrap()[0].0.path, "get_thing");

        let err = kit
            .run("delete_everything", json!({}), &ToolContext::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::UnknownTool(_)));
    }

    #[test]
    fn test_register_into_rejects_duplicates() {
        let source = MockSource::returning(RawResponse::text("x"));
        let kit = Toolkit::new(None, tools(source), &[]).unwrap();
        let mut registry = ToolRegistry::new();
        kit.register_into(&mut registry).unwrap();
        assert_eq!(registry.names(), vec!["get_thing", "list_things"]);
        assert!(kit.register_into(&mut registry).is_err());
    }
}
