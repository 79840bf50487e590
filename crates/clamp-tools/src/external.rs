//! Config-driven HTTP tools: one endpoint per entry, bounded like any other tool.

use crate::config::{ToolConfig, ToolSettings};
use crate::credentials::TokenScheme;
use crate::error::ToolError;
use crate::facade::{BoundedTool, Endpoint};
use crate::path::path_segment;
use clamp_client::{ApiRequest, HttpSource, HttpSourceConfig, Method, ResponseSource};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 60;

fn default_schema() -> Value {
    serde_json::json!({
        "type": "object",
        "additionalProperties": true,
    })
}

/// Config for a custom HTTP-backed tool.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HttpToolConfig {
    /// Machine-readable tool name.
    pub name: String,
    /// Human-readable description shown to the model.
    pub description: String,
    /// API base URL (e.g. `https://dev.azure.com/org/project/_apis`).
    pub base_url: String,
    /// HTTP method.
    #[serde(default)]
    pub method: Method,
    /// Path template; `{arg}` placeholders are filled from tool arguments.
    pub path: String,
    /// Argument names forwarded as query parameters when present.
    #[serde(default)]
    pub query: Vec<String>,
    /// Header carrying the personal token; bearer auth when unset.
    #[serde(default)]
    pub token_header: Option<String>,
    /// Credentials and bounding defaults.
    #[serde(default)]
    pub settings: ToolSettings,
    /// Optional JSON schema describing accepted arguments.
    #[serde(default = "default_schema")]
    pub parameters_schema: Value,
    /// Optional per-tool timeout in seconds.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// Register custom HTTP tools from config into a registry.
pub fn register_http_tools(
    registry: &mut crate::ToolRegistry,
    configs: &[HttpToolConfig],
) -> Result<(), ToolError> {
    for config in configs {
        let source = HttpSource::new(
            HttpSourceConfig::new(config.name.clone(), config.base_url.clone()).with_timeout(
                Duration::from_secs(config.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
            ),
        )?;
        let tool = build_http_tool(config, Arc::new(source))?;
        registry.register(Arc::new(tool))?;
    }

    Ok(())
}

/// Build one custom tool over an arbitrary source.
pub fn build_http_tool(
    config: &HttpToolConfig,
    source: Arc<dyn ResponseSource>,
) -> Result<BoundedTool, ToolError> {
    validate_http_tool_config(config)?;

    let tool_config = ToolConfig::from_settings(&config.settings)?
        .with_token_scheme(TokenScheme::from_header(config.token_header.as_deref()));
    crate::credentials::resolve_credential(&tool_config)?;

    let method = config.method;
    let template = config.path.clone();
    let query = config.query.clone();
    let endpoint = Endpoint::new(
        config.name.clone(),
        config.name.clone(),
        config.description.clone(),
        config.parameters_schema.clone(),
        move |args| build_request(method, &template, &query, args),
    );

    Ok(BoundedTool::new(Arc::new(tool_config), endpoint, source))
}

fn build_request(
    method: Method,
    template: &str,
    query: &[String],
    args: &Value,
) -> Result<ApiRequest, ToolError> {
    let empty = Map::new();
    let args = match args {
        Value::Object(map) => map,
        Value::Null => &empty,
        other => {
            return Err(ToolError::InvalidParameters(format!(
                "arguments must be an object, got {other}"
            )))
        }
    };

    let mut used: Vec<&str> = Vec::new();
    let mut path = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        let key = &rest[start + 1..start + len];
        let value = args
            .get(key)
            .and_then(scalar_to_string)
            .ok_or_else(|| ToolError::InvalidParameters(format!("missing path argument '{key}'")))?;
        let value = path_segment(&format!("path argument '{key}'"), &value)?;
        path.push_str(&rest[..start]);
        path.push_str(&value);
        used.push(key);
        rest = &rest[start + len + 1..];
    }
    path.push_str(rest);

    let mut request = ApiRequest::new(method, path);
    for name in query {
        if let Some(value) = args.get(name).and_then(scalar_to_string) {
            request = request.query(name.clone(), value);
            used.push(name);
        }
    }

    if method != Method::Get {
        let body: Map<String, Value> = args
            .iter()
            .filter(|(k, _)| !used.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        if !body.is_empty() {
            request = request.json(Value::Object(body));
        }
    }

    Ok(request)
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn validate_http_tool_config(config: &HttpToolConfig) -> Result<(), ToolError> {
    if config.name.is_empty() || !is_valid_tool_name(&config.name) {
        return Err(ToolError::InvalidParameters(format!(
            "Invalid custom tool name '{}'",
            config.name
        )));
    }
    if config.description.trim().is_empty() {
        return Err(ToolError::InvalidParameters(format!(
            "Custom tool '{}' is missing a description",
            config.name
        )));
    }
    if !config.base_url.starts_with("http://") && !config.base_url.starts_with("https://") {
        return Err(ToolError::InvalidParameters(format!(
            "Custom tool '{}' needs an http(s) base_url",
            config.name
        )));
    }
    Ok(())
}

fn is_valid_tool_name(name: &str) -> bool {
    name.chars()
        .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || matches!(ch, '_' | '-'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facade::tests::MockSource;
    use crate::traits::{Tool, ToolContext};
    use clamp_client::RawResponse;
    use serde_json::json;

    fn config() -> HttpToolConfig {
        HttpToolConfig {
            name: "list_work_items".to_string(),
            description: "List work items of a project".to_string(),
            base_url: "https://dev.example.com/api".to_string(),
            method: Method::Get,
            path: "projects/{project}/workitems".to_string(),
            query: vec!["state".to_string(), "top".to_string()],
            token_header: None,
            settings: ToolSettings {
                token: Some("pat".to_string()),
                global_limit: Some("50".into()),
                ..Default::default()
            },
            parameters_schema: default_schema(),
            timeout_secs: None,
        }
    }

    #[test]
    fn test_path_template_and_query() {
        let req = build_request(
            Method::Get,
            "projects/{project}/workitems",
            &["state".to_string(), "top".to_string()],
            &json!({"project": "core", "state": "open", "top": 5, "ignored": true}),
        )
        .unwrap();

        assert_eq!(req.path, "projects/core/workitems");
        assert_eq!(
            req.query,
            vec![
                ("state".to_string(), "open".to_string()),
                ("top".to_string(), "5".to_string()),
            ]
        );
        assert!(req.body.is_none());
    }

    #[test]
    fn test_post_sends_remaining_args_as_body() {
        let req = build_request(
            Method::Post,
            "projects/{project}/workitems",
            &[],
            &json!({"project": "core", "title": "Bug"}),
        )
        .unwrap();
        assert_eq!(req.body, Some(json!({"title": "Bug"})));
    }

    #[test]
    fn test_missing_or_unsafe_path_argument() {
        let err = build_request(Method::Get, "items/{id}", &[], &json!({})).unwrap_err();
        assert!(err.to_string().contains("missing path argument 'id'"));

        for id in ["a/b", "..", "."] {
            let err = build_request(Method::Get, "items/{id}/notes", &[], &json!({"id": id}))
                .unwrap_err();
            assert!(matches!(err, ToolError::InvalidParameters(_)), "{id:?} accepted");
        }
    }

    #[test]
    fn test_path_argument_percent_encoded() {
        let req = build_request(
            Method::Get,
            "items/{id}/notes",
            &[],
            &json!({"id": "%2e%2e"}),
        )
        .unwrap();
        assert_eq!(req.path, "items/%252e%252e/notes");
    }

    #[test]
    fn test_invalid_configs_rejected() {
        let source = MockSource::returning(RawResponse::text("x"));

        let mut bad_name = config();
        bad_name.name = "List Items".to_string();
        assert!(build_http_tool(&bad_name, source.clone()).is_err());

        let mut bad_url = config();
        bad_url.base_url = "ftp://x".to_string();
        assert!(build_http_tool(&bad_url, source.clone()).is_err());

        let mut no_credential = config();
        no_credential.settings.token = None;
        let err = build_http_tool(&no_credential, source).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_register_http_tools_rejects_duplicates() {
        let mut registry = crate::ToolRegistry::new();
        let err = register_http_tools(&mut registry, &[config(), config()]).unwrap_err();
        assert!(err.to_string().contains("Duplicate tool name"));
        assert_eq!(registry.names(), vec!["list_work_items"]);
    }

    #[tokio::test]
    async fn test_http_tool_bounds_output() {
        let source = MockSource::returning(RawResponse::text("y".repeat(500)));
        let mut cfg = config();
        cfg.token_header = Some("PRIVATE-TOKEN".to_string());
        let tool = build_http_tool(&cfg, source.clone()).unwrap();

        let result = tool
            .execute(json!({"project": "core"}), &ToolContext::default())
            .await
            .unwrap();
        assert_eq!(tool.kind(), crate::CUSTOM_KIND);
        assert_eq!(result.output.len(), 50);
        assert_eq!(result.metadata["truncated"], true);

        let calls = source.calls.lock().unwrap();
        assert_eq!(calls[0].0.path, "projects/core/workitems");
        assert_eq!(calls[0].1, "PRIVATE-TOKEN");
        assert_eq!(calls[0].2, "pat");
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let parsed: HttpToolConfig = serde_json::from_str(
            r#"{
                "name": "get_pipeline",
                "description": "Get a pipeline",
                "base_url": "https://ci.example.com",
                "path": "pipelines/{id}",
                "settings": {"token": "t", "global_limit": "2000"}
            }"#,
        )
        .unwrap();
        assert_eq!(parsed.method, Method::Get);
        assert!(parsed.query.is_empty());
        assert_eq!(parsed.parameters_schema["type"], "object");
    }
}
