//! Tool registry assembly from a loaded [`Config`].

use crate::config::{Config, ToolkitConfig, ToolkitKind};
use crate::error::CoreError;
use clamp_client::ResponseSource;
use clamp_tools::figma::{figma_source, figma_toolkit};
use clamp_tools::{register_http_tools, ToolError, ToolRegistry, Toolkit};
use std::sync::Arc;
use std::time::Duration;

/// Build every enabled toolkit and custom HTTP tool named by `config`.
pub fn build_registry(config: &Config) -> Result<ToolRegistry, CoreError> {
    let timeout = Duration::from_secs(config.request_timeout_secs);
    let mut registry = ToolRegistry::new();

    for kit in config.toolkits.iter().filter(|k| k.enabled) {
        let source: Arc<dyn ResponseSource> = match kit.kind {
            ToolkitKind::Figma => Arc::new(figma_source(timeout).map_err(|e| toolkit_error(kit, e))?),
        };
        let toolkit = build_toolkit(kit, source)?;
        toolkit
            .register_into(&mut registry)
            .map_err(|e| toolkit_error(kit, e))?;
        tracing::info!(
            toolkit = kit.display_name(),
            tools = toolkit.tools().len(),
            "registered toolkit"
        );
    }

    if !config.http_tools.is_empty() {
        register_http_tools(&mut registry, &config.http_tools)?;
        tracing::info!(tools = config.http_tools.len(), "registered custom HTTP tools");
    }

    Ok(registry)
}

/// Build one toolkit over a caller-supplied source.
pub fn build_toolkit(
    kit: &ToolkitConfig,
    source: Arc<dyn ResponseSource>,
) -> Result<Toolkit, CoreError> {
    let toolkit = match kit.kind {
        ToolkitKind::Figma => figma_toolkit(
            &kit.settings,
            source,
            kit.name.as_deref(),
            &kit.selected_tools,
        ),
    };
    toolkit.map_err(|e| toolkit_error(kit, e))
}

fn toolkit_error(kit: &ToolkitConfig, source: ToolError) -> CoreError {
    CoreError::Toolkit {
        name: kit.display_name().to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clamp_tools::{HttpToolConfig, ToolSettings};

    fn figma(token: Option<&str>) -> ToolkitConfig {
        ToolkitConfig::new(
            ToolkitKind::Figma,
            ToolSettings {
                token: token.map(str::to_string),
                ..Default::default()
            },
        )
    }

    fn http_tool(name: &str) -> HttpToolConfig {
        serde_json::from_value(serde_json::json!({
            "name": name,
            "description": "Fetch a work item",
            "base_url": "https://example.com/api",
            "path": "items/{id}",
            "settings": {"token": "secret"}
        }))
        .unwrap()
    }

    #[test]
    fn test_empty_config_builds_empty_registry() {
        let registry = build_registry(&Config::default()).unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_figma_toolkit_registers_all_tools() {
        let mut config = Config::default();
        config.toolkits.push(figma(Some("figd_token")));

        let registry = build_registry(&config).unwrap();
        assert_eq!(registry.len(), 8);
        assert!(registry.has("get_file"));
        assert!(registry.has("post_file_comment"));
    }

    #[test]
    fn test_selection_and_prefix() {
        let mut kit = figma(Some("figd_token"));
        kit.name = Some("Design System".to_string());
        kit.selected_tools = vec!["get_file".to_string(), "get_file_nodes".to_string()];
        let mut config = Config::default();
        config.toolkits.push(kit);

        let registry = build_registry(&config).unwrap();
        assert_eq!(registry.len(), 2);
        assert!(registry.names().iter().all(|n| n.ends_with("get_file") || n.ends_with("get_file_nodes")));
        assert!(registry.names().iter().all(|n| n.contains("__")));
    }

    #[test]
    fn test_missing_credential_names_toolkit() {
        let mut kit = figma(None);
        kit.name = Some("design".to_string());
        let mut config = Config::default();
        config.toolkits.push(kit);

        let err = build_registry(&config).err().unwrap();
        match err {
            CoreError::Toolkit { name, source } => {
                assert_eq!(name, "design");
                assert!(source.is_configuration());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_disabled_toolkit_is_skipped() {
        let mut kit = figma(None);
        kit.enabled = false;
        let mut config = Config::default();
        config.toolkits.push(kit);

        assert!(build_registry(&config).unwrap().is_empty());
    }

    #[test]
    fn test_http_tools_registered_and_duplicates_rejected() {
        let mut config = Config::default();
        config.http_tools.push(http_tool("get_item"));
        let registry = build_registry(&config).unwrap();
        assert!(registry.has("get_item"));

        config.http_tools.push(http_tool("get_item"));
        assert!(matches!(build_registry(&config), Err(CoreError::Tool(_))));
    }

    #[test]
    fn test_toolkit_and_http_tool_name_clash() {
        let mut config = Config::default();
        config.toolkits.push(figma(Some("figd_token")));
        config.http_tools.push(http_tool("get_file"));

        assert!(build_registry(&config).is_err());
    }
}
