//! Subcommand implementations.

pub mod bound;
pub mod invoke;
pub mod tools;

use clamp_core::ConfigStore;
use clamp_tools::ToolRegistry;

/// Load the config (with environment fallbacks) and build every tool it names.
///
/// A config file that exists but does not parse is an error; only a missing
/// file falls back to the defaults.
pub fn load_tool_registry(store: &ConfigStore) -> anyhow::Result<ToolRegistry> {
    let mut config = store
        .try_load()
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {e}", store.path().display()))?;
    config.apply_env();

    let tools = clamp_core::build_registry(&config)
        .map_err(|e| anyhow::anyhow!("Failed to load tools: {e}"))?;
    tracing::debug!(path = %store.path().display(), tools = tools.len(), "tool registry loaded");
    Ok(tools)
}
