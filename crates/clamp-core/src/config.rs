use crate::error::CoreError;
use clamp_tools::{HttpToolConfig, ToolSettings};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// Which API wrapper a toolkit entry builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolkitKind {
    Figma,
}

impl ToolkitKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolkitKind::Figma => "figma",
        }
    }

    /// Environment variables consulted for a missing token / OAuth2 credential.
    fn env_keys(&self) -> (&'static str, &'static str) {
        match self {
            ToolkitKind::Figma => ("FIGMA_TOKEN", "FIGMA_OAUTH2_TOKEN"),
        }
    }
}

fn default_enabled() -> bool {
    true
}

/// One configured toolkit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolkitConfig {
    pub kind: ToolkitKind,
    /// Optional name; when set, tools are exposed as `<name>__<tool>`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Tools to expose; empty means all.
    #[serde(default)]
    pub selected_tools: Vec<String>,
    #[serde(default)]
    pub settings: ToolSettings,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl ToolkitConfig {
    pub fn new(kind: ToolkitKind, settings: ToolSettings) -> Self {
        Self {
            kind,
            name: None,
            selected_tools: Vec::new(),
            settings,
            enabled: true,
        }
    }

    /// Label used in logs and errors.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(self.kind.as_str())
    }
}

/// Serialized settings from ~/.clamp/config.json
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub toolkits: Vec<ToolkitConfig>,
    pub http_tools: Vec<HttpToolConfig>,
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            toolkits: Vec::new(),
            http_tools: Vec::new(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Fill missing credentials from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Fill missing credentials using `lookup`.
    ///
    /// A configured value always wins over the environment. When no toolkit
    /// of a kind is configured but its token variable is set, a default
    /// toolkit of that kind is added.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        for kit in &mut self.toolkits {
            let (token_key, oauth2_key) = kit.kind.env_keys();
            if is_blank(&kit.settings.token) {
                if let Some(token) = lookup(token_key) {
                    kit.settings.token = Some(token);
                }
            }
            if is_blank(&kit.settings.oauth2) {
                if let Some(oauth2) = lookup(oauth2_key) {
                    kit.settings.oauth2 = Some(oauth2);
                }
            }
        }

        let kind = ToolkitKind::Figma;
        if !self.toolkits.iter().any(|k| k.kind == kind) {
            let (token_key, oauth2_key) = kind.env_keys();
            let settings = ToolSettings {
                token: lookup(token_key),
                oauth2: lookup(oauth2_key),
                ..Default::default()
            };
            if settings.token.is_some() || settings.oauth2.is_some() {
                tracing::debug!(kind = kind.as_str(), "adding toolkit from environment");
                self.toolkits.push(ToolkitConfig::new(kind, settings));
            }
        }
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

/// Helper struct for storing the location to read/write global settings
pub struct ConfigStore {
    path: PathBuf,
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore {
    pub fn new() -> Self {
        let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(".clamp");
        path.push("config.json");
        Self { path }
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the saved config; a missing file yields the default config.
    pub fn try_load(&self) -> Result<Config, CoreError> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Config::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Load the saved config, or fallback to Default
    pub fn load(&self) -> Config {
        match self.try_load() {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "ignoring unreadable config");
                Config::default()
            }
        }
    }

    /// Save the config back to disk
    pub fn save(&self, config: &Config) -> Result<(), CoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(config)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}
