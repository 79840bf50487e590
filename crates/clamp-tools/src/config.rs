//! Per-tool configuration: the loose settings surface and its validated form.

use crate::credentials::TokenScheme;
use crate::error::ToolError;
use crate::params::{FilterPattern, LimitValue};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroUsize;

/// Credential and bounding settings as written in a config file.
///
/// `global_limit` accepts `10000` or `"10000"`. An empty `global_regexp`
/// disables filtering.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oauth2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global_limit: Option<LimitValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global_regexp: Option<String>,
}

impl fmt::Debug for ToolSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolSettings")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("oauth2", &self.oauth2.as_ref().map(|_| "[REDACTED]"))
            .field("global_limit", &self.global_limit)
            .field("global_regexp", &self.global_regexp)
            .finish()
    }
}

/// Validated, immutable tool configuration.
///
/// Built once when a tool is registered and shared read-only by every call.
#[derive(Debug, Clone)]
pub struct ToolConfig {
    token: Option<SecretString>,
    oauth2: Option<SecretString>,
    token_scheme: TokenScheme,
    global_limit: Option<NonZeroUsize>,
    global_regexp: Option<FilterPattern>,
}

impl ToolConfig {
    pub fn builder() -> ToolConfigBuilder {
        ToolConfigBuilder::default()
    }

    /// Validate settings: parse the limit and compile the pattern once.
    ///
    /// Credentials are checked later by the credential resolver so that a
    /// missing credential is reported the same way on every path.
    pub fn from_settings(settings: &ToolSettings) -> Result<Self, ToolError> {
        let global_limit = settings
            .global_limit
            .as_ref()
            .map(LimitValue::parse)
            .transpose()?;
        let global_regexp = FilterPattern::compile_optional(settings.global_regexp.as_deref())?;

        Ok(Self {
            token: non_blank_secret(settings.token.as_deref()),
            oauth2: non_blank_secret(settings.oauth2.as_deref()),
            token_scheme: TokenScheme::default(),
            global_limit,
            global_regexp,
        })
    }

    /// Change how the personal token is sent upstream.
    pub fn with_token_scheme(mut self, scheme: TokenScheme) -> Self {
        self.token_scheme = scheme;
        self
    }

    pub fn token(&self) -> Option<&SecretString> {
        self.token.as_ref()
    }

    pub fn oauth2(&self) -> Option<&SecretString> {
        self.oauth2.as_ref()
    }

    pub fn token_scheme(&self) -> &TokenScheme {
        &self.token_scheme
    }

    pub fn global_limit(&self) -> Option<NonZeroUsize> {
        self.global_limit
    }

    pub fn global_regexp(&self) -> Option<&FilterPattern> {
        self.global_regexp.as_ref()
    }
}

fn non_blank_secret(value: Option<&str>) -> Option<SecretString> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(|v| SecretString::from(v.to_string()))
}

/// Builder for `ToolConfig`, mostly for code-defined tools and tests.
#[derive(Debug, Default)]
pub struct ToolConfigBuilder {
    settings: ToolSettings,
    token_scheme: TokenScheme,
}

impl ToolConfigBuilder {
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.settings.token = Some(token.into());
        self
    }

    pub fn oauth2(mut self, oauth2: impl Into<String>) -> Self {
        self.settings.oauth2 = Some(oauth2.into());
        self
    }

    pub fn global_limit(mut self, limit: impl Into<LimitValue>) -> Self {
        self.settings.global_limit = Some(limit.into());
        self
    }

    pub fn global_regexp(mut self, pattern: impl Into<String>) -> Self {
        self.settings.global_regexp = Some(pattern.into());
        self
    }

    pub fn token_scheme(mut self, scheme: TokenScheme) -> Self {
        self.token_scheme = scheme;
        self
    }

    pub fn build(self) -> Result<ToolConfig, ToolError> {
        Ok(ToolConfig::from_settings(&self.settings)?.with_token_scheme(self.token_scheme))
    }
}
