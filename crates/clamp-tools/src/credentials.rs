//! Credential resolution: picks exactly one authentication header per call.

use crate::config::ToolConfig;
use crate::error::ToolError;
use clamp_client::AuthHeader;
use secrecy::{ExposeSecret, SecretString};

/// How a personal access token is presented to the upstream API.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TokenScheme {
    /// `Authorization: Bearer <token>`
    #[default]
    Bearer,
    /// `<name>: <token>`, e.g. `X-Figma-Token`
    Header(String),
}

impl TokenScheme {
    /// Scheme for an optional custom header name.
    pub fn from_header(name: Option<&str>) -> Self {
        match name.map(str::trim).filter(|n| !n.is_empty()) {
            Some(name) => TokenScheme::Header(name.to_string()),
            None => TokenScheme::Bearer,
        }
    }
}

/// Which credential a call ends up using.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialKind {
    Token,
    OAuth2,
}

/// Select the credential: `token` wins whenever present.
pub fn select_credential(config: &ToolConfig) -> Result<(CredentialKind, &SecretString), ToolError> {
    if let Some(token) = config.token() {
        return Ok((CredentialKind::Token, token));
    }
    if let Some(oauth2) = config.oauth2() {
        return Ok((CredentialKind::OAuth2, oauth2));
    }
    Err(ToolError::config("no credential supplied"))
}

/// Resolve the single header/value pair a call authenticates with.
pub fn resolve_credential(config: &ToolConfig) -> Result<AuthHeader, ToolError> {
    let (kind, secret) = select_credential(config)?;
    let header = match (kind, config.token_scheme()) {
        (CredentialKind::Token, TokenScheme::Header(name)) => {
            AuthHeader::new(name.clone(), secret.expose_secret())
        }
        (CredentialKind::Token, TokenScheme::Bearer) | (CredentialKind::OAuth2, _) => {
            AuthHeader::new("Authorization", format!("Bearer {}", secret.expose_secret()))
        }
    };
    Ok(header)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(token: Option<&str>, oauth2: Option<&str>) -> ToolConfig {
        let mut builder = ToolConfig::builder();
        if let Some(token) = token {
            builder = builder.token(token);
        }
        if let Some(oauth2) = oauth2 {
            builder = builder.oauth2(oauth2);
        }
        builder.build().unwrap()
    }

    #[test]
    fn test_token_only() {
        let header = resolve_credential(&config(Some("tok"), None)).unwrap();
        assert_eq!(header.name, "Authorization");
        assert_eq!(header.value.expose_secret(), "Bearer tok");
    }

    #[test]
    fn test_oauth2_only() {
        let cfg = config(None, Some("oa"));
        assert_eq!(select_credential(&cfg).unwrap().0, CredentialKind::OAuth2);
        let header = resolve_credential(&cfg).unwrap();
        assert_eq!(header.value.expose_secret(), "Bearer oa");
    }

    #[test]
    fn test_token_wins_over_oauth2() {
        let cfg = config(Some("tok"), Some("oa"));
        let (kind, secret) = select_credential(&cfg).unwrap();
        assert_eq!(kind, CredentialKind::Token);
        assert_eq!(secret.expose_secret(), "tok");
    }

    #[test]
    fn test_missing_credential() {
        let err = resolve_credential(&config(None, None)).unwrap_err();
        assert!(matches!(err, ToolError::Configuration(ref m) if m == "no credential supplied"));

        let err = resolve_credential(&config(Some(""), Some("  "))).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_custom_token_header() {
        let cfg = config(Some("tok"), Some("oa"))
            .with_token_scheme(TokenScheme::from_header(Some("X-Figma-Token")));
        let header = resolve_credential(&cfg).unwrap();
        assert_eq!(header.name, "X-Figma-Token");
        assert_eq!(header.value.expose_secret(), "tok");

        // OAuth2 always goes through Authorization.
        let cfg = config(None, Some("oa"))
            .with_token_scheme(TokenScheme::from_header(Some("X-Figma-Token")));
        let header = resolve_credential(&cfg).unwrap();
        assert_eq!(header.name, "Authorization");
        assert_eq!(header.value.expose_secret(), "Bearer oa");
    }

    #[test]
    fn test_scheme_from_blank_header() {
        assert_eq!(TokenScheme::from_header(Some("  ")), TokenScheme::Bearer);
        assert_eq!(TokenScheme::from_header(None), TokenScheme::Bearer);
    }
}
