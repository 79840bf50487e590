//! Parameter binding: merges call overrides, tool defaults and hard defaults
//! into the limit/pattern pair one invocation uses.

use crate::config::ToolConfig;
use crate::error::ToolError;
use regex::{Regex, RegexBuilder};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// Character cap used when neither the call nor the tool sets one.
pub const DEFAULT_LIMIT: usize = 10_000;

/// Upper bound on a compiled filter program, in bytes.
const PATTERN_SIZE_LIMIT: usize = 1 << 20;

/// A limit as written in configuration or tool arguments: `10000` or `"10000"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum LimitValue {
    Number(i64),
    Text(String),
}

impl LimitValue {
    /// Parse into a positive character count.
    pub fn parse(&self) -> Result<NonZeroUsize, ToolError> {
        let value = match self {
            LimitValue::Number(n) => *n,
            LimitValue::Text(s) => s.trim().parse::<i64>().map_err(|_| {
                ToolError::config(format!("limit must be > 0, got {s:?}"))
            })?,
        };
        if value <= 0 {
            return Err(ToolError::config(format!("limit must be > 0, got {value}")));
        }
        usize::try_from(value)
            .ok()
            .and_then(NonZeroUsize::new)
            .ok_or_else(|| ToolError::config(format!("limit out of range: {value}")))
    }
}

impl From<i64> for LimitValue {
    fn from(n: i64) -> Self {
        LimitValue::Number(n)
    }
}

impl From<usize> for LimitValue {
    fn from(n: usize) -> Self {
        LimitValue::Number(i64::try_from(n).unwrap_or(i64::MAX))
    }
}

impl From<&str> for LimitValue {
    fn from(s: &str) -> Self {
        LimitValue::Text(s.to_string())
    }
}

/// A compiled removal pattern, shared cheaply across invocations.
///
/// Backed by the `regex` crate, so matching is linear in the input size.
/// Look-around and backreferences are rejected at compile time.
#[derive(Debug, Clone)]
pub struct FilterPattern(Arc<Regex>);

impl FilterPattern {
    pub fn compile(pattern: &str) -> Result<Self, ToolError> {
        RegexBuilder::new(pattern)
            .size_limit(PATTERN_SIZE_LIMIT)
            .build()
            .map(|re| Self(Arc::new(re)))
            .map_err(|e| ToolError::config(format!("invalid filter pattern: {e}")))
    }

    /// Compile an optional pattern; empty strings mean "no filtering".
    pub fn compile_optional(pattern: Option<&str>) -> Result<Option<Self>, ToolError> {
        match pattern {
            Some(p) if !p.is_empty() => Self::compile(p).map(Some),
            _ => Ok(None),
        }
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.0.is_match(text)
    }

    /// Remove every non-overlapping match.
    pub fn remove_all<'t>(&self, text: &'t str) -> std::borrow::Cow<'t, str> {
        self.0.replace_all(text, regex::NoExpand(""))
    }
}

impl PartialEq for FilterPattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

/// Per-call overrides ("extra params") supplied next to the API arguments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallParams {
    /// Overrides the tool's `global_limit` for this call.
    #[serde(default)]
    pub limit: Option<LimitValue>,
    /// Overrides the tool's `global_regexp` for this call.
    #[serde(default)]
    pub regexp: Option<String>,
}

impl CallParams {
    pub fn with_limit(mut self, limit: impl Into<LimitValue>) -> Self {
        self.limit = Some(limit.into());
        self
    }

    pub fn with_regexp(mut self, regexp: impl Into<String>) -> Self {
        self.regexp = Some(regexp.into());
        self
    }

    /// Remove `limit` and `regexp` from a tool's argument object.
    ///
    /// `null` values count as absent. Anything left in `args` is meant for the
    /// upstream API.
    pub fn extract(args: &mut Value) -> Result<Self, ToolError> {
        let Some(map) = args.as_object_mut() else {
            return Ok(Self::default());
        };

        let limit = match map.remove("limit") {
            None | Some(Value::Null) => None,
            Some(value) => Some(serde_json::from_value::<LimitValue>(value).map_err(|e| {
                ToolError::InvalidParameters(format!("limit must be an integer: {e}"))
            })?),
        };
        let regexp = match map.remove("regexp") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s),
            Some(other) => {
                return Err(ToolError::InvalidParameters(format!(
                    "regexp must be a string, got {other}"
                )))
            }
        };

        Ok(Self { limit, regexp })
    }
}

/// The resolved `{limit, pattern}` pair used by exactly one invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveParams {
    pub limit: NonZeroUsize,
    pub pattern: Option<FilterPattern>,
}

impl EffectiveParams {
    /// Build directly from raw values, with the same validation as `bind`.
    pub fn new(limit: impl Into<LimitValue>, regexp: Option<&str>) -> Result<Self, ToolError> {
        Ok(Self {
            limit: limit.into().parse()?,
            pattern: FilterPattern::compile_optional(regexp)?,
        })
    }

    pub fn limit(&self) -> usize {
        self.limit.get()
    }
}

/// Resolve effective parameters: call override > tool default > hard default.
///
/// Fails eagerly on a non-positive limit or an invalid pattern, before any
/// upstream work happens.
pub fn bind(tool: &ToolConfig, call: &CallParams) -> Result<EffectiveParams, ToolError> {
    let limit = match call.limit {
        Some(ref value) => value.parse()?,
        None => tool
            .global_limit()
            .or(NonZeroUsize::new(DEFAULT_LIMIT))
            .ok_or_else(|| ToolError::config("limit must be > 0"))?,
    };

    let pattern = match call.regexp.as_deref() {
        Some(p) if !p.is_empty() => Some(FilterPattern::compile(p)?),
        _ => tool.global_regexp().cloned(),
    };

    Ok(EffectiveParams { limit, pattern })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tool_with(limit: Option<i64>, regexp: Option<&str>) -> ToolConfig {
        let mut builder = ToolConfig::builder().token("t");
        if let Some(limit) = limit {
            builder = builder.global_limit(limit);
        }
        if let Some(regexp) = regexp {
            builder = builder.global_regexp(regexp);
        }
        builder.build().unwrap()
    }

    #[test]
    fn test_limit_value_parses_strings_and_numbers() {
        assert_eq!(LimitValue::from("10000").parse().unwrap().get(), 10000);
        assert_eq!(LimitValue::from(" 42 ").parse().unwrap().get(), 42);
        assert_eq!(LimitValue::from(7i64).parse().unwrap().get(), 7);
    }

    #[test]
    fn test_limit_value_rejects_non_positive() {
        for value in [LimitValue::from(0i64), LimitValue::from(-1i64), LimitValue::from("-5"), LimitValue::from("0")] {
            let err = value.parse().unwrap_err();
            assert!(err.is_configuration());
            assert!(err.to_string().contains("limit must be > 0"));
        }
    }

    #[test]
    fn test_limit_value_rejects_garbage() {
        let err = LimitValue::from("ten").parse().unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_bind_call_limit_overrides_tool() {
        let tool = tool_with(Some(500), None);
        for limit in [1i64, 10, 500, 123_456] {
            let params = bind(&tool, &CallParams::default().with_limit(limit)).unwrap();
            assert_eq!(params.limit() as i64, limit);
        }
    }

    #[test]
    fn test_bind_falls_back_to_tool_then_default() {
        let tool = tool_with(Some(500), None);
        assert_eq!(bind(&tool, &CallParams::default()).unwrap().limit(), 500);

        let tool = tool_with(None, None);
        assert_eq!(bind(&tool, &CallParams::default()).unwrap().limit(), DEFAULT_LIMIT);
    }

    #[test]
    fn test_bind_string_global_limit() {
        let tool = ToolConfig::builder()
            .token("t")
            .global_limit("10000")
            .build()
            .unwrap();
        let params = bind(&tool, &CallParams::default()).unwrap();
        assert_eq!(params.limit(), 10000);
    }

    #[test]
    fn test_bind_rejects_non_positive_call_limit() {
        let tool = tool_with(None, None);
        for limit in [0i64, -1, -10_000] {
            let err = bind(&tool, &CallParams::default().with_limit(limit)).unwrap_err();
            assert!(matches!(err, ToolError::Configuration(ref m) if m.contains("limit must be > 0")));
        }
    }

    #[test]
    fn test_bind_pattern_precedence() {
        let tool = tool_with(None, Some("tool"));
        let params = bind(&tool, &CallParams::default()).unwrap();
        assert_eq!(params.pattern.unwrap().as_str(), "tool");

        let params = bind(&tool, &CallParams::default().with_regexp("call")).unwrap();
        assert_eq!(params.pattern.unwrap().as_str(), "call");

        // Empty call pattern falls through to the tool default.
        let params = bind(&tool, &CallParams::default().with_regexp("")).unwrap();
        assert_eq!(params.pattern.unwrap().as_str(), "tool");

        let tool = tool_with(None, None);
        assert!(bind(&tool, &CallParams::default()).unwrap().pattern.is_none());
    }

    #[test]
    fn test_bind_rejects_invalid_pattern() {
        let tool = tool_with(None, None);
        let err = bind(&tool, &CallParams::default().with_regexp("[invalid")).unwrap_err();
        assert!(matches!(err, ToolError::Configuration(ref m) if m.contains("invalid filter pattern")));
    }

    #[test]
    fn test_bind_rejects_lookaround() {
        let tool = tool_with(None, None);
        let err = bind(&tool, &CallParams::default().with_regexp(r"a(?=b)")).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_extract_splits_extra_params() {
        let mut args = json!({"file_key": "abc", "limit": "200", "regexp": "\"id\":\\d+"});
        let call = CallParams::extract(&mut args).unwrap();

        assert_eq!(call.limit, Some(LimitValue::Text("200".to_string())));
        assert_eq!(call.regexp.as_deref(), Some("\"id\":\\d+"));
        assert_eq!(args, json!({"file_key": "abc"}));
    }

    #[test]
    fn test_extract_treats_null_as_absent() {
        let mut args = json!({"limit": null, "regexp": null});
        let call = CallParams::extract(&mut args).unwrap();
        assert_eq!(call, CallParams::default());

        let mut args = serde_json::Value::Null;
        assert_eq!(CallParams::extract(&mut args).unwrap(), CallParams::default());
    }

    #[test]
    fn test_extract_rejects_wrong_types() {
        let mut args = json!({"regexp": 5});
        assert!(matches!(
            CallParams::extract(&mut args),
            Err(ToolError::InvalidParameters(_))
        ));

        let mut args = json!({"limit": [1]});
        assert!(matches!(
            CallParams::extract(&mut args),
            Err(ToolError::InvalidParameters(_))
        ));
    }

    #[test]
    fn test_effective_params_new() {
        let params = EffectiveParams::new(100usize, Some("x+")).unwrap();
        assert_eq!(params.limit(), 100);
        assert!(params.pattern.unwrap().is_match("xxx"));

        assert!(EffectiveParams::new(0usize, None).is_err());
        assert!(EffectiveParams::new(10usize, Some("(")).is_err());
        assert!(EffectiveParams::new(10usize, Some("")).unwrap().pattern.is_none());
    }
}
