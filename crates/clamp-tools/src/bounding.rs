//! Output bounding engine: filter, then truncate, then check structure.
//!
//! Filtering runs on the full payload first so that `limit` bounds the final
//! size rather than the pre-filter size. The engine never fails: output that
//! no longer parses is returned as-is with `well_formed = false`.

use crate::params::{EffectiveParams, FilterPattern};
use clamp_client::PayloadFormat;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::borrow::Cow;

static TRAILING_COMMA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",\s*([\]}])").expect("static pattern should compile"));
static LEADING_COMMA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([\[{])\s*,").expect("static pattern should compile"));

/// Result of bounding one raw payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoundedResult {
    /// Bounded output text.
    pub text: String,
    /// Whether the filtered text exceeded the limit and was cut.
    pub truncated: bool,
    /// Whether a filter pattern was applied.
    pub filtered: bool,
    /// Whether `text` still parses as the declared format.
    pub well_formed: bool,
    /// Character count of the raw payload.
    pub original_len: usize,
    /// Character count after filtering, before truncation.
    pub filtered_len: usize,
}

impl BoundedResult {
    /// Metadata view, without the text.
    pub fn metadata(&self) -> serde_json::Value {
        serde_json::json!({
            "truncated": self.truncated,
            "filtered": self.filtered,
            "well_formed": self.well_formed,
            "original_len": self.original_len,
            "filtered_len": self.filtered_len,
        })
    }
}

/// Bound a payload whose format is guessed from its first character.
pub fn bound(raw: &str, params: &EffectiveParams) -> BoundedResult {
    bound_as(raw, params, PayloadFormat::detect(raw))
}

/// Bound a payload of a declared format.
pub fn bound_as(raw: &str, params: &EffectiveParams, format: PayloadFormat) -> BoundedResult {
    let original_len = raw.chars().count();

    let filtered_text = match params.pattern {
        Some(ref pattern) => Cow::Owned(filter_text(raw, pattern, format)),
        None => Cow::Borrowed(raw),
    };
    let filtered_len = filtered_text.chars().count();

    let (text, truncated) = truncate_chars(&filtered_text, params.limit());
    let well_formed = is_well_formed(text, format);

    tracing::trace!(
        original_len,
        filtered_len,
        limit = params.limit(),
        truncated,
        well_formed,
        "bounded payload"
    );

    BoundedResult {
        text: text.to_string(),
        truncated,
        filtered: params.pattern.is_some(),
        well_formed,
        original_len,
        filtered_len,
    }
}

/// Remove every match of `pattern`. JSON payloads also get their dangling
/// commas repaired so a removed member does not leave `{,` or `,}` behind.
pub fn filter_text(raw: &str, pattern: &FilterPattern, format: PayloadFormat) -> String {
    let removed = pattern.remove_all(raw);
    match format {
        PayloadFormat::Json => repair_dangling_commas(&removed),
        PayloadFormat::Text => removed.into_owned(),
    }
}

fn repair_dangling_commas(text: &str) -> String {
    let trailing = TRAILING_COMMA.replace_all(text, "$1");
    LEADING_COMMA.replace_all(&trailing, "$1").into_owned()
}

/// Keep the first `limit` chars. Never splits a UTF-8 sequence.
pub fn truncate_chars(text: &str, limit: usize) -> (&str, bool) {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => (&text[..idx], true),
        None => (text, false),
    }
}

fn is_well_formed(text: &str, format: PayloadFormat) -> bool {
    match format {
        PayloadFormat::Json => serde_json::from_str::<serde::de::IgnoredAny>(text).is_ok(),
        PayloadFormat::Text => true,
    }
}
