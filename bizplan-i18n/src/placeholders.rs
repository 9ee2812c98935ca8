//! Interpolation placeholder parity between locales.
//!
//! The site substitutes both `{name}` and `{{name}}` at render time, so a
//! translation that drops or renames a placeholder renders a raw brace.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeSet;

use crate::tree::{is_blank_string, lookup};

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{?\s*([A-Za-z_][A-Za-z0-9_.]*)\s*\}?\}").expect("placeholder pattern compiles")
});

/// A string whose placeholder names differ from the base locale's.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaceholderMismatch {
    pub key: String,
    pub expected: Vec<String>,
    pub actual: Vec<String>,
}

/// Placeholder names used in `text`, deduplicated and sorted.
#[must_use]
pub fn placeholders(text: &str) -> BTreeSet<String> {
    PLACEHOLDER
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|name| name.as_str().to_string())
        .collect()
}

/// Compare placeholders for every base string leaf that the target translates.
///
/// Absent and blank target strings are skipped; those are missing keys and
/// empty values respectively.
#[must_use]
pub fn compare_placeholders(
    base_keys: &[String],
    base: &Value,
    target: &Value,
) -> Vec<PlaceholderMismatch> {
    base_keys
        .iter()
        .filter_map(|key| {
            let base_text = lookup(base, key)?.as_str()?;
            let target_value = lookup(target, key)?;
            if is_blank_string(target_value) {
                return None;
            }
            let target_text = target_value.as_str()?;
            let expected = placeholders(base_text);
            let actual = placeholders(target_text);
            (expected != actual).then(|| PlaceholderMismatch {
                key: key.clone(),
                expected: expected.into_iter().collect(),
                actual: actual.into_iter().collect(),
            })
        })
        .collect()
}
