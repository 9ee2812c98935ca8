//! Translation tree primitives.
//!
//! A translation tree is a `serde_json::Value`: a closed sum of leaves
//! (string, number, boolean, null), sequences and mappings. Mapping order
//! follows the source document because the workspace enables serde_json's
//! `preserve_order` feature.

use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// One locale's translation tree.
pub type TranslationTree = Value;

/// Runtime kind of a tree node, named the way the site's JSON is described.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    String,
    Number,
    Boolean,
    Null,
    Object,
    Array,
}

impl ValueKind {
    #[must_use]
    pub const fn of(value: &Value) -> Self {
        match value {
            Value::String(_) => Self::String,
            Value::Number(_) => Self::Number,
            Value::Bool(_) => Self::Boolean,
            Value::Null => Self::Null,
            Value::Object(_) => Self::Object,
            Value::Array(_) => Self::Array,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Null => "null",
            Self::Object => "object",
            Self::Array => "array",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Append a mapping key or sequence index to a key path.
#[must_use]
pub fn join_path(parent: &str, segment: &str) -> String {
    if parent.is_empty() {
        segment.to_string()
    } else {
        format!("{parent}.{segment}")
    }
}

/// Walk `path` through `tree`, treating numeric segments as sequence indices.
///
/// The empty path addresses the root.
#[must_use]
pub fn lookup<'a>(tree: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(tree);
    }

    let mut current = tree;
    for segment in path.split('.') {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// A string leaf with nothing but whitespace counts as untranslated.
#[must_use]
pub fn is_blank_string(value: &Value) -> bool {
    value.as_str().is_some_and(|s| s.trim().is_empty())
}
