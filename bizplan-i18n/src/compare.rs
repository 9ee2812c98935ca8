//! Structural comparison of a target locale against the base locale.
//!
//! Everything here is pure: trees come in already loaded and findings go out
//! as data. Load failures are handled by the caller (see [`crate::validate`]).

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use crate::config::CheckConfig;
use crate::keys::{KeyIndex, extract_keys};
use crate::placeholders::{PlaceholderMismatch, compare_placeholders};
use crate::tree::{ValueKind, is_blank_string, join_path, lookup};
use crate::types::{TypeDescriptor, TypeMap, build_type_map};

static INDEXED_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<parent>.+)\.\d+$").expect("indexed path pattern compiles"));

/// A key whose target value has a different type than the base value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeMismatch {
    pub key: String,
    pub expected: TypeDescriptor,
    pub actual: TypeDescriptor,
}

/// Findings for one target locale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ComparisonResult {
    pub locale: String,
    pub missing_keys: Vec<String>,
    pub type_mismatches: Vec<TypeMismatch>,
    pub extra_keys: Vec<String>,
    pub empty_values: Vec<String>,
    pub placeholder_mismatches: Vec<PlaceholderMismatch>,
}

impl ComparisonResult {
    /// Missing keys, type mismatches and schema drift always fail a run.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.missing_keys.is_empty()
            || !self.type_mismatches.is_empty()
            || !self.extra_keys.is_empty()
    }

    /// Empty values and placeholder drift only fail a strict run.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.empty_values.is_empty() || !self.placeholder_mismatches.is_empty()
    }

    #[must_use]
    pub fn is_clean(&self, strict: bool) -> bool {
        !self.has_errors() && !(strict && self.has_warnings())
    }

    #[must_use]
    pub fn issue_count(&self) -> usize {
        self.missing_keys.len()
            + self.type_mismatches.len()
            + self.extra_keys.len()
            + self.empty_values.len()
            + self.placeholder_mismatches.len()
    }
}

/// The base locale's tree with its keys and type map computed once per run.
#[derive(Debug, Clone)]
pub struct BaseSchema {
    pub locale: String,
    pub tree: Value,
    pub keys: Vec<String>,
    pub index: KeyIndex,
    pub types: TypeMap,
}

impl BaseSchema {
    #[must_use]
    pub fn new(locale: impl Into<String>, tree: Value) -> Self {
        let keys = extract_keys(&tree, "");
        let index = KeyIndex::new(keys.iter().cloned());
        let types = build_type_map(&tree);
        Self {
            locale: locale.into(),
            tree,
            keys,
            index,
            types,
        }
    }
}

/// Whether `key` counts as present in the target.
///
/// Array element paths are reconciled loosely: `parent.N` is present when the
/// target has any element under `parent`, so locales may carry lists of
/// different lengths. A base leaf that the target expands into a list is also
/// present.
#[must_use]
pub fn is_present(key: &str, target: &KeyIndex) -> bool {
    if target.contains(key) {
        return true;
    }
    if let Some(caps) = INDEXED_PATH.captures(key)
        && target.has_indexed_child(&caps["parent"])
    {
        return true;
    }
    target.has_indexed_child(key)
}

/// Base keys not present in the target, in base order.
#[must_use]
pub fn missing_keys(base_keys: &[String], target: &KeyIndex) -> Vec<String> {
    base_keys
        .iter()
        .filter(|key| !is_present(key, target))
        .cloned()
        .collect()
}

/// Target keys absent from the base, limited to the sensitive namespaces.
///
/// Uses exact key paths; the loose array reconciliation of [`missing_keys`]
/// does not apply here.
#[must_use]
pub fn extra_keys(base: &KeyIndex, target_keys: &[String], prefixes: &[String]) -> Vec<String> {
    target_keys
        .iter()
        .filter(|key| !base.contains(key))
        .filter(|key| prefixes.iter().any(|prefix| key.starts_with(prefix.as_str())))
        .cloned()
        .collect()
}

/// Compare each base type entry with the value at the same path in `target`.
///
/// Absent target values are skipped; [`missing_keys`] reports those.
/// When both sides hold non-empty sequences with different element kinds the
/// mismatch is reported once as `key[*]` and nothing beneath that sequence is
/// reported again. An empty target sequence is always compatible.
#[must_use]
pub fn compare_types(base: &TypeMap, target: &Value) -> Vec<TypeMismatch> {
    let mut mismatches = Vec::new();
    let mut reported_arrays: Vec<&str> = Vec::new();

    for (key, expected) in base.iter() {
        if reported_arrays.iter().any(|parent| is_beneath(key, parent)) {
            continue;
        }
        let Some(value) = lookup(target, key) else {
            continue;
        };
        let actual = TypeDescriptor::of(value);

        if expected.kind != actual.kind {
            mismatches.push(TypeMismatch {
                key: key.to_string(),
                expected: *expected,
                actual,
            });
            continue;
        }

        if let Value::Array(items) = value
            && let Some(mismatch) = element_mismatch(base, key, items)
        {
            mismatches.push(mismatch);
            reported_arrays.push(key);
        }
    }

    mismatches
}

fn element_mismatch(base: &TypeMap, key: &str, items: &[Value]) -> Option<TypeMismatch> {
    let base_len = base.array_len(key).filter(|&len| len > 0)?;

    items.iter().enumerate().find_map(|(index, item)| {
        let position = if index < base_len { index } else { 0 };
        let expected = base_element(base, key, position);
        let actual = TypeDescriptor::of(item);
        (expected.kind != actual.kind).then(|| TypeMismatch {
            key: format!("{key}[*]"),
            expected,
            actual,
        })
    })
}

// Objects get no type map entry of their own, so a missing element entry
// inside the sequence bounds means the element is a mapping.
fn base_element(base: &TypeMap, key: &str, position: usize) -> TypeDescriptor {
    base.get(&join_path(key, &position.to_string()))
        .copied()
        .unwrap_or(TypeDescriptor::scalar(ValueKind::Object))
}

fn is_beneath(key: &str, parent: &str) -> bool {
    if parent.is_empty() {
        return !key.is_empty();
    }
    key.len() > parent.len() && key.starts_with(parent) && key.as_bytes()[parent.len()] == b'.'
}

/// Base string leaves the target holds as blank strings.
#[must_use]
pub fn empty_values(base: &BaseSchema, target: &Value) -> Vec<String> {
    base.keys
        .iter()
        .filter(|key| {
            lookup(&base.tree, key).is_some_and(|v| v.is_string() && !is_blank_string(v))
                && lookup(target, key).is_some_and(is_blank_string)
        })
        .cloned()
        .collect()
}

/// Run every comparison for one target locale.
#[must_use]
pub fn compare_locale(
    locale: &str,
    base: &BaseSchema,
    target: &Value,
    config: &CheckConfig,
) -> ComparisonResult {
    let target_keys = extract_keys(target, "");
    let target_index = KeyIndex::new(target_keys.iter().cloned());
    log::debug!(
        "comparing {locale}: {} target keys against {} base keys",
        target_index.len(),
        base.keys.len()
    );

    let placeholder_mismatches = if config.check_placeholders {
        compare_placeholders(&base.keys, &base.tree, target)
    } else {
        Vec::new()
    };

    ComparisonResult {
        locale: locale.to_string(),
        missing_keys: missing_keys(&base.keys, &target_index),
        type_mismatches: compare_types(&base.types, target),
        extra_keys: extra_keys(&base.index, &target_keys, &config.sensitive_prefixes),
        empty_values: empty_values(base, target),
        placeholder_mismatches,
    }
}
