//! Backfilling untranslated values from the base locale.

use serde_json::{Map, Value};

use crate::tree::{TranslationTree, join_path, lookup};

/// Merge `target` over the shape of `base`.
///
/// * string: the target string if it has non-whitespace content, else base;
/// * number, boolean, null: the target value whenever present, else base;
/// * sequence: a non-sequence target yields base. When base starts with a
///   mapping, only the target's first element is merged against it (an empty
///   target is seeded with one element); other sequences are taken from the
///   target unchanged;
/// * mapping: a copy of the target mapping with every base key merged in.
///   Target-only keys are carried through untouched.
///
/// Neither input is modified.
#[must_use]
pub fn fill_missing(base: &TranslationTree, target: Option<&TranslationTree>) -> TranslationTree {
    match base {
        Value::String(_) => match target {
            Some(Value::String(text)) if !text.trim().is_empty() => Value::String(text.clone()),
            _ => base.clone(),
        },
        Value::Number(_) | Value::Bool(_) | Value::Null => {
            target.cloned().unwrap_or_else(|| base.clone())
        }
        Value::Array(base_items) => {
            let Some(Value::Array(target_items)) = target else {
                return base.clone();
            };
            match base_items.first() {
                Some(template @ Value::Object(_)) => {
                    let seeded = fill_missing(template, target_items.first());
                    let mut merged = target_items.clone();
                    match merged.first_mut() {
                        Some(first) => *first = seeded,
                        None => merged.push(seeded),
                    }
                    Value::Array(merged)
                }
                _ => Value::Array(target_items.clone()),
            }
        }
        Value::Object(base_map) => {
            let mut out = match target {
                Some(Value::Object(target_map)) => target_map.clone(),
                _ => Map::new(),
            };
            for (key, base_child) in base_map {
                let merged = fill_missing(base_child, out.get(key));
                out.insert(key.clone(), merged);
            }
            Value::Object(out)
        }
    }
}

/// A merged tree and the key paths whose values came from the base locale.
#[derive(Debug, Clone, PartialEq)]
pub struct FillOutcome {
    pub tree: TranslationTree,
    pub backfilled_keys: Vec<String>,
    differs: bool,
}

impl FillOutcome {
    /// Whether the merged tree differs from the target it was built from.
    #[must_use]
    pub const fn changed(&self) -> bool {
        self.differs
    }
}

/// Run [`fill_missing`] and record which paths differ from the target.
///
/// Paths are leaves plus empty mappings and sequences, so a container taken
/// over from the base locale is listed even though it has no leaves.
#[must_use]
pub fn fill_with_report(base: &TranslationTree, target: &TranslationTree) -> FillOutcome {
    let tree = fill_missing(base, Some(target));
    let mut paths = Vec::new();
    collect_filled_paths(&tree, "", &mut paths);
    let backfilled_keys = paths
        .into_iter()
        .filter(|key| lookup(target, key) != lookup(&tree, key))
        .collect();
    let differs = tree != *target;
    FillOutcome {
        tree,
        backfilled_keys,
        differs,
    }
}

fn collect_filled_paths(value: &Value, path: &str, out: &mut Vec<String>) {
    match value {
        Value::Object(map) if !map.is_empty() => {
            for (key, child) in map {
                collect_filled_paths(child, &join_path(path, key), out);
            }
        }
        Value::Array(items) if !items.is_empty() => {
            for (index, child) in items.iter().enumerate() {
                collect_filled_paths(child, &join_path(path, &index.to_string()), out);
            }
        }
        _ => out.push(path.to_string()),
    }
}
