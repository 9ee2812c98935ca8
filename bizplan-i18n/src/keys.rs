//! Flattening translation trees into dotted key paths.

use serde_json::Value;
use std::collections::HashSet;

use crate::tree::join_path;

/// Flatten `tree` into the key paths of its leaves, depth first in input order.
///
/// Mappings contribute `parent.key`, sequences `parent.index`. Every leaf,
/// `null` included, emits its own path; empty mappings and sequences emit
/// nothing.
#[must_use]
pub fn extract_keys(tree: &Value, parent_path: &str) -> Vec<String> {
    let mut keys = Vec::new();
    collect_keys(tree, parent_path, &mut keys);
    keys
}

fn collect_keys(value: &Value, path: &str, out: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                collect_keys(child, &join_path(path, key), out);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                collect_keys(child, &join_path(path, &index.to_string()), out);
            }
        }
        Value::String(_) | Value::Number(_) | Value::Bool(_) | Value::Null => {
            out.push(path.to_string());
        }
    }
}

/// True when a path segment is a sequence index.
#[must_use]
pub fn is_index_segment(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}

/// Lookup structure over one tree's extracted keys.
///
/// Besides exact membership it records every path that has an indexed child,
/// so `has_indexed_child("a.b")` answers the same question as matching
/// `^a\.b\.\d+(\.|$)` against every key.
#[derive(Debug, Clone, Default)]
pub struct KeyIndex {
    keys: HashSet<String>,
    indexed_parents: HashSet<String>,
}

impl KeyIndex {
    pub fn new<I>(keys: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut index = Self::default();
        for key in keys {
            record_indexed_parents(&key, &mut index.indexed_parents);
            index.keys.insert(key);
        }
        index
    }

    #[must_use]
    pub fn from_tree(tree: &Value) -> Self {
        Self::new(extract_keys(tree, ""))
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    #[must_use]
    pub fn has_indexed_child(&self, parent: &str) -> bool {
        self.indexed_parents.contains(parent)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

fn record_indexed_parents(key: &str, parents: &mut HashSet<String>) {
    let mut offset = 0;
    for segment in key.split('.') {
        if offset > 0 && is_index_segment(segment) {
            parents.insert(key[..offset - 1].to_string());
        }
        offset += segment.len() + 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeSet;

    #[test]
    fn flattens_leaves_only() {
        let tree = json!({ "a": { "b": 1, "c": [2, 3] }, "d": "x" });
        let keys: BTreeSet<String> = extract_keys(&tree, "").into_iter().collect();
        let expected: BTreeSet<String> = ["a.b", "a.c.0", "a.c.1", "d"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(keys, expected);
    }

    #[test]
    fn follows_input_order() {
        let tree: Value =
            serde_json::from_str(r#"{ "zeta": 1, "alpha": { "b": 2, "a": 3 } }"#).unwrap();
        assert_eq!(extract_keys(&tree, ""), vec!["zeta", "alpha.b", "alpha.a"]);
    }

    #[test]
    fn empty_containers_are_invisible() {
        let tree = json!({ "empty_map": {}, "empty_list": [], "kept": null });
        assert_eq!(extract_keys(&tree, ""), vec!["kept"]);
    }

    #[test]
    fn parent_prefix_is_applied() {
        let tree = json!({ "title": "Markt" });
        assert_eq!(extract_keys(&tree, "bp"), vec!["bp.title"]);
        assert_eq!(extract_keys(&json!("leaf"), "bp.title"), vec!["bp.title"]);
    }

    #[test]
    fn heterogeneous_rows_flatten_by_index() {
        let tree = json!({ "tables": { "rows": [["Year 1", 120, 0.4]] } });
        assert_eq!(
            extract_keys(&tree, ""),
            vec!["tables.rows.0.0", "tables.rows.0.1", "tables.rows.0.2"]
        );
    }

    #[test]
    fn key_index_tracks_indexed_parents() {
        let index = KeyIndex::new(vec![
            "content.segments.0.share".to_string(),
            "list.3".to_string(),
            "0.root".to_string(),
            "plain.key".to_string(),
        ]);
        assert!(index.contains("list.3"));
        assert!(index.has_indexed_child("content.segments"));
        assert!(index.has_indexed_child("list"));
        assert!(!index.has_indexed_child(""));
        assert!(!index.has_indexed_child("plain"));
        assert!(!index.has_indexed_child("content"));
        assert_eq!(index.len(), 4);
    }

    #[test]
    fn index_segments_are_all_digits() {
        assert!(is_index_segment("0"));
        assert!(is_index_segment("42"));
        assert!(!is_index_segment(""));
        assert!(!is_index_segment("4a"));
    }
}
