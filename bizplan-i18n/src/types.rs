//! Inferred type descriptors for every leaf and sequence in a tree.

use serde::{Serialize, Serializer};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

use crate::tree::{ValueKind, join_path};

/// Semantic type of the value at a key path.
///
/// Sequences carry the kind of their first element; an empty sequence has
/// no element kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeDescriptor {
    pub kind: ValueKind,
    pub element: Option<ValueKind>,
}

impl TypeDescriptor {
    #[must_use]
    pub const fn scalar(kind: ValueKind) -> Self {
        Self {
            kind,
            element: None,
        }
    }

    #[must_use]
    pub const fn array_of(element: Option<ValueKind>) -> Self {
        Self {
            kind: ValueKind::Array,
            element,
        }
    }

    /// Describe a single value without looking past its first element.
    #[must_use]
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Array(items) => Self::array_of(items.first().map(ValueKind::of)),
            other => Self::scalar(ValueKind::of(other)),
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind, self.element) {
            (ValueKind::Array, Some(element)) => write!(f, "{element}[]"),
            (kind, _) => write!(f, "{kind}"),
        }
    }
}

impl Serialize for TypeDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Ordered mapping from key path to type descriptor.
#[derive(Debug, Clone, Default)]
pub struct TypeMap {
    entries: Vec<(String, TypeDescriptor)>,
    positions: HashMap<String, usize>,
    array_lengths: HashMap<String, usize>,
}

impl TypeMap {
    fn insert(&mut self, key: String, descriptor: TypeDescriptor) {
        if let Some(&position) = self.positions.get(&key) {
            self.entries[position].1 = descriptor;
            return;
        }
        self.positions.insert(key.clone(), self.entries.len());
        self.entries.push((key, descriptor));
    }

    /// Element count of the sequence at `key`, if `key` is a sequence.
    #[must_use]
    pub fn array_len(&self, key: &str) -> Option<usize> {
        self.array_lengths.get(key).copied()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&TypeDescriptor> {
        self.positions.get(key).map(|&position| &self.entries[position].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TypeDescriptor)> {
        self.entries.iter().map(|(key, desc)| (key.as_str(), desc))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Record a descriptor for every leaf and every sequence in `tree`.
///
/// Leaves get their runtime kind. Sequences get `array` plus the kind of their
/// first element, and their elements are walked like any other subtree, so
/// every key produced by [`crate::extract_keys`] has an entry.
#[must_use]
pub fn build_type_map(tree: &Value) -> TypeMap {
    let mut map = TypeMap::default();
    record(tree, "", &mut map);
    map
}

fn record(value: &Value, path: &str, map: &mut TypeMap) {
    match value {
        Value::Object(children) => {
            for (key, child) in children {
                record(child, &join_path(path, key), map);
            }
        }
        Value::Array(items) => {
            map.insert(path.to_string(), TypeDescriptor::of(value));
            map.array_lengths.insert(path.to_string(), items.len());
            for (index, child) in items.iter().enumerate() {
                record(child, &join_path(path, &index.to_string()), map);
            }
        }
        leaf => map.insert(path.to_string(), TypeDescriptor::of(leaf)),
    }
}
