//! # Context Items
//!
//! Ambient key/value data handed to every per-object validation call of one
//! traversal. Callers supply arbitrary JSON values; the traversal owns one
//! reserved key, [`MEMBER_PREFIX_KEY`], which it overwrites with the path of
//! the node about to be validated.
//!
//! Validators that want to report absolute member names themselves read
//! [`ContextItems::member_prefix`] and prepend it. The traversal recognises
//! such names and does not prefix them a second time.

use std::collections::btree_map;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::path::DELIMITER;

/// Reserved key holding the path of the node currently being validated.
pub const MEMBER_PREFIX_KEY: &str = "graphval.member_prefix";

/// Key/value data visible to every validation call of one traversal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContextItems {
    items: BTreeMap<String, Value>,
}

impl ContextItems {
    /// Create an empty item set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an item, returning the previous value under `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.items.insert(key.into(), value.into())
    }

    /// Builder-style [`ContextItems::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Look up an item.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.items.get(key)
    }

    /// Remove an item.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.items.remove(key)
    }

    /// Returns true if `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.items.contains_key(key)
    }

    /// Number of items, the reserved key included.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if there are no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate items in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, Value> {
        self.items.iter()
    }

    /// Copy every item of `base` whose key is not already present.
    pub fn merge_missing(&mut self, base: &BTreeMap<String, Value>) {
        for (key, value) in base {
            self.items
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        }
    }

    /// Path of the node currently being validated, as written by the
    /// traversal. Empty at the root and outside a traversal.
    pub fn current_path(&self) -> &str {
        self.items
            .get(MEMBER_PREFIX_KEY)
            .and_then(Value::as_str)
            .unwrap_or("")
    }

    /// Prefix for self-qualified member names: `"{path}."`, or the empty
    /// string when no non-blank path is set.
    pub fn member_prefix(&self) -> String {
        let path = self.current_path();
        if path.trim().is_empty() {
            String::new()
        } else {
            format!("{path}{DELIMITER}")
        }
    }

    /// Overwrite the reserved path item.
    pub fn set_current_path(&mut self, path: &str) {
        self.items
            .insert(MEMBER_PREFIX_KEY.to_string(), Value::String(path.to_string()));
    }
}

impl FromIterator<(String, Value)> for ContextItems {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl From<BTreeMap<String, Value>> for ContextItems {
    fn from(items: BTreeMap<String, Value>) -> Self {
        Self { items }
    }
}

impl<'a> IntoIterator for &'a ContextItems {
    type Item = (&'a String, &'a Value);
    type IntoIter = btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
