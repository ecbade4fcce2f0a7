// SPDX-License-Identifier: MIT

//! Runtime value storage shared by every panel of a form session

use std::collections::{BTreeMap, HashMap};

use super::value::Value;

/// Mapping from field key to its current value.
///
/// Keys live in one namespace across all panels. Entries are never removed:
/// a hidden field keeps its last value so showing it again restores the input.
#[derive(Debug, Clone, Default)]
pub struct ValueStore {
    fields: HashMap<String, Value>,
}

impl ValueStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            fields: HashMap::new(),
        }
    }

    /// Create a store seeded with values, e.g. from a previous session
    pub fn with_values<I, K>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Self {
            fields: values.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Get a field value; `None` is the "unset" state
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Register a value at field construction time
    pub fn init(&mut self, key: &str, value: Value) {
        self.fields.insert(key.to_string(), value);
    }

    /// Store an edited value, returning whether it differs from the previous one
    pub fn set(&mut self, key: &str, value: Value) -> bool {
        match self.fields.get(key) {
            Some(current) if *current == value => false,
            _ => {
                self.fields.insert(key.to_string(), value);
                true
            }
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// All entries ordered by key, for export by the host
    pub fn entries(&self) -> BTreeMap<&str, &Value> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v)).collect()
    }
}
