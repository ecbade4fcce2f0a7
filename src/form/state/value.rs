// SPDX-License-Identifier: MIT

//! Field values held in the store and used as condition literals

use serde::{Deserialize, Serialize};
use std::fmt;

/// A value entered into a form field
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Check box state
    Flag(bool),
    /// Numeric selection index
    Index(i64),
    /// Free text or a choice item's stored value
    Text(String),
}

impl Value {
    /// Compare against a condition literal.
    ///
    /// Flags and 0/1 indices are interchangeable; everything else compares
    /// structurally.
    pub fn matches(&self, literal: &Value) -> bool {
        match (self, literal) {
            (Value::Flag(f), Value::Index(i)) | (Value::Index(i), Value::Flag(f)) => {
                *i == i64::from(*f)
            }
            (left, right) => left == right,
        }
    }

    /// Interpret a raw string from a command line or a text widget
    pub fn parse_input(input: &str) -> Self {
        match input {
            "true" => Value::Flag(true),
            "false" => Value::Flag(false),
            other => Value::Text(other.to_string()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Flag(b) => write!(f, "{}", b),
            Value::Index(i) => write!(f, "{}", i),
            Value::Text(s) => write!(f, "'{}'", s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Index(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Index(i64::from(i))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Flag(b)
    }
}
