// SPDX-License-Identifier: MIT

//! Declarative field and panel descriptors
//!
//! Descriptors are created once per panel and live for the whole form
//! session. Hiding a field destroys its widget, never its descriptor.

use serde::{Deserialize, Serialize};

use crate::form::condition::{evaluate_all, Predicate};
use crate::form::state::{Value, ValueStore};

/// The kind of input control a field renders as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Free text entry
    Text,
    /// Drop-down with a fixed item list; always has a selection
    Choice,
    /// Check box
    Flag,
    /// Push button; holds no value
    Action,
}

/// One entry of a choice field: what the user sees and what gets stored
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ChoiceItem {
    pub label: String,
    pub value: Value,
}

/// Definition of one input field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub key: String,
    pub kind: FieldKind,
    pub label: Option<String>,
    pub tooltip: Option<String>,
    /// Display order; index 0 is the default selection
    pub choices: Vec<ChoiceItem>,
    /// Top-level conditions; the field is visible iff all hold
    pub conditions: Vec<Predicate>,
    /// Position among the panel's declared fields
    pub order: usize,
}

impl FieldDescriptor {
    /// Value registered in the store when the owning panel is instantiated
    pub fn default_value(&self) -> Option<Value> {
        match self.kind {
            FieldKind::Choice => self.choices.first().map(|item| item.value.clone()),
            FieldKind::Flag => Some(Value::Flag(false)),
            FieldKind::Text | FieldKind::Action => None,
        }
    }

    pub fn is_visible(&self, store: &ValueStore) -> bool {
        evaluate_all(&self.conditions, store)
    }

    /// Index of the choice item whose stored value equals `value`
    pub fn choice_index(&self, value: &Value) -> Option<usize> {
        self.choices.iter().position(|item| item.value == *value)
    }
}

/// Definition of one panel: its ordered fields, its own gate, and its successor
#[derive(Debug, Clone, PartialEq)]
pub struct PanelDescriptor {
    pub name: String,
    pub title: String,
    pub fields: Vec<FieldDescriptor>,
    pub conditions: Vec<Predicate>,
    /// `None` ends the chain
    pub next: Option<String>,
}

impl PanelDescriptor {
    pub fn field(&self, key: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// Whether the panel's own conditions currently allow it to be shown
    pub fn is_eligible(&self, store: &ValueStore) -> bool {
        evaluate_all(&self.conditions, store)
    }
}
