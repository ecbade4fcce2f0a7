// SPDX-License-Identifier: MIT

//! YAML schema types for form definitions
//!
//! A form file lists panels in chain order. Conditions may be written as
//! expression strings or as nested lists:
//!
//! ```yaml
//! show_when:
//!   - "calculation == 'relax'"
//!   - [["assume_isolated", "==", "esm"], "and", ["esm_bc", "==", "bc2"]]
//! ```

use serde::{Deserialize, Serialize};

use crate::form::condition::{from_tree, parse, Predicate};
use crate::form::descriptor::{ChoiceItem, FieldKind};
use crate::form::error::ConditionError;

/// Top-level form definition
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FormDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Panel shown first; defaults to the first listed panel
    pub start: Option<String>,
    pub panels: Vec<PanelDefinition>,
}

/// One panel of the form
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PanelDefinition {
    pub name: String,
    pub title: Option<String>,
    /// All conditions must hold for the panel to be shown
    #[serde(default)]
    pub show_when: Vec<ConditionDef>,
    /// Panel chained after this one
    pub next: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

/// One field of a panel
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FieldDefinition {
    pub key: String,
    pub kind: FieldKind,
    pub label: Option<String>,
    pub tooltip: Option<String>,
    #[serde(default)]
    pub choices: Vec<ChoiceItem>,
    #[serde(default)]
    pub show_when: Vec<ConditionDef>,
}

/// A condition in either accepted notation
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(untagged)]
pub enum ConditionDef {
    /// `"key == 'value'"` style expression
    Expr(String),
    /// `[lhs, op, rhs]` nested list
    Tree(serde_json::Value),
}

impl ConditionDef {
    pub fn compile(&self) -> Result<Predicate, ConditionError> {
        match self {
            ConditionDef::Expr(expr) => parse(expr),
            ConditionDef::Tree(tree) => from_tree(tree),
        }
    }
}
