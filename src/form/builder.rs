// SPDX-License-Identifier: MIT

//! Panel construction API
//!
//! Fields are appended in declaration order; the returned handle attaches
//! choice items and show conditions:
//!
//! ```
//! use qe_form::form::builder::PanelBuilder;
//! use qe_form::form::condition::Predicate;
//!
//! let mut panel = PanelBuilder::new("cell");
//! panel.title("Cell Information").next("system");
//! panel
//!     .choice("assume_isolated", "assume_isolated:")
//!     .add_item("None", "none")
//!     .add_item("ESM (Effective Screening Medium)", "esm");
//! panel
//!     .text("esm_w", "esm_w:")
//!     .add_show_condition(Predicate::eq("assume_isolated", "esm"));
//! let descriptor = panel.build().unwrap();
//! assert_eq!(descriptor.fields.len(), 2);
//! ```

use std::collections::HashSet;

use crate::form::condition::Predicate;
use crate::form::descriptor::{ChoiceItem, FieldDescriptor, FieldKind, PanelDescriptor};
use crate::form::error::ConfigError;
use crate::form::state::Value;

/// Builds a [`PanelDescriptor`], collecting declaration errors until `build`
#[derive(Debug)]
pub struct PanelBuilder {
    name: String,
    title: Option<String>,
    fields: Vec<FieldDescriptor>,
    conditions: Vec<Predicate>,
    next: Option<String>,
    errors: Vec<ConfigError>,
}

impl PanelBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: None,
            fields: Vec::new(),
            conditions: Vec::new(),
            next: None,
            errors: Vec::new(),
        }
    }

    pub fn title(&mut self, title: impl Into<String>) -> &mut Self {
        self.title = Some(title.into());
        self
    }

    /// Panel chained after this one
    pub fn next(&mut self, panel: impl Into<String>) -> &mut Self {
        self.next = Some(panel.into());
        self
    }

    /// Gate the whole panel on a condition
    pub fn add_show_condition(&mut self, predicate: Predicate) -> &mut Self {
        self.conditions.push(predicate);
        self
    }

    pub fn text(&mut self, key: impl Into<String>, label: impl Into<String>) -> FieldHandle<'_> {
        self.field(FieldKind::Text, key, Some(label.into()))
    }

    pub fn choice(&mut self, key: impl Into<String>, label: impl Into<String>) -> FieldHandle<'_> {
        self.field(FieldKind::Choice, key, Some(label.into()))
    }

    pub fn flag(&mut self, key: impl Into<String>, label: impl Into<String>) -> FieldHandle<'_> {
        self.field(FieldKind::Flag, key, Some(label.into()))
    }

    pub fn action(&mut self, key: impl Into<String>, caption: impl Into<String>) -> FieldHandle<'_> {
        self.field(FieldKind::Action, key, Some(caption.into()))
    }

    /// Append a field of any kind
    pub fn field(
        &mut self,
        kind: FieldKind,
        key: impl Into<String>,
        label: Option<String>,
    ) -> FieldHandle<'_> {
        let index = self.fields.len();
        self.fields.push(FieldDescriptor {
            key: key.into(),
            kind,
            label,
            tooltip: None,
            choices: Vec::new(),
            conditions: Vec::new(),
            order: index,
        });
        FieldHandle {
            builder: self,
            index,
        }
    }

    /// Validate and produce the descriptor
    pub fn build(self) -> Result<PanelDescriptor, ConfigError> {
        if let Some(err) = self.errors.into_iter().next() {
            return Err(err);
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if field.key.is_empty() {
                return Err(ConfigError::EmptyKey {
                    panel: self.name.clone(),
                });
            }
            if !seen.insert(field.key.as_str()) {
                return Err(ConfigError::DuplicateField {
                    panel: self.name.clone(),
                    key: field.key.clone(),
                });
            }
            if field.kind == FieldKind::Choice && field.choices.is_empty() {
                return Err(ConfigError::EmptyChoices {
                    panel: self.name.clone(),
                    key: field.key.clone(),
                });
            }
        }

        let title = self
            .title
            .unwrap_or_else(|| format!("{} Information", self.name));

        Ok(PanelDescriptor {
            name: self.name,
            title,
            fields: self.fields,
            conditions: self.conditions,
            next: self.next,
        })
    }
}

/// Handle to the field most recently appended to a [`PanelBuilder`]
#[derive(Debug)]
pub struct FieldHandle<'a> {
    builder: &'a mut PanelBuilder,
    index: usize,
}

impl FieldHandle<'_> {
    /// Append a choice item; the first item becomes the field's default
    pub fn add_item(mut self, label: impl Into<String>, value: impl Into<Value>) -> Self {
        let field = &mut self.builder.fields[self.index];
        if field.kind == FieldKind::Choice {
            field.choices.push(ChoiceItem {
                label: label.into(),
                value: value.into(),
            });
        } else {
            let err = ConfigError::ItemsOnNonChoice {
                panel: self.builder.name.clone(),
                key: field.key.clone(),
            };
            self.builder.errors.push(err);
        }
        self
    }

    /// Show the field only while `predicate` holds (all conditions must hold)
    pub fn add_show_condition(mut self, predicate: Predicate) -> Self {
        self.builder.fields[self.index].conditions.push(predicate);
        self
    }

    pub fn tooltip(mut self, text: impl Into<String>) -> Self {
        self.builder.fields[self.index].tooltip = Some(text.into());
        self
    }
}
