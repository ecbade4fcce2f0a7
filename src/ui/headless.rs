// SPDX-License-Identifier: MIT

//! In-memory renderer
//!
//! Keeps panels, rows, and widget values in plain collections and journals
//! every operation. Used by the CLI to print a form and by tests to count
//! widget churn. Any row bookkeeping mismatch is rejected as a desync.

use std::collections::{BTreeMap, HashMap};
use std::fmt::Write;

use super::render::{PanelHandle, Renderer, WidgetHandle, WidgetSpec};
use crate::form::descriptor::{ChoiceItem, FieldKind};
use crate::form::error::RenderError;
use crate::form::state::Value;

/// One journaled renderer call, identified by panel name and field key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOp {
    CreatePanel(String),
    CreateWidget(String),
    DestroyWidget(String),
    InsertRow {
        panel: String,
        key: String,
        position: usize,
    },
    RemoveRow {
        panel: String,
        key: String,
    },
    SetPanelVisible {
        panel: String,
        visible: bool,
    },
}

/// Operation counts derived from the journal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub panels_created: usize,
    pub widgets_created: usize,
    pub widgets_destroyed: usize,
}

#[derive(Debug)]
struct HeadlessWidget {
    key: String,
    kind: FieldKind,
    value: Option<Value>,
    choices: Vec<ChoiceItem>,
    tooltip: Option<String>,
}

#[derive(Debug)]
struct HeadlessRow {
    widget: WidgetHandle,
    label: Option<String>,
}

#[derive(Debug)]
struct HeadlessPanel {
    name: String,
    title: String,
    visible: bool,
    rows: Vec<HeadlessRow>,
}

/// Renderer that draws nothing and remembers everything
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    next_id: u64,
    panels: BTreeMap<PanelHandle, HeadlessPanel>,
    widgets: HashMap<WidgetHandle, HeadlessWidget>,
    journal: Vec<RenderOp>,
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn journal(&self) -> &[RenderOp] {
        &self.journal
    }

    pub fn clear_journal(&mut self) {
        self.journal.clear();
    }

    pub fn stats(&self) -> RenderStats {
        let mut stats = RenderStats::default();
        for op in &self.journal {
            match op {
                RenderOp::CreatePanel(_) => stats.panels_created += 1,
                RenderOp::CreateWidget(_) => stats.widgets_created += 1,
                RenderOp::DestroyWidget(_) => stats.widgets_destroyed += 1,
                _ => {}
            }
        }
        stats
    }

    /// Names of rendered panels in creation order
    pub fn panel_names(&self) -> Vec<&str> {
        self.panels.values().map(|p| p.name.as_str()).collect()
    }

    pub fn is_panel_visible(&self, name: &str) -> Option<bool> {
        self.panel_by_name(name).map(|p| p.visible)
    }

    /// Field keys of a panel's rows, top to bottom
    pub fn row_keys(&self, panel: &str) -> Vec<&str> {
        self.panel_by_name(panel)
            .map(|p| {
                p.rows
                    .iter()
                    .filter_map(|row| self.widgets.get(&row.widget))
                    .map(|w| w.key.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Value currently displayed by the live widget for `key`
    pub fn widget_value(&self, key: &str) -> Option<&Value> {
        self.widgets
            .values()
            .find(|w| w.key == key)
            .and_then(|w| w.value.as_ref())
    }

    pub fn widget_tooltip(&self, key: &str) -> Option<&str> {
        self.widgets
            .values()
            .find(|w| w.key == key)
            .and_then(|w| w.tooltip.as_deref())
    }

    /// Simulate the user editing a live widget; returns false if none is rendered
    pub fn edit_widget(&mut self, key: &str, value: Value) -> bool {
        match self.widgets.values_mut().find(|w| w.key == key) {
            Some(widget) => {
                widget.value = Some(value);
                true
            }
            None => false,
        }
    }

    /// Plain-text view of every visible panel
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for panel in self.panels.values().filter(|p| p.visible) {
            let _ = writeln!(out, "[{}]", panel.title);
            for row in &panel.rows {
                let Some(widget) = self.widgets.get(&row.widget) else {
                    continue;
                };
                let shown = display_value(widget);
                match &row.label {
                    Some(label) if widget.kind != FieldKind::Action => {
                        let _ = writeln!(out, "  {} {}", label, shown);
                    }
                    _ => {
                        let _ = writeln!(out, "  {}", shown);
                    }
                }
            }
        }
        out
    }

    fn panel_by_name(&self, name: &str) -> Option<&HeadlessPanel> {
        self.panels.values().find(|p| p.name == name)
    }

    fn allocate(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn key_of(&self, widget: WidgetHandle) -> String {
        self.widgets
            .get(&widget)
            .map(|w| w.key.clone())
            .unwrap_or_default()
    }
}

fn display_value(widget: &HeadlessWidget) -> String {
    match (widget.kind, &widget.value) {
        (FieldKind::Action, _) => format!("<{}>", widget.key),
        (FieldKind::Flag, Some(Value::Flag(true))) => "[x]".to_string(),
        (FieldKind::Flag, _) => "[ ]".to_string(),
        (FieldKind::Choice, Some(value)) => widget
            .choices
            .iter()
            .find(|item| item.value == *value)
            .map(|item| item.label.clone())
            .unwrap_or_else(|| value.to_string()),
        (_, Some(Value::Text(s))) => s.clone(),
        (_, Some(other)) => other.to_string(),
        (_, None) => String::new(),
    }
}

impl Renderer for HeadlessRenderer {
    fn create_panel(&mut self, name: &str, title: &str) -> Result<PanelHandle, RenderError> {
        let handle = PanelHandle(self.allocate());
        self.panels.insert(
            handle,
            HeadlessPanel {
                name: name.to_string(),
                title: title.to_string(),
                visible: true,
                rows: Vec::new(),
            },
        );
        self.journal.push(RenderOp::CreatePanel(name.to_string()));
        Ok(handle)
    }

    fn create_widget(&mut self, spec: WidgetSpec<'_>) -> Result<WidgetHandle, RenderError> {
        let handle = WidgetHandle(self.allocate());
        self.widgets.insert(
            handle,
            HeadlessWidget {
                key: spec.key.to_string(),
                kind: spec.kind,
                value: spec.initial.cloned(),
                choices: spec.choices.to_vec(),
                tooltip: spec.tooltip.map(str::to_string),
            },
        );
        self.journal
            .push(RenderOp::CreateWidget(spec.key.to_string()));
        Ok(handle)
    }

    fn destroy_widget(&mut self, widget: WidgetHandle) -> Result<(), RenderError> {
        if self
            .panels
            .values()
            .any(|p| p.rows.iter().any(|row| row.widget == widget))
        {
            return Err(RenderError::desync(format!(
                "widget '{}' destroyed while still in a row",
                self.key_of(widget)
            )));
        }
        let removed = self
            .widgets
            .remove(&widget)
            .ok_or(RenderError::UnknownWidget(widget.0))?;
        self.journal.push(RenderOp::DestroyWidget(removed.key));
        Ok(())
    }

    fn insert_row(
        &mut self,
        panel: PanelHandle,
        position: usize,
        label: Option<&str>,
        widget: WidgetHandle,
    ) -> Result<(), RenderError> {
        if !self.widgets.contains_key(&widget) {
            return Err(RenderError::UnknownWidget(widget.0));
        }
        if self
            .panels
            .values()
            .any(|p| p.rows.iter().any(|row| row.widget == widget))
        {
            return Err(RenderError::desync(format!(
                "widget '{}' inserted twice",
                self.key_of(widget)
            )));
        }
        let key = self.key_of(widget);
        let target = self
            .panels
            .get_mut(&panel)
            .ok_or(RenderError::UnknownPanel(panel.0))?;
        if position > target.rows.len() {
            return Err(RenderError::desync(format!(
                "row position {} past end of panel '{}' ({} rows)",
                position,
                target.name,
                target.rows.len()
            )));
        }

        target.rows.insert(
            position,
            HeadlessRow {
                widget,
                label: label.map(str::to_string),
            },
        );
        let panel_name = target.name.clone();
        self.journal.push(RenderOp::InsertRow {
            panel: panel_name,
            key,
            position,
        });
        Ok(())
    }

    fn remove_row(&mut self, panel: PanelHandle, widget: WidgetHandle) -> Result<(), RenderError> {
        let key = self.key_of(widget);
        let target = self
            .panels
            .get_mut(&panel)
            .ok_or(RenderError::UnknownPanel(panel.0))?;
        let index = target
            .rows
            .iter()
            .position(|row| row.widget == widget)
            .ok_or_else(|| {
                RenderError::desync(format!(
                    "row '{}' is not present in panel '{}'",
                    key, target.name
                ))
            })?;

        target.rows.remove(index);
        let panel_name = target.name.clone();
        self.journal.push(RenderOp::RemoveRow {
            panel: panel_name,
            key,
        });
        Ok(())
    }

    fn set_panel_visible(&mut self, panel: PanelHandle, visible: bool) -> Result<(), RenderError> {
        let target = self
            .panels
            .get_mut(&panel)
            .ok_or(RenderError::UnknownPanel(panel.0))?;
        target.visible = visible;
        let panel_name = target.name.clone();
        self.journal.push(RenderOp::SetPanelVisible {
            panel: panel_name,
            visible,
        });
        Ok(())
    }
}
