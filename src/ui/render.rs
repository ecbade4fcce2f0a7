// SPDX-License-Identifier: MIT

//! Renderer boundary between the form engine and a widget toolkit
//!
//! The engine only creates, destroys, and places rows through this trait.
//! A host binds each widget's change notification to
//! `FormController::on_value_changed` using the key in [`WidgetSpec`].

use crate::form::descriptor::{ChoiceItem, FieldKind};
use crate::form::error::RenderError;
use crate::form::state::Value;

/// Opaque handle to a rendered widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetHandle(pub u64);

/// Opaque handle to a rendered panel container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PanelHandle(pub u64);

/// Everything a renderer needs to build one field's widget
#[derive(Debug, Clone, Copy)]
pub struct WidgetSpec<'a> {
    /// Store key the widget edits
    pub key: &'a str,
    pub kind: FieldKind,
    /// Value to display; restored values must not be reported back as edits
    pub initial: Option<&'a Value>,
    pub choices: &'a [ChoiceItem],
    pub tooltip: Option<&'a str>,
}

/// Widget toolkit operations used by the panel controllers
pub trait Renderer {
    /// Create an empty, visible panel container
    fn create_panel(&mut self, name: &str, title: &str) -> Result<PanelHandle, RenderError>;

    fn create_widget(&mut self, spec: WidgetSpec<'_>) -> Result<WidgetHandle, RenderError>;

    fn destroy_widget(&mut self, widget: WidgetHandle) -> Result<(), RenderError>;

    /// Insert a labelled row at `position` among the panel's current rows
    fn insert_row(
        &mut self,
        panel: PanelHandle,
        position: usize,
        label: Option<&str>,
        widget: WidgetHandle,
    ) -> Result<(), RenderError>;

    fn remove_row(&mut self, panel: PanelHandle, widget: WidgetHandle) -> Result<(), RenderError>;

    fn set_panel_visible(&mut self, panel: PanelHandle, visible: bool) -> Result<(), RenderError>;
}
