// SPDX-License-Identifier: MIT

//! Per-panel field lifecycle and visibility reconciliation
//!
//! A panel renders every declared field on its first display, then keeps the
//! rendered rows in step with the store: a field that becomes visible gets a
//! fresh widget inserted at the slot given by its declaration order, a field
//! that becomes hidden has its widget removed and destroyed. Values stay in the
//! store either way, so a re-created widget starts from the last entered value.

use crate::form::descriptor::PanelDescriptor;
use crate::form::error::{FormError, RenderError};
use crate::form::state::ValueStore;
use crate::ui::render::{PanelHandle, Renderer, WidgetHandle, WidgetSpec};

/// Whether a panel or field is currently displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Hidden,
    Shown,
}

/// What one reconciliation pass changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Keys of fields whose widgets were created, in declaration order
    pub created: Vec<String>,
    /// Keys of fields whose widgets were destroyed, in declaration order
    pub destroyed: Vec<String>,
    /// Set when the panel itself changed visibility
    pub panel: Option<Visibility>,
}

impl ReconcileReport {
    pub fn is_empty(&self) -> bool {
        self.created.is_empty() && self.destroyed.is_empty() && self.panel.is_none()
    }
}

/// Runtime state of one instantiated panel
#[derive(Debug)]
pub struct PanelController {
    descriptor: PanelDescriptor,
    /// Container handle, created on first display
    handle: Option<PanelHandle>,
    /// Live widget per declared field, indexed by declaration order
    widgets: Vec<Option<WidgetHandle>>,
    visibility: Visibility,
}

impl PanelController {
    /// Instantiate a panel: register field defaults and decide initial visibility.
    ///
    /// Defaults are only written for keys the store does not hold yet, so a
    /// value entered elsewhere (or seeded by the host) is never clobbered.
    pub fn new(descriptor: PanelDescriptor, store: &mut ValueStore) -> Self {
        for field in &descriptor.fields {
            if store.contains_key(&field.key) {
                continue;
            }
            if let Some(default) = field.default_value() {
                store.init(&field.key, default);
            }
        }

        let visibility = if descriptor.is_eligible(store) {
            Visibility::Shown
        } else {
            Visibility::Hidden
        };
        log::info!(
            "Instantiated panel '{}' ({} fields, {:?})",
            descriptor.name,
            descriptor.fields.len(),
            visibility
        );

        let widgets = vec![None; descriptor.fields.len()];
        Self {
            descriptor,
            handle: None,
            widgets,
            visibility,
        }
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn descriptor(&self) -> &PanelDescriptor {
        &self.descriptor
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_shown(&self) -> bool {
        self.visibility == Visibility::Shown
    }

    /// Whether the panel container has ever been rendered
    pub fn is_rendered(&self) -> bool {
        self.handle.is_some()
    }

    pub fn next(&self) -> Option<&str> {
        self.descriptor.next.as_deref()
    }

    /// Keys of fields that currently have a widget, in row order
    pub fn rendered_keys(&self) -> Vec<&str> {
        self.descriptor
            .fields
            .iter()
            .zip(&self.widgets)
            .filter(|(_, widget)| widget.is_some())
            .map(|(field, _)| field.key.as_str())
            .collect()
    }

    pub fn field_visibility(&self, key: &str) -> Option<Visibility> {
        let index = self.descriptor.fields.iter().position(|f| f.key == key)?;
        Some(match self.widgets[index] {
            Some(_) => Visibility::Shown,
            None => Visibility::Hidden,
        })
    }

    /// Align the panel and its rows with the current store contents.
    ///
    /// Idempotent: a second call without an intervening store change creates
    /// and destroys nothing.
    pub fn reconcile<R: Renderer + ?Sized>(
        &mut self,
        store: &ValueStore,
        renderer: &mut R,
    ) -> Result<ReconcileReport, FormError> {
        let mut report = ReconcileReport::default();

        let eligible = self.descriptor.is_eligible(store);
        match (self.visibility, eligible) {
            (Visibility::Shown, false) => {
                if let Some(handle) = self.handle {
                    renderer.set_panel_visible(handle, false)?;
                }
                self.visibility = Visibility::Hidden;
                report.panel = Some(Visibility::Hidden);
                log::info!("Panel '{}' hidden", self.descriptor.name);
            }
            (Visibility::Hidden, true) => {
                if let Some(handle) = self.handle {
                    renderer.set_panel_visible(handle, true)?;
                }
                self.visibility = Visibility::Shown;
                report.panel = Some(Visibility::Shown);
                log::info!("Panel '{}' shown", self.descriptor.name);
            }
            _ => {}
        }

        if self.visibility == Visibility::Shown && self.handle.is_none() {
            self.render_all(store, renderer, &mut report)?;
        }

        if let Some(handle) = self.handle {
            self.reconcile_fields(handle, store, renderer, &mut report)?;
        }

        Ok(report)
    }

    /// First layout pass: one row per declared field
    fn render_all<R: Renderer + ?Sized>(
        &mut self,
        store: &ValueStore,
        renderer: &mut R,
        report: &mut ReconcileReport,
    ) -> Result<(), FormError> {
        let handle = renderer.create_panel(&self.descriptor.name, &self.descriptor.title)?;
        self.handle = Some(handle);

        for index in 0..self.descriptor.fields.len() {
            self.show_field(index, handle, store, renderer)?;
            report.created.push(self.descriptor.fields[index].key.clone());
        }
        Ok(())
    }

    fn reconcile_fields<R: Renderer + ?Sized>(
        &mut self,
        handle: PanelHandle,
        store: &ValueStore,
        renderer: &mut R,
        report: &mut ReconcileReport,
    ) -> Result<(), FormError> {
        for index in 0..self.descriptor.fields.len() {
            let wanted = self.descriptor.fields[index].is_visible(store);
            let rendered = self.widgets[index].is_some();
            let key = &self.descriptor.fields[index].key;

            match (rendered, wanted) {
                (false, true) => {
                    log::debug!("Field '{}.{}' shown", self.descriptor.name, key);
                    report.created.push(key.clone());
                    self.show_field(index, handle, store, renderer)?;
                }
                (true, false) => {
                    log::debug!("Field '{}.{}' hidden", self.descriptor.name, key);
                    report.destroyed.push(key.clone());
                    self.hide_field(index, handle, renderer)?;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn show_field<R: Renderer + ?Sized>(
        &mut self,
        index: usize,
        handle: PanelHandle,
        store: &ValueStore,
        renderer: &mut R,
    ) -> Result<(), FormError> {
        let field = &self.descriptor.fields[index];
        // Slot comes from declaration order, never from transient row indices
        let position = self.widgets[..index].iter().flatten().count();

        let widget = renderer.create_widget(WidgetSpec {
            key: &field.key,
            kind: field.kind,
            initial: store.get(&field.key),
            choices: &field.choices,
            tooltip: field.tooltip.as_deref(),
        })?;
        renderer.insert_row(handle, position, field.label.as_deref(), widget)?;

        self.widgets[index] = Some(widget);
        Ok(())
    }

    fn hide_field<R: Renderer + ?Sized>(
        &mut self,
        index: usize,
        handle: PanelHandle,
        renderer: &mut R,
    ) -> Result<(), FormError> {
        let widget = self.widgets[index].ok_or_else(|| {
            RenderError::desync(format!(
                "field '{}' has no widget to hide",
                self.descriptor.fields[index].key
            ))
        })?;
        // The slot tracks the row, so it is only cleared once the row is gone
        renderer.remove_row(handle, widget)?;
        self.widgets[index] = None;
        renderer.destroy_widget(widget)?;
        Ok(())
    }
}
