// SPDX-License-Identifier: MIT

//! Form session: panel chaining and change propagation
//!
//! The controller owns the value store, the renderer, and every instantiated
//! panel. Each value change runs one reconciliation pass over all panels in
//! instantiation order. The pass only reads the store, so it cannot trigger
//! itself again.

use std::collections::HashSet;

use crate::form::descriptor::FieldKind;
use crate::form::error::{ConfigError, FormError};
use crate::form::panel::{PanelController, ReconcileReport};
use crate::form::registry::PanelRegistry;
use crate::form::state::{Value, ValueStore};
use crate::ui::render::Renderer;

/// Changes made by one update, per panel, in instantiation order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateReport {
    pub panels: Vec<(String, ReconcileReport)>,
}

impl UpdateReport {
    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    pub fn created_count(&self) -> usize {
        self.panels.iter().map(|(_, r)| r.created.len()).sum()
    }

    pub fn destroyed_count(&self) -> usize {
        self.panels.iter().map(|(_, r)| r.destroyed.len()).sum()
    }

    /// Report for one panel, if anything changed there
    pub fn panel(&self, name: &str) -> Option<&ReconcileReport> {
        self.panels
            .iter()
            .find(|(panel, _)| panel == name)
            .map(|(_, report)| report)
    }

    fn merge(&mut self, other: UpdateReport) {
        self.panels.extend(other.panels);
    }
}

/// A running form over a panel registry and a renderer
pub struct FormController<R: Renderer> {
    registry: PanelRegistry,
    store: ValueStore,
    renderer: R,
    panels: Vec<PanelController>,
}

impl<R: Renderer> FormController<R> {
    pub fn new(registry: PanelRegistry, renderer: R) -> Self {
        Self::with_store(registry, ValueStore::new(), renderer)
    }

    /// Start from previously entered values; defaults never overwrite them
    pub fn with_store(registry: PanelRegistry, store: ValueStore, renderer: R) -> Self {
        Self {
            registry,
            store,
            renderer,
            panels: Vec::new(),
        }
    }

    pub fn store(&self) -> &ValueStore {
        &self.store
    }

    pub fn registry(&self) -> &PanelRegistry {
        &self.registry
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Instantiated panels in instantiation order
    pub fn panels(&self) -> &[PanelController] {
        &self.panels
    }

    pub fn panel(&self, name: &str) -> Option<&PanelController> {
        self.panels.iter().find(|p| p.name() == name)
    }

    /// Most recently instantiated panel
    pub fn frontier(&self) -> Option<&PanelController> {
        self.panels.last()
    }

    /// Validate the registry and show its start panel
    pub fn start(&mut self) -> Result<Option<String>, FormError> {
        self.registry.validate()?;
        let start = self
            .registry
            .start()
            .ok_or(ConfigError::MissingStart)?
            .to_string();
        self.advance_to(&start)
    }

    /// Show `name`, skipping forward past panels whose conditions fail.
    ///
    /// Returns the panel that ended up displayed, or `None` when the chain
    /// ran out. Skipped panels are instantiated but never rendered.
    pub fn advance_to(&mut self, name: &str) -> Result<Option<String>, FormError> {
        let mut report = UpdateReport::default();
        let shown = self.chain_from(name, &mut report)?;
        log::debug!(
            "Advance to '{}' created {} widgets",
            name,
            report.created_count()
        );
        Ok(shown)
    }

    /// Follow the frontier panel's `next`
    pub fn advance(&mut self) -> Result<Option<String>, FormError> {
        let next = match self.panels.last() {
            Some(panel) => panel.next().map(str::to_string),
            None => return self.start(),
        };
        match next {
            Some(next) => self.advance_to(&next),
            None => {
                log::info!("Form complete: no panel follows the last one");
                Ok(None)
            }
        }
    }

    /// Handle activation of an action field, chaining from its panel
    pub fn on_action(&mut self, key: &str) -> Result<Option<String>, FormError> {
        let panel = self
            .panels
            .iter()
            .find(|p| {
                p.is_shown()
                    && p.descriptor()
                        .field(key)
                        .is_some_and(|f| f.kind == FieldKind::Action)
                    && p.rendered_keys().contains(&key)
            })
            .ok_or_else(|| FormError::other(format!("No visible action '{}'", key)))?;

        log::info!("Action '{}' on panel '{}'", key, panel.name());
        match panel.next().map(str::to_string) {
            Some(next) => self.advance_to(&next),
            None => {
                log::info!("Form complete: panel '{}' has no successor", panel.name());
                Ok(None)
            }
        }
    }

    /// Store an edited value and propagate it to every panel.
    ///
    /// Writing the value a key already holds changes nothing, which keeps a
    /// renderer echoing a restored value from cascading.
    pub fn on_value_changed(&mut self, key: &str, value: Value) -> Result<UpdateReport, FormError> {
        log::debug!("Value change '{}' = {}", key, value);
        if self.is_action(key) {
            log::warn!("Ignoring value for action '{}'", key);
            return Err(FormError::other(format!("Action '{}' holds no value", key)));
        }
        if !self.store.set(key, value) {
            return Ok(UpdateReport::default());
        }
        self.on_window_update()
    }

    fn is_action(&self, key: &str) -> bool {
        self.registry.names().any(|name| {
            self.registry
                .get(name)
                .and_then(|panel| panel.field(key))
                .is_some_and(|f| f.kind == FieldKind::Action)
        })
    }

    /// Reconcile every instantiated panel against the store
    pub fn on_window_update(&mut self) -> Result<UpdateReport, FormError> {
        let mut report = self.reconcile_all()?;

        // A hidden frontier hands over to its successor
        if let Some(next) = self.pending_successor() {
            log::info!("Frontier panel hidden, moving on to '{}'", next);
            self.chain_from(&next, &mut report)?;
        }
        Ok(report)
    }

    fn chain_from(&mut self, name: &str, report: &mut UpdateReport) -> Result<Option<String>, FormError> {
        let mut current = Some(name.to_string());
        let mut skipped: Vec<String> = Vec::new();
        let mut visited = HashSet::new();
        let mut shown = None;

        while let Some(name) = current.take() {
            if !visited.insert(name.clone()) {
                return Err(ConfigError::ChainCycle(skipped).into());
            }

            let index = match self.panels.iter().position(|p| p.name() == name) {
                Some(index) => index,
                None => self.instantiate(&name)?,
            };

            let panel = &self.panels[index];
            if panel.is_shown() {
                shown = Some(name);
                break;
            }

            log::warn!("Skipping panel '{}': show conditions not met", name);
            current = panel.next().map(str::to_string);
            skipped.push(name);
        }

        if shown.is_none() {
            log::info!("Panel chain ended after skipping {:?}", skipped);
        }

        report.merge(self.reconcile_all()?);
        Ok(shown)
    }

    fn instantiate(&mut self, name: &str) -> Result<usize, FormError> {
        let descriptor = self.registry.resolve(name)?.clone();
        self.panels
            .push(PanelController::new(descriptor, &mut self.store));
        Ok(self.panels.len() - 1)
    }

    fn reconcile_all(&mut self) -> Result<UpdateReport, FormError> {
        let mut report = UpdateReport::default();
        for panel in &mut self.panels {
            let changes = panel
                .reconcile(&self.store, &mut self.renderer)
                .map_err(|e| {
                    log::error!("Reconciling panel '{}' failed: {}", panel.name(), e);
                    e
                })?;
            if !changes.is_empty() {
                report.panels.push((panel.name().to_string(), changes));
            }
        }
        Ok(report)
    }

    fn pending_successor(&self) -> Option<String> {
        let frontier = self.panels.last()?;
        if frontier.is_shown() {
            return None;
        }
        let next = frontier.next()?;
        if self.panels.iter().any(|p| p.name() == next) {
            return None;
        }
        Some(next.to_string())
    }
}
