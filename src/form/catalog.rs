// SPDX-License-Identifier: MIT

//! Bundled pw.x input form
//!
//! Panels chain `basic → cell → system → relaxation → dynamics → print`.
//! `relaxation` and `dynamics` are only shown for the matching `calculation`.

use crate::form::error::FormError;
use crate::form::loader::FormLoader;
use crate::form::registry::PanelRegistry;
use crate::form::types::FormDefinition;

/// YAML source of the bundled form
pub const CATALOG_YAML: &str = include_str!("catalog.yaml");

pub fn builtin_definition() -> Result<FormDefinition, FormError> {
    FormLoader::parse_yaml(CATALOG_YAML)
}

pub fn builtin_registry() -> Result<PanelRegistry, FormError> {
    PanelRegistry::from_definition(&builtin_definition()?)
}
