//! Form loader - YAML file loading and parsing
//!
//! This module handles loading form definitions from YAML files.

use super::error::FormError;
use super::types::FormDefinition;
use std::fs;
use std::path::Path;

/// Loads form definitions from YAML files
pub struct FormLoader;

impl FormLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load a form definition from a YAML file
    pub fn load_form<P: AsRef<Path>>(&self, path: P) -> Result<FormDefinition, FormError> {
        let path = path.as_ref();
        log::debug!("Loading form from {}", path.display());
        let content = fs::read_to_string(path)?;
        Self::parse_yaml(&content)
    }

    /// Parse a form definition from a YAML string
    pub fn parse_yaml(content: &str) -> Result<FormDefinition, FormError> {
        let def: FormDefinition = serde_yaml::from_str(content)?;
        Ok(def)
    }
}

impl Default for FormLoader {
    fn default() -> Self {
        Self::new()
    }
}
