// SPDX-License-Identifier: MIT

use std::collections::HashMap;

use crate::form::builder::PanelBuilder;
use crate::form::condition::Predicate;
use crate::form::descriptor::{FieldKind, PanelDescriptor};
use crate::form::error::{ConfigError, FormError};
use crate::form::types::{ConditionDef, FormDefinition};

/// Panel descriptors by name, resolved when chaining between panels
#[derive(Debug, Clone, Default)]
pub struct PanelRegistry {
    panels: HashMap<String, PanelDescriptor>,
    order: Vec<String>,
    start: Option<String>,
}

impl PanelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a panel; the first registered panel becomes the start panel
    pub fn register(&mut self, panel: PanelDescriptor) -> Result<(), ConfigError> {
        if self.panels.contains_key(&panel.name) {
            return Err(ConfigError::DuplicatePanel(panel.name));
        }
        if self.start.is_none() {
            self.start = Some(panel.name.clone());
        }
        self.order.push(panel.name.clone());
        self.panels.insert(panel.name.clone(), panel);
        Ok(())
    }

    pub fn set_start(&mut self, name: impl Into<String>) {
        self.start = Some(name.into());
    }

    pub fn start(&self) -> Option<&str> {
        self.start.as_deref()
    }

    pub fn get(&self, name: &str) -> Option<&PanelDescriptor> {
        self.panels.get(name)
    }

    /// Look up a panel that chaining requires to exist
    pub fn resolve(&self, name: &str) -> Result<&PanelDescriptor, ConfigError> {
        self.panels
            .get(name)
            .ok_or_else(|| ConfigError::UnknownPanel(name.to_string()))
    }

    /// Panel names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    /// Check that the start panel and every `next` link resolve, and that
    /// each action key belongs to exactly one panel
    pub fn validate(&self) -> Result<(), ConfigError> {
        let start = self.start.as_deref().ok_or(ConfigError::MissingStart)?;
        self.resolve(start)?;

        for name in &self.order {
            if let Some(next) = self.panels[name].next.as_deref() {
                self.resolve(next)?;
            }
        }

        let mut owners: HashMap<&str, &str> = HashMap::new();
        for name in &self.order {
            for field in &self.panels[name].fields {
                if field.kind != FieldKind::Action {
                    continue;
                }
                if owners.insert(&field.key, name).is_some() {
                    return Err(ConfigError::DuplicateAction {
                        key: field.key.clone(),
                        panels: self.action_owners(&field.key),
                    });
                }
            }
        }
        Ok(())
    }

    fn action_owners(&self, key: &str) -> Vec<String> {
        self.order
            .iter()
            .filter(|name| {
                self.panels[*name]
                    .field(key)
                    .is_some_and(|f| f.kind == FieldKind::Action)
            })
            .cloned()
            .collect()
    }

    /// Build and validate a registry from a parsed form file
    pub fn from_definition(def: &FormDefinition) -> Result<Self, FormError> {
        let mut registry = Self::new();

        for panel_def in &def.panels {
            let mut builder = PanelBuilder::new(&panel_def.name);
            if let Some(title) = &panel_def.title {
                builder.title(title);
            }
            if let Some(next) = &panel_def.next {
                builder.next(next);
            }
            for condition in &panel_def.show_when {
                builder.add_show_condition(compile(condition, &panel_def.name)?);
            }

            for field_def in &panel_def.fields {
                let owner = format!("{}.{}", panel_def.name, field_def.key);
                let mut field =
                    builder.field(field_def.kind, &field_def.key, field_def.label.clone());
                for item in &field_def.choices {
                    field = field.add_item(&item.label, item.value.clone());
                }
                for condition in &field_def.show_when {
                    field = field.add_show_condition(compile(condition, &owner)?);
                }
                if let Some(tooltip) = &field_def.tooltip {
                    field.tooltip(tooltip);
                }
            }

            registry.register(builder.build()?)?;
        }

        if let Some(start) = &def.start {
            registry.set_start(start);
        }
        registry.validate()?;

        log::info!(
            "Loaded form '{}' with {} panels",
            def.name,
            registry.len()
        );
        Ok(registry)
    }
}

fn compile(condition: &ConditionDef, owner: &str) -> Result<Predicate, ConfigError> {
    condition
        .compile()
        .map_err(|source| ConfigError::InvalidCondition {
            owner: owner.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::loader::FormLoader;

    fn panel(name: &str, next: Option<&str>) -> PanelDescriptor {
        let mut builder = PanelBuilder::new(name);
        if let Some(next) = next {
            builder.next(next);
        }
        builder.build().unwrap()
    }

    #[test]
    fn test_register_and_get_panel() {
        let mut registry = PanelRegistry::new();
        registry.register(panel("basic", Some("cell"))).unwrap();
        registry.register(panel("cell", None)).unwrap();

        assert_eq!(registry.start(), Some("basic"));
        assert_eq!(registry.get("cell").map(|p| p.name.as_str()), Some("cell"));
        assert!(registry.get("system").is_none());
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["basic", "cell"]);
        assert!(registry.validate().is_ok());
    }

    #[test]
    fn test_duplicate_panel_rejected() {
        let mut registry = PanelRegistry::new();
        registry.register(panel("basic", None)).unwrap();
        let err = registry.register(panel("basic", None)).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicatePanel(ref name) if name == "basic"));
    }

    #[test]
    fn test_unknown_next_fails_validation() {
        let mut registry = PanelRegistry::new();
        registry.register(panel("basic", Some("cell"))).unwrap();

        let err = registry.validate().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownPanel(ref name) if name == "cell"));
    }

    #[test]
    fn test_empty_registry_has_no_start() {
        let registry = PanelRegistry::new();
        assert!(registry.is_empty());
        assert!(matches!(registry.validate(), Err(ConfigError::MissingStart)));
    }

    #[test]
    fn test_from_definition() {
        let yaml = r#"
name: Chain
start: cell
panels:
  - name: basic
    next: cell
    fields:
      - key: calculation
        kind: choice
        choices:
          - { label: SCF, value: scf }
  - name: cell
    title: Cell Information
    fields:
      - key: v1
        kind: text
        label: "v1:"
        tooltip: "First lattice vector"
        show_when: ["ibrav == '0'"]
"#;
        let def = FormLoader::parse_yaml(yaml).unwrap();
        let registry = PanelRegistry::from_definition(&def).unwrap();

        assert_eq!(registry.start(), Some("cell"));
        assert_eq!(registry.get("basic").unwrap().title, "basic Information");
        let v1 = registry.get("cell").unwrap().field("v1").unwrap();
        assert_eq!(v1.conditions.len(), 1);
        assert_eq!(v1.tooltip.as_deref(), Some("First lattice vector"));
    }

    #[test]
    fn test_bad_condition_names_owner() {
        let yaml = r#"
name: Broken
panels:
  - name: system
    fields:
      - key: degauss
        kind: text
        show_when: [["occupations", "=~", "smearing"]]
"#;
        let def = FormLoader::parse_yaml(yaml).unwrap();
        let err = PanelRegistry::from_definition(&def).unwrap_err();
        match err {
            FormError::Config(ConfigError::InvalidCondition { owner, .. }) => {
                assert_eq!(owner, "system.degauss");
            }
            other => panic!("Expected InvalidCondition, got {:?}", other),
        }
    }

    #[test]
    fn test_shared_action_key_rejected() {
        let yaml = r#"
name: Shared
panels:
  - name: a
    next: b
    fields:
      - { key: next, kind: action, label: Next }
  - name: b
    next: c
    fields:
      - { key: next, kind: action, label: Next }
  - name: c
    fields:
      - { key: next, kind: action, label: Next }
"#;
        let def = FormLoader::parse_yaml(yaml).unwrap();
        let err = PanelRegistry::from_definition(&def).unwrap_err();
        match err {
            FormError::Config(ConfigError::DuplicateAction { key, panels }) => {
                assert_eq!(key, "next");
                assert_eq!(panels, vec!["a", "b", "c"]);
            }
            other => panic!("Expected DuplicateAction, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_start_fails() {
        let yaml = r#"
name: Broken
start: nowhere
panels:
  - name: basic
"#;
        let def = FormLoader::parse_yaml(yaml).unwrap();
        assert!(matches!(
            PanelRegistry::from_definition(&def),
            Err(FormError::Config(ConfigError::UnknownPanel(_)))
        ));
    }
}
