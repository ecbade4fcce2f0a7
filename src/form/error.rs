// SPDX-License-Identifier: MIT

//! Typed error handling for qe-form
//!
//! Configuration problems are fatal at construction time: a form whose panels
//! cannot be resolved or whose conditions are malformed is never rendered.
//! Renderer desync is an invariant violation and is reported, never ignored.

use thiserror::Error;

/// Top-level error type for qe-form
#[derive(Debug, Error)]
pub enum FormError {
    /// Invalid panel or field declarations
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Malformed condition expression
    #[error("Condition error: {0}")]
    Condition(#[from] ConditionError),

    /// The renderer and the panel bookkeeping disagree
    #[error("Renderer error: {0}")]
    Render(#[from] RenderError),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// YAML parsing errors
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    /// Generic error wrapper
    #[error("{0}")]
    Other(String),
}

/// Errors in panel and field declarations
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Chaining referenced a panel that was never declared
    #[error("Unknown panel '{0}'")]
    UnknownPanel(String),

    /// Two panels share a name
    #[error("Panel '{0}' is declared more than once")]
    DuplicatePanel(String),

    /// Two fields of one panel share a key
    #[error("Field '{key}' is declared more than once in panel '{panel}'")]
    DuplicateField { panel: String, key: String },

    /// A field was declared without a key
    #[error("Field without a key in panel '{panel}'")]
    EmptyKey { panel: String },

    /// A choice field has nothing to select
    #[error("Choice field '{key}' in panel '{panel}' has no items")]
    EmptyChoices { panel: String, key: String },

    /// Items were attached to a field that is not a choice
    #[error("Field '{key}' in panel '{panel}' is not a choice field and cannot hold items")]
    ItemsOnNonChoice { panel: String, key: String },

    /// An action key is shared by several panels, so a press cannot be routed
    #[error("Action '{key}' is declared in more than one panel: {panels:?}")]
    DuplicateAction { key: String, panels: Vec<String> },

    /// The form does not say where to begin
    #[error("No start panel declared")]
    MissingStart,

    /// Chaining came back to a panel it already skipped
    #[error("Panel chain loops without an eligible panel: {0:?}")]
    ChainCycle(Vec<String>),

    /// A condition attached to a field or panel failed to compile
    #[error("Invalid condition on '{owner}': {source}")]
    InvalidCondition {
        owner: String,
        #[source]
        source: ConditionError,
    },
}

/// Errors while parsing a condition
#[derive(Debug, Error, PartialEq)]
pub enum ConditionError {
    /// Expression string could not be parsed
    #[error("Could not parse condition: {0}")]
    Syntax(String),

    /// Nested-list node does not have three elements
    #[error("Condition node must have 3 elements, found {0}")]
    Arity(usize),

    /// Middle element is not a known operator
    #[error("Unknown condition operator '{0}'")]
    UnknownOperator(String),

    /// Left side of a comparison is not a field key
    #[error("Invalid field key in condition: {0}")]
    InvalidKey(String),

    /// Right side of a comparison is not a scalar literal
    #[error("Could not parse literal: {0}")]
    InvalidLiteral(String),
}

/// Errors reported by a renderer
#[derive(Debug, Error, PartialEq)]
pub enum RenderError {
    /// Row bookkeeping no longer matches the rendered layout
    #[error("Renderer desync: {0}")]
    Desync(String),

    /// Panel handle was never created by this renderer
    #[error("Unknown panel handle {0}")]
    UnknownPanel(u64),

    /// Widget handle was never created or already destroyed
    #[error("Unknown widget handle {0}")]
    UnknownWidget(u64),
}

impl FormError {
    /// Create from a generic error
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}

impl RenderError {
    /// Create a desync error
    pub fn desync(message: impl Into<String>) -> Self {
        Self::Desync(message.into())
    }
}

impl From<&str> for FormError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

impl From<String> for FormError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}
