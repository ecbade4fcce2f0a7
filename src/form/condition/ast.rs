// SPDX-License-Identifier: MIT

//! Abstract Syntax Tree for visibility conditions

use crate::form::state::Value;
use std::fmt;

/// A visibility condition over values in the store
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Comparison of a field's value against a literal
    Leaf {
        key: String,
        op: CompareOp,
        literal: Value,
    },
    /// Logical AND
    And(Box<Predicate>, Box<Predicate>),
    /// Logical OR
    Or(Box<Predicate>, Box<Predicate>),
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// ==
    Eq,
    /// !=
    NotEq,
}

impl CompareOp {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "==" => Some(CompareOp::Eq),
            "!=" => Some(CompareOp::NotEq),
            _ => None,
        }
    }
}

impl Predicate {
    /// `key == literal`
    pub fn eq(key: impl Into<String>, literal: impl Into<Value>) -> Self {
        Predicate::Leaf {
            key: key.into(),
            op: CompareOp::Eq,
            literal: literal.into(),
        }
    }

    /// `key != literal`
    pub fn ne(key: impl Into<String>, literal: impl Into<Value>) -> Self {
        Predicate::Leaf {
            key: key.into(),
            op: CompareOp::NotEq,
            literal: literal.into(),
        }
    }

    pub fn and(self, other: Predicate) -> Self {
        Predicate::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: Predicate) -> Self {
        Predicate::Or(Box::new(self), Box::new(other))
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompareOp::Eq => write!(f, "=="),
            CompareOp::NotEq => write!(f, "!="),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Leaf { key, op, literal } => write!(f, "{} {} {}", key, op, literal),
            Predicate::And(left, right) => write!(f, "({} and {})", left, right),
            Predicate::Or(left, right) => write!(f, "({} or {})", left, right),
        }
    }
}
