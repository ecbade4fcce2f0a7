//! Condition evaluator

use super::ast::{CompareOp, Predicate};
use crate::form::state::{Value, ValueStore};

/// Evaluate a condition against the store.
///
/// Pure: the store is only read. A key that was never set is "unset", which
/// equals no literal, so `==` is false and `!=` is true.
pub fn evaluate(predicate: &Predicate, store: &ValueStore) -> bool {
    match predicate {
        Predicate::Leaf { key, op, literal } => evaluate_compare(key, *op, literal, store),
        Predicate::And(left, right) => evaluate(left, store) && evaluate(right, store),
        Predicate::Or(left, right) => evaluate(left, store) || evaluate(right, store),
    }
}

/// Evaluate a list of top-level conditions; all must hold, and an empty list always does
pub fn evaluate_all(predicates: &[Predicate], store: &ValueStore) -> bool {
    predicates.iter().all(|p| evaluate(p, store))
}

fn evaluate_compare(key: &str, op: CompareOp, literal: &Value, store: &ValueStore) -> bool {
    let current = store.get(key);

    match op {
        CompareOp::Eq => current.is_some_and(|v| v.matches(literal)),
        CompareOp::NotEq => !current.is_some_and(|v| v.matches(literal)),
    }
}
