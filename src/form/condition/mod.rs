// SPDX-License-Identifier: MIT

//! Visibility conditions for fields and panels
//!
//! Conditions are equality tests over stored values joined by `and` / `or`:
//! - `calculation == 'relax'`
//! - `input_dft != 'blyp'`
//! - `assume_isolated == 'esm' and (esm_bc == 'bc2' or esm_bc == 'bc3')`

mod ast;
mod evaluator;
mod parser;

pub use ast::{CompareOp, Predicate};
pub use evaluator::{evaluate, evaluate_all};
pub use parser::{from_tree, parse};
