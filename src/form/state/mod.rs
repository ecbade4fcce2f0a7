// SPDX-License-Identifier: MIT

//! Value storage for form sessions
//!
//! This module provides:
//! - `Value` - a field value or condition literal
//! - `ValueStore` - the single source of truth for entered values

mod store;
mod value;

pub use store::ValueStore;
pub use value::Value;
