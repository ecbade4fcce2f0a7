// SPDX-License-Identifier: MIT

//! Conditional-visibility form engine
//!
//! Fields and panels are declared with show conditions over a shared value
//! store. Every value change reconciles the rendered widgets so that exactly
//! the fields whose conditions hold are on screen, in declaration order.

pub mod form;
pub mod ui;
