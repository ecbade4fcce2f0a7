// SPDX-License-Identifier: MIT

pub mod builder;
pub mod catalog;
pub mod condition;
pub mod controller;
pub mod descriptor;
pub mod error;
pub mod loader;
pub mod panel;
pub mod registry;
pub mod state;
pub mod types;
