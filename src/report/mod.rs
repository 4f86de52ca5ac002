//! Human- and machine-readable views of a compilation
//!
//! - [`tables`]: ASCII tables for the terminal, colored with crossterm
//! - [`json`]: serde projections written next to the generated code

pub mod json;
pub mod tables;
mod theme;

pub use tables::{diagnostics_table, symbol_table, token_table, Table};
