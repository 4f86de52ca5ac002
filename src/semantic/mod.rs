//! Semantic model and code generation
//!
//! - [`symbols`]: the symbol table filled while parsing
//! - [`codegen`]: Arduino C++ generation from a checked program
//! - [`constants`]: type, marker and call translation tables

pub mod codegen;
pub mod constants;
pub mod symbols;

pub use codegen::{generate, CodeGenerator};
pub use symbols::{Symbol, SymbolTable, Value};
