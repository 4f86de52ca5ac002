//! Arduino C++ code generation
//!
//! A single walk over the [`Program`] produces a complete sketch. Items are
//! regrouped by kind rather than emitted in source order:
//!
//! 1. `#include <Arduino.h>` and one include per `incluir`
//! 2. every variable declaration, as globals
//! 3. `void setup()` holding the calls of every `configurar` block
//! 4. `void loop()` holding the calls of every `bucle_principal` block
//!
//! Generation assumes a program that compiled without diagnostics. It never
//! checks for errors itself.

use super::constants::{self, ARDUINO_HEADER};
use super::symbols::{SymbolTable, Value};
use crate::errors::{write_output, OutputError};
use crate::parser::ast::*;
use std::path::Path;

const INDENT: &str = "  ";

/// Generates Arduino C++ from a parsed program
pub struct CodeGenerator<'a> {
    program: &'a Program,
    symbols: &'a SymbolTable,
}

impl<'a> CodeGenerator<'a> {
    pub fn new(program: &'a Program, symbols: &'a SymbolTable) -> Self {
        Self { program, symbols }
    }

    /// Produce the full sketch text
    pub fn generate(&self) -> String {
        let mut out = String::new();

        out.push_str(&format!("#include <{}>\n", ARDUINO_HEADER));
        for item in &self.program.items {
            if let Item::Include { file, .. } = item {
                out.push_str(&format!("#include <{}>\n", file));
            }
        }
        out.push('\n');

        for item in self.program.declarations() {
            if let Item::VariableDeclaration {
                name,
                declared_type,
                initializer,
                ..
            } = item
            {
                out.push_str(&self.declaration(name, *declared_type, initializer.as_ref()));
            }
        }

        out.push_str("\nvoid setup() {\n");
        for call in self.program.configure_calls() {
            out.push_str(&self.call(call));
        }
        out.push_str("}\n\nvoid loop() {\n");
        for call in self.program.main_loop_calls() {
            out.push_str(&self.call(call));
        }
        out.push_str("}\n");

        tracing::debug!(bytes = out.len(), "code generation finished");
        out
    }

    /// Generate and write the sketch to `path`
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), OutputError> {
        let path = path.as_ref();
        write_output(path, &self.generate())?;
        tracing::info!(path = %path.display(), "generated code written");
        Ok(())
    }

    fn declaration(&self, name: &str, declared_type: DataType, initializer: Option<&Expr>) -> String {
        // pin modes and levels are integer constants on the board
        let cpp_type = if declared_type == DataType::Text && self.holds_marker(initializer) {
            "int"
        } else {
            constants::cpp_type(declared_type)
        };

        match initializer {
            Some(expr) => format!("{} {} = {};\n", cpp_type, name, self.expression(expr)),
            None => format!("{} {};\n", cpp_type, name),
        }
    }

    /// True when the initializer is a marker literal or a variable holding one
    fn holds_marker(&self, initializer: Option<&Expr>) -> bool {
        match initializer {
            Some(Expr::Literal {
                value,
                data_type: DataType::Text,
                ..
            }) => constants::marker_constant(value).is_some(),
            Some(Expr::Variable { name, .. }) => matches!(
                self.symbols.lookup(name).map(|s| &s.value),
                Some(Value::Text(text)) if constants::marker_constant(text).is_some()
            ),
            _ => false,
        }
    }

    fn call(&self, call: &FunctionCall) -> String {
        let arguments: Vec<String> = call.arguments.iter().map(|a| self.expression(a)).collect();
        format!(
            "{}{}({});\n",
            INDENT,
            constants::call_name(&call.name),
            arguments.join(", ")
        )
    }

    fn expression(&self, expr: &Expr) -> String {
        match expr {
            Expr::Variable { name, .. } => name.clone(),
            Expr::Literal {
                value, data_type, ..
            } => match data_type {
                DataType::Text => match constants::marker_constant(value) {
                    Some(constant) => constant.to_string(),
                    None => format!("\"{}\"", value),
                },
                DataType::Boolean => (value == "verdadero").to_string(),
                _ => value.clone(),
            },
        }
    }
}

/// Generate the sketch for a program
pub fn generate(program: &Program, symbols: &SymbolTable) -> String {
    CodeGenerator::new(program, symbols).generate()
}
