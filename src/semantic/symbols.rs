//! Symbol table
//!
//! Populated by the parser as declarations are accepted and read afterwards by
//! the code generator. Keys are unique: [`SymbolTable::insert`] replaces any
//! previous entry with the same name. Duplicate detection is the parser's job
//! and is advisory only, so a re-declaration still overwrites the old symbol.

use crate::parser::ast::DataType;
use rustc_hash::FxHashMap;
use std::fmt;

/// Value recorded for a symbol at declaration time
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Text(String),
    Boolean(bool),
    #[default]
    Unset, // declared without initializer
}

impl Value {
    /// Build a value from literal source text of the given type.
    ///
    /// Returns `Unset` when the text does not fit the type (an integer literal
    /// too large for `i64`, for instance).
    pub fn from_literal(text: &str, data_type: DataType) -> Value {
        match data_type {
            DataType::Integer => text.parse().map(Value::Integer).unwrap_or_default(),
            DataType::Decimal => text.parse().map(Value::Float).unwrap_or_default(),
            DataType::Text => Value::Text(text.to_string()),
            DataType::Boolean => Value::Boolean(text == "verdadero"),
            DataType::Undefined => Value::Unset,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{}", x),
            Value::Text(s) => write!(f, "{}", s),
            Value::Boolean(true) => write!(f, "verdadero"),
            Value::Boolean(false) => write!(f, "falso"),
            Value::Unset => Ok(()),
        }
    }
}

/// A declared variable
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub name: String,
    pub declared_type: DataType,
    pub declaration_line: usize,
    pub value: Value,
}

/// Name -> symbol store
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    symbols: FxHashMap<String, Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a symbol, returning the entry it replaced, if any
    pub fn insert(&mut self, symbol: Symbol) -> Option<Symbol> {
        self.symbols.insert(symbol.name.clone(), symbol)
    }

    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Symbols ordered by declaration line, then name
    pub fn sorted(&self) -> Vec<&Symbol> {
        let mut symbols: Vec<&Symbol> = self.symbols.values().collect();
        symbols.sort_by(|a, b| {
            a.declaration_line
                .cmp(&b.declaration_line)
                .then_with(|| a.name.cmp(&b.name))
        });
        symbols
    }
}
