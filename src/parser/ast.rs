// AST (Abstract Syntax Tree) definitions for the sketch language

use std::fmt;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Data types of the source language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Integer, // entero
    Decimal, // decimal
    Text,    // cadena
    Boolean, // booleano
    Undefined,
}

impl DataType {
    /// Name used in the symbol table and JSON projections
    pub fn name(&self) -> &'static str {
        match self {
            DataType::Integer => "ENTERO",
            DataType::Decimal => "DECIMAL",
            DataType::Text => "CADENA",
            DataType::Boolean => "BOOLEANO",
            DataType::Undefined => "INDEFINIDO",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Argument or initializer expression: a literal or a variable reference
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Literal as written in the source (string literals without quotes)
    Literal {
        value: String,
        data_type: DataType,
        location: SourceLocation,
    },
    /// Reference to a declared variable; `data_type` is resolved at parse time
    /// and is `Undefined` when the name was never declared
    Variable {
        name: String,
        data_type: DataType,
        location: SourceLocation,
    },
}

impl Expr {
    pub fn data_type(&self) -> DataType {
        match self {
            Expr::Literal { data_type, .. } | Expr::Variable { data_type, .. } => *data_type,
        }
    }

    /// Source text of the expression (literal value or variable name)
    pub fn text(&self) -> &str {
        match self {
            Expr::Literal { value, .. } => value,
            Expr::Variable { name, .. } => name,
        }
    }
}

/// Call statement inside a configure or main-loop block
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub name: String,
    pub arguments: Vec<Expr>,
    pub location: SourceLocation,
}

/// Top-level item of a program
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    /// `incluir <"file">`
    Include {
        file: String,
        location: SourceLocation,
    },

    /// `entero x = 5;`
    VariableDeclaration {
        name: String,
        declared_type: DataType,
        initializer: Option<Expr>,
        location: SourceLocation,
    },

    /// `configurar ... fin_configurar`
    ConfigureBlock {
        calls: Vec<FunctionCall>,
        location: SourceLocation,
    },

    /// `bucle_principal ... fin_bucle`
    MainLoopBlock {
        calls: Vec<FunctionCall>,
        location: SourceLocation,
    },
}

impl Item {
    /// Node kind tag, the same as `tipo` in the JSON tree
    pub fn kind_name(&self) -> &'static str {
        match self {
            Item::Include { .. } => "INCLUIR",
            Item::VariableDeclaration { .. } => "DECLARACION",
            Item::ConfigureBlock { .. } => "CONFIGURAR",
            Item::MainLoopBlock { .. } => "BUCLE_PRINCIPAL",
        }
    }
}

/// Complete program (root of the AST)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub name: String,
    pub items: Vec<Item>,
    pub location: SourceLocation,
}

impl Program {
    pub fn new() -> Self {
        Program::default()
    }

    /// Variable declarations in source order
    pub fn declarations(&self) -> impl Iterator<Item = &Item> {
        self.items
            .iter()
            .filter(|item| matches!(item, Item::VariableDeclaration { .. }))
    }

    /// Calls of every configure block, in source order
    pub fn configure_calls(&self) -> impl Iterator<Item = &FunctionCall> {
        self.items.iter().flat_map(|item| match item {
            Item::ConfigureBlock { calls, .. } => calls.as_slice(),
            _ => &[][..],
        })
    }

    /// Calls of every main-loop block, in source order
    pub fn main_loop_calls(&self) -> impl Iterator<Item = &FunctionCall> {
        self.items.iter().flat_map(|item| match item {
            Item::MainLoopBlock { calls, .. } => calls.as_slice(),
            _ => &[][..],
        })
    }
}
