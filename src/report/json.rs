//! JSON projections of compiler state
//!
//! Each projection borrows from the compiler's own structures and is only
//! shaped for serialization. Keys follow the format consumed by the sketch
//! editor front end, hence the Spanish field names.

use crate::diagnostics::Diagnostics;
use crate::errors::{write_output, OutputError};
use crate::parser::ast::{Expr, FunctionCall, Item, Program};
use crate::parser::lexer::Token;
use crate::semantic::symbols::SymbolTable;
use serde::Serialize;
use std::path::Path;

pub const TOKENS_FILE: &str = "tokens.json";
pub const SYMBOLS_FILE: &str = "simbolos.json";
pub const AST_FILE: &str = "ast.json";
pub const ERRORS_FILE: &str = "errores.json";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenReport<'a> {
    pub tabla_tokens: Vec<TokenRow<'a>>,
}

#[derive(Debug, Serialize)]
pub struct TokenRow<'a> {
    pub token: &'a str,
    pub tipo: &'static str,
    pub linea: usize,
    pub columna: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolReport<'a> {
    pub tabla_simbolos: Vec<SymbolRow<'a>>,
}

#[derive(Debug, Serialize)]
pub struct SymbolRow<'a> {
    pub nombre: &'a str,
    pub tipo: &'static str,
    pub linea: usize,
    pub valor: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorReport<'a> {
    pub tabla_errores: Vec<ErrorRow<'a>>,
}

#[derive(Debug, Serialize)]
pub struct ErrorRow<'a> {
    pub mensaje: &'a str,
    pub linea: usize,
    pub columna: usize,
    pub tipo: String,
}

/// Program tree root
#[derive(Debug, Serialize)]
pub struct AstReport<'a> {
    pub tipo: &'static str,
    pub nombre: &'a str,
    pub declaraciones: Vec<AstItem<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "tipo", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AstItem<'a> {
    Incluir {
        archivo: &'a str,
    },
    Declaracion {
        identificador: &'a str,
        #[serde(rename = "tipoDato")]
        tipo_dato: &'static str,
        #[serde(skip_serializing_if = "Option::is_none")]
        valor: Option<&'a str>,
    },
    Configurar {
        instrucciones: Vec<AstCall<'a>>,
    },
    BuclePrincipal {
        instrucciones: Vec<AstCall<'a>>,
    },
}

#[derive(Debug, Serialize)]
pub struct AstCall<'a> {
    pub tipo: &'static str,
    pub nombre: &'a str,
    pub argumentos: Vec<&'a str>,
}

pub fn token_report(tokens: &[Token]) -> TokenReport<'_> {
    TokenReport {
        tabla_tokens: tokens
            .iter()
            .map(|t| TokenRow {
                token: &t.lexeme,
                tipo: t.kind.name(),
                linea: t.line(),
                columna: t.column(),
            })
            .collect(),
    }
}

pub fn symbol_report(symbols: &SymbolTable) -> SymbolReport<'_> {
    SymbolReport {
        tabla_simbolos: symbols
            .sorted()
            .into_iter()
            .map(|s| SymbolRow {
                nombre: &s.name,
                tipo: s.declared_type.name(),
                linea: s.declaration_line,
                valor: s.value.to_string(),
            })
            .collect(),
    }
}

pub fn error_report(diagnostics: &Diagnostics) -> ErrorReport<'_> {
    ErrorReport {
        tabla_errores: diagnostics
            .iter()
            .map(|d| ErrorRow {
                mensaje: &d.message,
                linea: d.line(),
                columna: d.column(),
                tipo: d.kind.to_string(),
            })
            .collect(),
    }
}

fn ast_calls(calls: &[FunctionCall]) -> Vec<AstCall<'_>> {
    calls
        .iter()
        .map(|call| AstCall {
            tipo: "LLAMADA_FUNCION",
            nombre: &call.name,
            argumentos: call.arguments.iter().map(Expr::text).collect(),
        })
        .collect()
}

pub fn ast_report(program: &Program) -> AstReport<'_> {
    let declaraciones = program
        .items
        .iter()
        .map(|item| match item {
            Item::Include { file, .. } => AstItem::Incluir { archivo: file },
            Item::VariableDeclaration {
                name,
                declared_type,
                initializer,
                ..
            } => AstItem::Declaracion {
                identificador: name,
                tipo_dato: declared_type.name(),
                valor: initializer.as_ref().map(Expr::text),
            },
            Item::ConfigureBlock { calls, .. } => AstItem::Configurar {
                instrucciones: ast_calls(calls),
            },
            Item::MainLoopBlock { calls, .. } => AstItem::BuclePrincipal {
                instrucciones: ast_calls(calls),
            },
        })
        .collect();

    AstReport {
        tipo: "PROGRAMA",
        nombre: &program.name,
        declaraciones,
    }
}

/// Serialize with a four-space indent
pub fn to_pretty_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;
    // serde_json only ever writes valid UTF-8
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Serialize `value` and write it to `path`
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), OutputError> {
    let json = to_pretty_json(value)?;
    write_output(path, &json)?;
    tracing::info!(path = %path.display(), "JSON written");
    Ok(())
}
