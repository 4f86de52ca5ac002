//! Sketch source parser
//!
//! This module transforms sketch source text into an Abstract Syntax Tree (AST):
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`parse`]: Parsing (tokens → AST + symbol table)
//! - [`ast`]: AST node definitions
//!
//! # Supported language
//!
//! - Types: `entero`, `decimal`, `cadena`, `booleano`
//! - Top level: `incluir`, variable declarations, `configurar` and
//!   `bucle_principal` blocks in any order
//! - Block statements: `configurar_pin`, `escribir`, `esperar` calls whose
//!   arguments are literals or variables
//!
//! Control-flow keywords (`si`, `mientras`, `para`, ...) are reserved by the
//! lexer but not accepted by the grammar.
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser with panic-mode error recovery.
//! No external parser generator dependencies.

pub mod ast;
mod declarations;
pub mod lexer;
pub mod parse;
mod statements;

pub use lexer::{tokenize, Lexer, Token, TokenKind};
pub use parse::{parse, Parser};
