//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure:
//! cursor helpers, token matching and panic-mode recovery.
//!
//! # Parser Architecture
//!
//! The Parser uses a recursive descent approach with one token of lookahead:
//! - This module: Parser struct, helper methods, and coordination
//! - `declarations`: program header, includes, variable declarations, expressions
//! - `statements`: configure and main-loop blocks, call statements
//!
//! # Error handling
//!
//! The parser never gives up on the first error. Every problem is appended to
//! the caller's [`Diagnostics`] and the parser resynchronizes on `;`, `}` or
//! `fin_programa`, so a single run reports as many errors as possible.
//! Productions that fail are simply left out of the tree.
//!
//! Semantic checks (duplicate declarations, undeclared variables) run inline
//! while the [`SymbolTable`] is being filled.

use crate::diagnostics::Diagnostics;
use crate::parser::ast::*;
use crate::parser::lexer::{Token, TokenKind};
use crate::semantic::symbols::SymbolTable;

/// Recursive descent parser for the sketch language
pub struct Parser<'d> {
    pub(crate) tokens: Vec<Token>,
    pub(crate) position: usize,
    pub(crate) symbols: SymbolTable,
    pub(crate) diagnostics: &'d mut Diagnostics,
    sentinel: Token,
    overrun_reported: bool,
}

impl<'d> Parser<'d> {
    /// Create a parser over a finished token stream.
    ///
    /// A synthetic `fin_programa` token is appended unless the stream already
    /// ends with one, so recovery always has a final synchronization point.
    pub fn new(mut tokens: Vec<Token>, diagnostics: &'d mut Diagnostics) -> Self {
        let last_location = tokens
            .last()
            .map_or(SourceLocation::new(1, 1), |t| t.location);

        if tokens.last().map(|t| t.kind) != Some(TokenKind::EndProgram) {
            tokens.push(Token::new(TokenKind::EndProgram, "", last_location));
        }

        Self {
            tokens,
            position: 0,
            symbols: SymbolTable::new(),
            diagnostics,
            sentinel: Token::new(TokenKind::Unknown, "", last_location),
            overrun_reported: false,
        }
    }

    /// Parse the entire program
    pub fn parse_program(&mut self) -> Program {
        let _span = tracing::debug_span!("parse").entered();
        let program = self.parse_program_root();

        tracing::debug!(
            items = program.items.len(),
            symbols = self.symbols.len(),
            "syntactic analysis finished"
        );
        program
    }

    /// Consume the parser, keeping the symbol table it built
    pub fn into_symbol_table(self) -> SymbolTable {
        self.symbols
    }

    // ===== Helper methods =====

    /// Token under the cursor.
    ///
    /// Reading past the end records one "unexpected end of file" error and then
    /// keeps returning the same `Unknown` sentinel.
    pub(crate) fn current(&mut self) -> &Token {
        if self.position < self.tokens.len() {
            return &self.tokens[self.position];
        }

        if !self.overrun_reported {
            self.overrun_reported = true;
            let location = self.sentinel.location;
            self.diagnostics.syntactic("unexpected end of file", location);
        }
        &self.sentinel
    }

    pub(crate) fn current_kind(&mut self) -> TokenKind {
        self.current().kind
    }

    pub(crate) fn current_location(&mut self) -> SourceLocation {
        self.current().location
    }

    pub(crate) fn current_token(&mut self) -> Token {
        self.current().clone()
    }

    pub(crate) fn check(&mut self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    pub(crate) fn advance(&mut self) {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
    }

    /// True once the cursor has moved past the last token
    pub(crate) fn is_exhausted(&self) -> bool {
        self.position >= self.tokens.len()
    }

    /// Consume a token of the expected kind, or report and recover
    pub(crate) fn expect(&mut self, expected: TokenKind) -> bool {
        if self.check(expected) {
            self.advance();
            return true;
        }

        let found = self.current_token();
        self.diagnostics.syntactic(
            format!("unexpected token: expected {}, found {}", expected, found),
            found.location,
        );
        self.synchronize();
        false
    }

    /// Record a syntax error at the current token
    pub(crate) fn error_here(&mut self, message: impl Into<String>) {
        let location = self.current_location();
        self.diagnostics.syntactic(message, location);
    }

    /// Panic-mode recovery.
    ///
    /// Skips tokens up to the next `;`, `}` or `fin_programa` without consuming
    /// it. If the cursor is already on one of them it moves one token forward,
    /// so the caller can never see the same failure twice.
    pub(crate) fn synchronize(&mut self) {
        let start = self.position;
        self.skip_to_boundary();

        if self.position == start {
            self.position += 1;
        }
        tracing::trace!(from = start, to = self.position, "panic-mode recovery");
    }

    /// Move to the next `;`, `}` or `fin_programa`, staying put if already there
    pub(crate) fn skip_to_boundary(&mut self) {
        while let Some(token) = self.tokens.get(self.position) {
            if matches!(
                token.kind,
                TokenKind::Semicolon | TokenKind::RBrace | TokenKind::EndProgram
            ) {
                break;
            }
            self.position += 1;
        }
    }

    /// Recovery for a dropped statement.
    ///
    /// Like [`synchronize`](Self::synchronize), but a `;` terminator is consumed
    /// as part of the statement being thrown away and `fin_programa` never is.
    pub(crate) fn recover_statement(&mut self) {
        let start = self.position;
        self.skip_to_boundary();

        match self.tokens.get(self.position).map(|t| t.kind) {
            Some(TokenKind::Semicolon) => self.position += 1,
            Some(TokenKind::EndProgram) => {}
            _ if self.position == start => self.position += 1,
            _ => {}
        }
        tracing::trace!(from = start, to = self.position, "statement dropped");
    }
}

/// Parse a token stream into a program and the symbol table built along the way
pub fn parse(tokens: Vec<Token>, diagnostics: &mut Diagnostics) -> (Program, SymbolTable) {
    let mut parser = Parser::new(tokens, diagnostics);
    let program = parser.parse_program();
    (program, parser.into_symbol_table())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticKind;
    use crate::parser::lexer::tokenize;

    fn parse_source(source: &str) -> (Program, SymbolTable, Diagnostics) {
        let mut diagnostics = Diagnostics::new();
        let tokens = tokenize(source, &mut diagnostics);
        let (program, symbols) = parse(tokens, &mut diagnostics);
        (program, symbols, diagnostics)
    }

    #[test]
    fn test_parse_minimal_program() {
        let (program, symbols, diagnostics) = parse_source("programa Vacio fin_programa");

        assert!(diagnostics.is_empty(), "{:?}", diagnostics);
        assert_eq!(program.name, "Vacio");
        assert!(program.items.is_empty());
        assert!(symbols.is_empty());
    }

    #[test]
    fn test_synthetic_end_program() {
        let mut diagnostics = Diagnostics::new();
        let tokens = vec![Token::new(TokenKind::Eof, "", SourceLocation::new(4, 2))];
        let parser = Parser::new(tokens, &mut diagnostics);

        assert_eq!(parser.tokens.len(), 2);
        assert_eq!(parser.tokens[1].kind, TokenKind::EndProgram);
        assert_eq!(parser.tokens[1].location, SourceLocation::new(4, 2));
    }

    #[test]
    fn test_existing_end_program_is_kept() {
        let mut diagnostics = Diagnostics::new();
        let tokens = vec![Token::new(TokenKind::EndProgram, "fin_programa", SourceLocation::new(1, 1))];
        let parser = Parser::new(tokens, &mut diagnostics);

        assert_eq!(parser.tokens.len(), 1);
    }

    #[test]
    fn test_overrun_reports_once() {
        let mut diagnostics = Diagnostics::new();
        let tokens = vec![Token::new(TokenKind::Eof, "", SourceLocation::new(3, 9))];
        {
            let mut parser = Parser::new(tokens, &mut diagnostics);
            parser.position = 10;

            assert_eq!(parser.current_kind(), TokenKind::Unknown);
            assert_eq!(parser.current_kind(), TokenKind::Unknown);
            parser.synchronize();
            assert_eq!(parser.current_kind(), TokenKind::Unknown);
        }

        assert_eq!(diagnostics.len(), 1);
        let error = &diagnostics.as_slice()[0];
        assert_eq!(error.kind, DiagnosticKind::Syntactic);
        assert_eq!(error.message, "unexpected end of file");
        assert_eq!(error.location, SourceLocation::new(3, 9));
    }

    #[test]
    fn test_synchronize_forces_progress() {
        let mut diagnostics = Diagnostics::new();
        let tokens = tokenize("; x y ; z", &mut Diagnostics::new());
        let mut parser = Parser::new(tokens, &mut diagnostics);

        // already on a boundary: move one token
        parser.synchronize();
        assert_eq!(parser.position, 1);

        // skip to the next boundary without consuming it
        parser.synchronize();
        assert_eq!(parser.position, 3);
        assert_eq!(parser.current_kind(), TokenKind::Semicolon);

        parser.skip_to_boundary();
        assert_eq!(parser.position, 3);
    }

    #[test]
    fn test_recover_statement_consumes_terminator() {
        let mut diagnostics = Diagnostics::new();
        let tokens = tokenize("a b ; c", &mut Diagnostics::new());
        let mut parser = Parser::new(tokens, &mut diagnostics);

        parser.recover_statement();
        assert_eq!(parser.current_token().lexeme, "c");

        // stops in front of the program terminator
        parser.recover_statement();
        assert_eq!(parser.current_kind(), TokenKind::EndProgram);
        parser.recover_statement();
        assert_eq!(parser.current_kind(), TokenKind::EndProgram);
    }

    #[test]
    fn test_expect_mismatch_reports_and_recovers() {
        let mut diagnostics = Diagnostics::new();
        let tokens = tokenize("x y ; z", &mut Diagnostics::new());
        {
            let mut parser = Parser::new(tokens, &mut diagnostics);
            assert!(!parser.expect(TokenKind::LParen));
            assert_eq!(parser.current_kind(), TokenKind::Semicolon);
            assert!(parser.expect(TokenKind::Semicolon));
        }

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics.as_slice()[0].message,
            "unexpected token: expected '(', found identifier 'x'"
        );
    }

    #[test]
    fn test_empty_token_stream() {
        let (program, _) = parse(Vec::new(), &mut Diagnostics::new());
        assert!(program.items.is_empty());
    }
}
