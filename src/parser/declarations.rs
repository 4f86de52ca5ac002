//! Declaration parsing implementation
//!
//! This module handles the top level of a program:
//!
//! - Program header and terminator: `programa Nombre ... fin_programa`
//! - Library includes: `incluir <"Servo.h">`
//! - Variable declarations: `entero led = 13;`
//! - Expressions: a literal or a variable reference
//!
//! # Grammar
//!
//! ```text
//! program    ::= "programa" identifier item* "fin_programa"
//! item       ::= include | var_decl | configure | main_loop
//! include    ::= "incluir" "<" string ">"
//! var_decl   ::= type identifier ( "=" expression )? ";"
//! expression ::= identifier | literal
//! ```
//!
//! Declarations are registered in the symbol table as soon as they are parsed.
//! A re-declared name is reported but still replaces the earlier entry.

use crate::parser::ast::*;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::Parser;
use crate::semantic::symbols::{Symbol, Value};

/// Declared type for a type keyword, or the type of a literal token
pub(crate) fn data_type_of(kind: TokenKind) -> DataType {
    match kind {
        TokenKind::IntegerType | TokenKind::IntegerLiteral => DataType::Integer,
        TokenKind::DecimalType | TokenKind::DecimalLiteral => DataType::Decimal,
        TokenKind::TextType | TokenKind::StringLiteral => DataType::Text,
        TokenKind::BooleanType | TokenKind::True | TokenKind::False => DataType::Boolean,
        _ => DataType::Undefined,
    }
}

impl Parser<'_> {
    /// Parse `programa <name> item* fin_programa`
    pub(crate) fn parse_program_root(&mut self) -> Program {
        let mut program = Program::new();
        program.location = self.current_location();

        self.expect(TokenKind::Program);
        if self.check(TokenKind::Identifier) {
            program.name = self.current_token().lexeme;
        }
        self.expect(TokenKind::Identifier);

        while !self.is_exhausted() && !self.check(TokenKind::EndProgram) {
            let kind = self.current_kind();
            let item = match kind {
                TokenKind::Include => self.parse_include(),
                k if k.is_data_type() => self.parse_variable_declaration(),
                TokenKind::Configure => Some(self.parse_configure_block()),
                TokenKind::MainLoop => Some(self.parse_main_loop_block()),
                _ => {
                    let found = self.current_token();
                    self.error_here(format!("invalid declaration or statement, found {}", found));
                    self.recover_statement();
                    None
                }
            };

            if let Some(item) = item {
                program.items.push(item);
            }
        }

        self.expect(TokenKind::EndProgram);
        program
    }

    /// Parse `incluir < "file" >`
    pub(crate) fn parse_include(&mut self) -> Option<Item> {
        let location = self.current_location();
        self.advance(); // consume 'incluir'

        self.expect(TokenKind::Lt);

        if !self.check(TokenKind::StringLiteral) {
            self.error_here("expected file name in quotes");
            self.recover_statement();
            return None;
        }
        let file = self.current_token().lexeme;
        self.advance();

        self.expect(TokenKind::Gt);

        Some(Item::Include { file, location })
    }

    /// Parse `type identifier (= expression)? ;` and register the symbol
    pub(crate) fn parse_variable_declaration(&mut self) -> Option<Item> {
        let location = self.current_location();
        let declared_type = data_type_of(self.current_kind());
        self.advance(); // consume type keyword

        if !self.check(TokenKind::Identifier) {
            self.error_here("expected identifier after data type");
            self.recover_statement();
            return None;
        }
        let ident = self.current_token();
        if self.symbols.contains(&ident.lexeme) {
            self.diagnostics.semantic(
                format!("variable already declared: {}", ident.lexeme),
                ident.location,
            );
        }
        self.advance();

        let initializer = if self.check(TokenKind::Assign) {
            self.advance();
            self.parse_expression()
        } else {
            None
        };

        self.expect(TokenKind::Semicolon);

        let value = match &initializer {
            Some(Expr::Literal { value, data_type, .. }) => Value::from_literal(value, *data_type),
            Some(Expr::Variable { name, .. }) => self
                .symbols
                .lookup(name)
                .map(|s| s.value.clone())
                .unwrap_or_default(),
            None => Value::Unset,
        };
        self.symbols.insert(Symbol {
            name: ident.lexeme.clone(),
            declared_type,
            declaration_line: location.line,
            value,
        });

        Some(Item::VariableDeclaration {
            name: ident.lexeme,
            declared_type,
            initializer,
            location,
        })
    }

    /// Parse an identifier or a literal.
    ///
    /// Identifiers are resolved immediately; an unknown name is reported at
    /// its own position and typed `Undefined`.
    pub(crate) fn parse_expression(&mut self) -> Option<Expr> {
        let token = self.current_token();

        match token.kind {
            TokenKind::Identifier => {
                let data_type = match self.symbols.lookup(&token.lexeme) {
                    Some(symbol) => symbol.declared_type,
                    None => {
                        self.diagnostics.semantic(
                            format!("variable not declared: {}", token.lexeme),
                            token.location,
                        );
                        DataType::Undefined
                    }
                };
                self.advance();
                Some(Expr::Variable {
                    name: token.lexeme,
                    data_type,
                    location: token.location,
                })
            }
            kind if kind.is_literal() => {
                self.advance();
                Some(Expr::Literal {
                    value: token.lexeme,
                    data_type: data_type_of(kind),
                    location: token.location,
                })
            }
            _ => {
                // the enclosing statement consumes the boundary
                self.error_here(format!("invalid expression, found {}", token));
                self.skip_to_boundary();
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::diagnostics::{DiagnosticKind, Diagnostics};
    use crate::parser::ast::*;
    use crate::parser::lexer::tokenize;
    use crate::parser::parse::parse;
    use crate::semantic::symbols::{SymbolTable, Value};

    fn parse_source(source: &str) -> (Program, SymbolTable, Diagnostics) {
        let mut diagnostics = Diagnostics::new();
        let tokens = tokenize(source, &mut diagnostics);
        let (program, symbols) = parse(tokens, &mut diagnostics);
        (program, symbols, diagnostics)
    }

    #[test]
    fn test_parse_variable_declarations() {
        let source = r#"programa P
            entero x = 5;
            decimal d = 2.5;
            cadena s = "hola";
            booleano b = verdadero;
            entero sin_valor;
        fin_programa"#;
        let (program, symbols, diagnostics) = parse_source(source);

        assert!(diagnostics.is_empty(), "{:?}", diagnostics);
        assert_eq!(program.items.len(), 5);
        match &program.items[0] {
            Item::VariableDeclaration {
                name,
                declared_type,
                initializer,
                location,
            } => {
                assert_eq!(name, "x");
                assert_eq!(*declared_type, DataType::Integer);
                assert_eq!(location.line, 2);
                match initializer {
                    Some(Expr::Literal { value, data_type, .. }) => {
                        assert_eq!(value, "5");
                        assert_eq!(*data_type, DataType::Integer);
                    }
                    other => panic!("Expected literal initializer, got {:?}", other),
                }
            }
            _ => panic!("Expected variable declaration"),
        }

        assert_eq!(symbols.lookup("x").unwrap().value, Value::Integer(5));
        assert_eq!(symbols.lookup("d").unwrap().value, Value::Float(2.5));
        assert_eq!(symbols.lookup("s").unwrap().value, Value::Text("hola".into()));
        assert_eq!(symbols.lookup("b").unwrap().value, Value::Boolean(true));
        assert_eq!(symbols.lookup("sin_valor").unwrap().value, Value::Unset);
        assert_eq!(symbols.lookup("sin_valor").unwrap().declaration_line, 6);
    }

    #[test]
    fn test_variable_initializer_copies_value() {
        let (program, symbols, diagnostics) =
            parse_source("programa P entero a = 7; entero b = a; fin_programa");

        assert!(diagnostics.is_empty());
        assert_eq!(symbols.lookup("b").unwrap().value, Value::Integer(7));
        match &program.items[1] {
            Item::VariableDeclaration {
                initializer: Some(Expr::Variable { name, data_type, .. }),
                ..
            } => {
                assert_eq!(name, "a");
                assert_eq!(*data_type, DataType::Integer);
            }
            _ => panic!("Expected variable initializer"),
        }
    }

    #[test]
    fn test_duplicate_declaration_overwrites() {
        let (program, symbols, diagnostics) =
            parse_source("programa P\nentero x = 5;\ncadena x = \"ALTO\";\nfin_programa");

        assert_eq!(diagnostics.len(), 1);
        let error = &diagnostics.as_slice()[0];
        assert_eq!(error.kind, DiagnosticKind::Semantic);
        assert_eq!(error.message, "variable already declared: x");
        assert_eq!(error.location, SourceLocation::new(3, 8));

        let symbol = symbols.lookup("x").unwrap();
        assert_eq!(symbol.declared_type, DataType::Text);
        assert_eq!(symbol.value, Value::Text("ALTO".into()));
        assert_eq!(symbol.declaration_line, 3);
        assert_eq!(program.items.len(), 2);
    }

    #[test]
    fn test_undeclared_variable_each_occurrence() {
        let (program, _, diagnostics) =
            parse_source("programa P\nentero a = y;\nentero b = y;\nfin_programa");

        assert_eq!(diagnostics.len(), 2);
        for (error, line) in diagnostics.iter().zip([2, 3]) {
            assert_eq!(error.kind, DiagnosticKind::Semantic);
            assert_eq!(error.message, "variable not declared: y");
            assert_eq!(error.location, SourceLocation::new(line, 12));
        }
        match &program.items[0] {
            Item::VariableDeclaration {
                initializer: Some(Expr::Variable { data_type, .. }),
                ..
            } => assert_eq!(*data_type, DataType::Undefined),
            _ => panic!("Expected variable initializer"),
        }
    }

    #[test]
    fn test_self_reference_is_undeclared() {
        let (_, symbols, diagnostics) = parse_source("programa P entero x = x; fin_programa");

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics.as_slice()[0].message, "variable not declared: x");
        assert!(symbols.contains("x"));
    }

    #[test]
    fn test_parse_include() {
        let (program, _, diagnostics) =
            parse_source(r#"programa P incluir <"Servo.h"> fin_programa"#);

        assert!(diagnostics.is_empty(), "{:?}", diagnostics);
        match &program.items[0] {
            Item::Include { file, .. } => assert_eq!(file, "Servo.h"),
            _ => panic!("Expected include"),
        }
    }

    #[test]
    fn test_include_without_quotes() {
        let (program, _, diagnostics) = parse_source("programa P incluir <Servo> fin_programa");

        assert!(program.items.is_empty());
        assert_eq!(diagnostics.as_slice()[0].message, "expected file name in quotes");
        assert_eq!(diagnostics.as_slice()[0].kind, DiagnosticKind::Syntactic);
    }

    #[test]
    fn test_missing_identifier_after_type() {
        let (program, symbols, diagnostics) =
            parse_source("programa P entero = 5; entero y = 1; fin_programa");

        assert_eq!(
            diagnostics.as_slice()[0].message,
            "expected identifier after data type"
        );
        // the broken declaration is dropped, the next one still parses
        assert!(symbols.contains("y"));
        assert_eq!(program.items.len(), 1);
        assert!(diagnostics.iter().all(|d| d.kind == DiagnosticKind::Syntactic));
    }

    #[test]
    fn test_invalid_top_level_statement() {
        let (program, _, diagnostics) =
            parse_source("programa P escribir(1, 2); entero x; fin_programa");

        assert_eq!(
            diagnostics.as_slice()[0].message,
            "invalid declaration or statement, found 'escribir'"
        );
        assert_eq!(program.items.len(), 1);
    }

    #[test]
    fn test_invalid_expression() {
        let (program, symbols, diagnostics) =
            parse_source("programa P entero x = ; fin_programa");

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics.as_slice()[0].message, "invalid expression, found ';'");
        assert!(symbols.contains("x"));
        match &program.items[0] {
            Item::VariableDeclaration { initializer, .. } => assert!(initializer.is_none()),
            _ => panic!("Expected variable declaration"),
        }
    }

    #[test]
    fn test_missing_end_program() {
        let (_, symbols, diagnostics) = parse_source("programa P entero x = 1;");

        assert!(symbols.contains("x"));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics.as_slice()[0].message,
            "invalid declaration or statement, found end of file"
        );
    }

    #[test]
    fn test_missing_program_header() {
        let (_, _, diagnostics) = parse_source("entero x = 1; fin_programa");

        assert!(diagnostics.len() >= 2);
        assert!(diagnostics.as_slice()[0]
            .message
            .starts_with("unexpected token: expected 'programa'"));
    }
}
