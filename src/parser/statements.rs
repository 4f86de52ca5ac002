//! Statement parsing implementation
//!
//! This module handles the two lifecycle blocks and the call statements they
//! contain:
//!
//! - Configure blocks: `configurar ... fin_configurar`
//! - Main-loop blocks: `bucle_principal ... fin_bucle`
//! - Call statements: `escribir(led, "ALTO");`
//!
//! # Grammar
//!
//! ```text
//! configure ::= "configurar" pin_call* "fin_configurar"
//! main_loop ::= "bucle_principal" ( write_call | wait_call )* "fin_bucle"
//! call      ::= name "(" ( expression ( "," expression )* )? ")" ";"
//! ```
//!
//! Each block accepts only its own calls. Anything else inside a block is
//! reported and skipped up to the next statement boundary.

use crate::parser::ast::*;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::Parser;

impl Parser<'_> {
    /// Parse `configurar pin_call* fin_configurar`
    pub(crate) fn parse_configure_block(&mut self) -> Item {
        let location = self.current_location();
        self.advance(); // consume 'configurar'

        let calls = self.parse_block_calls(&[TokenKind::PinMode], "configure block");
        self.expect_block_end(TokenKind::EndConfigure);

        Item::ConfigureBlock { calls, location }
    }

    /// Parse `bucle_principal (write_call | wait_call)* fin_bucle`
    pub(crate) fn parse_main_loop_block(&mut self) -> Item {
        let location = self.current_location();
        self.advance(); // consume 'bucle_principal'

        let calls = self.parse_block_calls(&[TokenKind::Write, TokenKind::Wait], "main loop");
        self.expect_block_end(TokenKind::EndLoop);

        Item::MainLoopBlock { calls, location }
    }

    /// Collect calls until a block terminator, rejecting calls not in `allowed`
    fn parse_block_calls(&mut self, allowed: &[TokenKind], block: &str) -> Vec<FunctionCall> {
        let mut calls = Vec::new();

        while !self.is_exhausted() && !self.is_block_end() {
            let kind = self.current_kind();
            if allowed.contains(&kind) {
                if let Some(call) = self.parse_function_call() {
                    calls.push(call);
                }
            } else {
                let found = self.current_token();
                self.error_here(format!("invalid statement in {}, found {}", block, found));
                self.recover_statement();
            }
        }

        calls
    }

    /// Block terminators. `fin_programa` also closes an unterminated block.
    pub(crate) fn is_block_end(&mut self) -> bool {
        matches!(
            self.current_kind(),
            TokenKind::EndConfigure | TokenKind::EndLoop | TokenKind::EndProgram
        )
    }

    /// Match a block terminator, leaving `fin_programa` for the program rule
    fn expect_block_end(&mut self, expected: TokenKind) {
        if self.check(TokenKind::EndProgram) {
            let found = self.current_token();
            self.error_here(format!(
                "unexpected token: expected {}, found {}",
                expected, found
            ));
            return;
        }
        self.expect(expected);
    }

    /// Parse `name ( args ) ;`
    ///
    /// A call whose argument list cannot be read is dropped. Missing closing
    /// delimiters are reported but the call is kept.
    pub(crate) fn parse_function_call(&mut self) -> Option<FunctionCall> {
        let name_token = self.current_token();
        self.advance();

        if !self.check(TokenKind::LParen) {
            self.error_here("expected '(' after function name");
            self.recover_statement();
            return None;
        }
        self.advance();

        let mut arguments = Vec::new();
        while !self.is_exhausted()
            && !self.check(TokenKind::RParen)
            && !self.check(TokenKind::Semicolon)
            && !self.is_block_end()
        {
            match self.parse_expression() {
                Some(argument) => arguments.push(argument),
                None => {
                    if self.check(TokenKind::Semicolon) {
                        self.advance();
                    }
                    return None;
                }
            }

            if self.check(TokenKind::Comma) {
                self.advance();
            } else if !self.check(TokenKind::RParen)
                && !self.check(TokenKind::Semicolon)
                && !self.is_block_end()
            {
                self.error_here("expected ',' or ')' in argument list");
                self.recover_statement();
                return None;
            }
        }

        if self.check(TokenKind::RParen) {
            self.advance();
        } else {
            self.error_here("expected ')' to close function call");
        }

        if self.check(TokenKind::Semicolon) {
            self.advance();
        } else {
            self.error_here("expected ';' after function call");
        }

        Some(FunctionCall {
            name: name_token.lexeme,
            arguments,
            location: name_token.location,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::diagnostics::{DiagnosticKind, Diagnostics};
    use crate::parser::ast::*;
    use crate::parser::lexer::tokenize;
    use crate::parser::parse::parse;

    fn parse_source(source: &str) -> (Program, Diagnostics) {
        let mut diagnostics = Diagnostics::new();
        let tokens = tokenize(source, &mut diagnostics);
        let (program, _) = parse(tokens, &mut diagnostics);
        (program, diagnostics)
    }

    fn messages(diagnostics: &Diagnostics) -> Vec<&str> {
        diagnostics.iter().map(|d| d.message.as_str()).collect()
    }

    #[test]
    fn test_parse_blocks() {
        let source = r#"programa P
            configurar
                configurar_pin(13, "SALIDA");
            fin_configurar
            bucle_principal
                escribir(13, "ALTO");
                esperar(1000);
            fin_bucle
        fin_programa"#;
        let (program, diagnostics) = parse_source(source);

        assert!(diagnostics.is_empty(), "{:?}", diagnostics);
        assert_eq!(program.items.len(), 2);

        let setup: Vec<_> = program.configure_calls().collect();
        assert_eq!(setup.len(), 1);
        assert_eq!(setup[0].name, "configurar_pin");
        assert_eq!(setup[0].location, SourceLocation::new(3, 17));
        assert_eq!(setup[0].arguments.len(), 2);
        assert_eq!(setup[0].arguments[1].text(), "SALIDA");
        assert_eq!(setup[0].arguments[1].data_type(), DataType::Text);

        let names: Vec<_> = program.main_loop_calls().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["escribir", "esperar"]);
    }

    #[test]
    fn test_call_with_variable_argument() {
        let (program, diagnostics) = parse_source(
            "programa P entero led = 13; bucle_principal escribir(led, \"BAJO\"); fin_bucle fin_programa",
        );

        assert!(diagnostics.is_empty(), "{:?}", diagnostics);
        let call = program.main_loop_calls().next().unwrap();
        match &call.arguments[0] {
            Expr::Variable { name, data_type, .. } => {
                assert_eq!(name, "led");
                assert_eq!(*data_type, DataType::Integer);
            }
            other => panic!("Expected variable argument, got {:?}", other),
        }
    }

    #[test]
    fn test_call_without_arguments() {
        let (program, diagnostics) =
            parse_source("programa P bucle_principal esperar(); fin_bucle fin_programa");

        assert!(diagnostics.is_empty());
        assert!(program.main_loop_calls().next().unwrap().arguments.is_empty());
    }

    #[test]
    fn test_wrong_call_in_configure_block() {
        let (program, diagnostics) = parse_source(
            "programa P configurar escribir(1, \"ALTO\"); configurar_pin(1, \"SALIDA\"); fin_configurar fin_programa",
        );

        assert_eq!(
            messages(&diagnostics),
            vec!["invalid statement in configure block, found 'escribir'"]
        );
        assert_eq!(program.configure_calls().count(), 1);
    }

    #[test]
    fn test_wrong_call_in_main_loop() {
        let (program, diagnostics) = parse_source(
            "programa P bucle_principal configurar_pin(1, \"SALIDA\"); esperar(5); fin_bucle fin_programa",
        );

        assert_eq!(
            messages(&diagnostics),
            vec!["invalid statement in main loop, found 'configurar_pin'"]
        );
        assert_eq!(program.main_loop_calls().count(), 1);
    }

    #[test]
    fn test_missing_open_paren() {
        let (program, diagnostics) =
            parse_source("programa P bucle_principal esperar 5; esperar(1); fin_bucle fin_programa");

        assert_eq!(messages(&diagnostics), vec!["expected '(' after function name"]);
        assert_eq!(program.main_loop_calls().count(), 1);
    }

    #[test]
    fn test_missing_comma() {
        let (program, diagnostics) =
            parse_source("programa P bucle_principal escribir(1 2); fin_bucle fin_programa");

        assert_eq!(messages(&diagnostics), vec!["expected ',' or ')' in argument list"]);
        assert_eq!(program.main_loop_calls().count(), 0);
    }

    #[test]
    fn test_missing_close_paren_and_semicolon() {
        let (program, diagnostics) =
            parse_source("programa P\nbucle_principal\nesperar(1\nfin_bucle\nfin_programa");

        assert_eq!(
            messages(&diagnostics),
            vec!["expected ')' to close function call", "expected ';' after function call"]
        );
        assert_eq!(diagnostics.as_slice()[0].location, SourceLocation::new(4, 1));
        assert_eq!(program.main_loop_calls().count(), 1);
    }

    #[test]
    fn test_missing_semicolon_after_call() {
        let (program, diagnostics) =
            parse_source("programa P bucle_principal esperar(1) esperar(2); fin_bucle fin_programa");

        assert_eq!(messages(&diagnostics), vec!["expected ';' after function call"]);
        assert_eq!(program.main_loop_calls().count(), 2);
    }

    #[test]
    fn test_undeclared_argument() {
        let (program, diagnostics) =
            parse_source("programa P bucle_principal escribir(led, \"ALTO\"); fin_bucle fin_programa");

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics.as_slice()[0].kind, DiagnosticKind::Semantic);
        assert_eq!(diagnostics.as_slice()[0].message, "variable not declared: led");
        assert_eq!(
            program.main_loop_calls().next().unwrap().arguments[0].data_type(),
            DataType::Undefined
        );
    }

    #[test]
    fn test_unterminated_block() {
        let (program, diagnostics) =
            parse_source("programa P configurar configurar_pin(1, \"SALIDA\"); fin_programa");

        assert_eq!(
            messages(&diagnostics),
            vec!["unexpected token: expected 'fin_configurar', found 'fin_programa'"]
        );
        assert_eq!(program.configure_calls().count(), 1);
    }

    #[test]
    fn test_blocks_interleave() {
        let source = "programa P
            bucle_principal esperar(1); fin_bucle
            entero x = 1;
            configurar configurar_pin(x, \"ENTRADA\"); fin_configurar
            bucle_principal esperar(2); fin_bucle
        fin_programa";
        let (program, diagnostics) = parse_source(source);

        assert!(diagnostics.is_empty(), "{:?}", diagnostics);
        assert_eq!(program.items.len(), 4);
        let waits: Vec<_> = program
            .main_loop_calls()
            .map(|c| c.arguments[0].text().to_string())
            .collect();
        assert_eq!(waits, vec!["1", "2"]);
    }

    #[test]
    fn test_truncated_input_terminates() {
        for source in [
            "programa",
            "programa P configurar",
            "programa P bucle_principal escribir(",
            "programa P bucle_principal escribir(1,",
            "programa P entero",
            "programa P incluir <",
            ") } ; ;",
        ] {
            let (_, diagnostics) = parse_source(source);
            assert!(!diagnostics.is_empty(), "no errors for {:?}", source);
        }
    }
}
