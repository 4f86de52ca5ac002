//! Lexer (tokenizer) for sketch source code
//!
//! Converts raw source text into a flat [`Token`] stream consumed by the parser.
//! The lexer never stops on malformed input: every problem is recorded as a
//! lexical [`Diagnostic`](crate::diagnostics::Diagnostic) and scanning resumes
//! with the next character. The returned stream always ends with exactly one
//! [`TokenKind::Eof`].

use super::ast::SourceLocation;
use crate::diagnostics::Diagnostics;
use std::fmt;

/// Longest identifier the language accepts
pub const MAX_IDENTIFIER_LENGTH: usize = 32;

/// All token kinds produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Program structure
    Include,
    Program,
    EndProgram,
    Configure,
    EndConfigure,
    MainLoop,
    EndLoop,

    // Reserved for control flow, not used by the grammar yet
    If,
    Then,
    Else,
    EndIf,
    For,
    From,
    To,
    Do,
    EndFor,
    While,
    EndWhile,
    Repeat,
    Times,
    Function,
    EndFunction,
    Return,

    // Data types
    IntegerType,
    DecimalType,
    TextType,
    BooleanType,

    // Literals
    True,
    False,
    IntegerLiteral,
    DecimalLiteral,
    StringLiteral,

    // Identifiers
    Identifier,

    // Board calls
    PinMode,
    Write,
    Wait,

    // Punctuation
    LParen,
    RParen,
    LBrace,
    RBrace,
    Comma,
    Semicolon,

    // Operators
    Assign,  // =
    EqEq,    // ==
    NotEq,   // !=
    Gt,      // >
    Ge,      // >=
    Lt,      // <
    Le,      // <=
    Plus,    // +
    Minus,   // -
    Star,    // *
    Slash,   // /

    // End of file
    Eof,

    // Sentinel returned by the parser past the end of the stream
    Unknown,
}

/// Reserved words and the token kind each one maps to
const KEYWORDS: &[(&str, TokenKind)] = &[
    ("incluir", TokenKind::Include),
    ("programa", TokenKind::Program),
    ("fin_programa", TokenKind::EndProgram),
    ("configurar", TokenKind::Configure),
    ("fin_configurar", TokenKind::EndConfigure),
    ("bucle_principal", TokenKind::MainLoop),
    ("fin_bucle", TokenKind::EndLoop),
    ("si", TokenKind::If),
    ("entonces", TokenKind::Then),
    ("sino", TokenKind::Else),
    ("fin_si", TokenKind::EndIf),
    ("para", TokenKind::For),
    ("desde", TokenKind::From),
    ("hasta", TokenKind::To),
    ("hacer", TokenKind::Do),
    ("fin_para", TokenKind::EndFor),
    ("mientras", TokenKind::While),
    ("fin_mientras", TokenKind::EndWhile),
    ("repetir", TokenKind::Repeat),
    ("veces", TokenKind::Times),
    ("funcion", TokenKind::Function),
    ("fin_funcion", TokenKind::EndFunction),
    ("retornar", TokenKind::Return),
    ("entero", TokenKind::IntegerType),
    ("decimal", TokenKind::DecimalType),
    ("cadena", TokenKind::TextType),
    ("booleano", TokenKind::BooleanType),
    ("verdadero", TokenKind::True),
    ("falso", TokenKind::False),
    ("configurar_pin", TokenKind::PinMode),
    ("escribir", TokenKind::Write),
    ("esperar", TokenKind::Wait),
];

impl TokenKind {
    /// Look up a reserved word
    pub fn keyword(word: &str) -> Option<TokenKind> {
        KEYWORDS
            .iter()
            .find(|(text, _)| *text == word)
            .map(|(_, kind)| *kind)
    }

    /// Stable name of the kind, as shown in token tables and JSON output
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Include => "TOKEN_INCLUIR",
            TokenKind::Program => "TOKEN_PROGRAMA",
            TokenKind::EndProgram => "TOKEN_FIN_PROGRAMA",
            TokenKind::Configure => "TOKEN_CONFIGURAR",
            TokenKind::EndConfigure => "TOKEN_FIN_CONFIGURAR",
            TokenKind::MainLoop => "TOKEN_BUCLE_PRINCIPAL",
            TokenKind::EndLoop => "TOKEN_FIN_BUCLE",
            TokenKind::If => "TOKEN_SI",
            TokenKind::Then => "TOKEN_ENTONCES",
            TokenKind::Else => "TOKEN_SINO",
            TokenKind::EndIf => "TOKEN_FIN_SI",
            TokenKind::For => "TOKEN_PARA",
            TokenKind::From => "TOKEN_DESDE",
            TokenKind::To => "TOKEN_HASTA",
            TokenKind::Do => "TOKEN_HACER",
            TokenKind::EndFor => "TOKEN_FIN_PARA",
            TokenKind::While => "TOKEN_MIENTRAS",
            TokenKind::EndWhile => "TOKEN_FIN_MIENTRAS",
            TokenKind::Repeat => "TOKEN_REPETIR",
            TokenKind::Times => "TOKEN_VECES",
            TokenKind::Function => "TOKEN_FUNCION",
            TokenKind::EndFunction => "TOKEN_FIN_FUNCION",
            TokenKind::Return => "TOKEN_RETORNAR",
            TokenKind::IntegerType => "TOKEN_ENTERO",
            TokenKind::DecimalType => "TOKEN_FLOTANTE",
            TokenKind::TextType => "TOKEN_CADENA",
            TokenKind::BooleanType => "TOKEN_BOOLEANO",
            TokenKind::True => "TOKEN_VERDADERO",
            TokenKind::False => "TOKEN_FALSO",
            TokenKind::IntegerLiteral => "TOKEN_NUMERO_LIT",
            TokenKind::DecimalLiteral => "TOKEN_DECIMAL_LIT",
            TokenKind::StringLiteral => "TOKEN_CADENA_LIT",
            TokenKind::Identifier => "TOKEN_IDENTIFICADOR",
            TokenKind::PinMode => "TOKEN_CONFIGURAR_PIN",
            TokenKind::Write => "TOKEN_ESCRIBIR",
            TokenKind::Wait => "TOKEN_ESPERAR",
            TokenKind::LParen => "TOKEN_PARENTESIS_IZQ",
            TokenKind::RParen => "TOKEN_PARENTESIS_DER",
            TokenKind::LBrace => "TOKEN_LLAVE_IZQ",
            TokenKind::RBrace => "TOKEN_LLAVE_DER",
            TokenKind::Comma => "TOKEN_COMA",
            TokenKind::Semicolon => "TOKEN_PUNTO_COMA",
            TokenKind::Assign => "TOKEN_ASIGNACION",
            TokenKind::EqEq => "TOKEN_IGUALDAD",
            TokenKind::NotEq => "TOKEN_DESIGUALDAD",
            TokenKind::Gt => "TOKEN_MAYOR_QUE",
            TokenKind::Ge => "TOKEN_MAYOR_IGUAL",
            TokenKind::Lt => "TOKEN_MENOR_QUE",
            TokenKind::Le => "TOKEN_MENOR_IGUAL",
            TokenKind::Plus => "TOKEN_MAS",
            TokenKind::Minus => "TOKEN_MENOS",
            TokenKind::Star => "TOKEN_MULT",
            TokenKind::Slash => "TOKEN_DIV",
            TokenKind::Eof => "TOKEN_EOF",
            TokenKind::Unknown => "TOKEN_DESCONOCIDO",
        }
    }

    /// Type keywords that start a variable declaration
    pub fn is_data_type(&self) -> bool {
        matches!(
            self,
            TokenKind::IntegerType
                | TokenKind::DecimalType
                | TokenKind::TextType
                | TokenKind::BooleanType
        )
    }

    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            TokenKind::IntegerLiteral
                | TokenKind::DecimalLiteral
                | TokenKind::StringLiteral
                | TokenKind::True
                | TokenKind::False
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = KEYWORDS.iter().find(|(_, kind)| kind == self);
        if let Some((text, _)) = keyword {
            return write!(f, "'{}'", text);
        }
        match self {
            TokenKind::IntegerLiteral => write!(f, "integer literal"),
            TokenKind::DecimalLiteral => write!(f, "decimal literal"),
            TokenKind::StringLiteral => write!(f, "string literal"),
            TokenKind::Identifier => write!(f, "identifier"),
            TokenKind::LParen => write!(f, "'('"),
            TokenKind::RParen => write!(f, "')'"),
            TokenKind::LBrace => write!(f, "'{{'"),
            TokenKind::RBrace => write!(f, "'}}'"),
            TokenKind::Comma => write!(f, "','"),
            TokenKind::Semicolon => write!(f, "';'"),
            TokenKind::Assign => write!(f, "'='"),
            TokenKind::EqEq => write!(f, "'=='"),
            TokenKind::NotEq => write!(f, "'!='"),
            TokenKind::Gt => write!(f, "'>'"),
            TokenKind::Ge => write!(f, "'>='"),
            TokenKind::Lt => write!(f, "'<'"),
            TokenKind::Le => write!(f, "'<='"),
            TokenKind::Plus => write!(f, "'+'"),
            TokenKind::Minus => write!(f, "'-'"),
            TokenKind::Star => write!(f, "'*'"),
            TokenKind::Slash => write!(f, "'/'"),
            TokenKind::Eof => write!(f, "end of file"),
            _ => write!(f, "unknown token"),
        }
    }
}

/// A lexed token: kind, source text and position of its first character
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub location: SourceLocation,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            location,
        }
    }

    pub fn line(&self) -> usize {
        self.location.line
    }

    pub fn column(&self) -> usize {
        self.location.column
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Identifier => write!(f, "identifier '{}'", self.lexeme),
            TokenKind::IntegerLiteral | TokenKind::DecimalLiteral => {
                write!(f, "number {}", self.lexeme)
            }
            TokenKind::StringLiteral => write!(f, "string \"{}\"", self.lexeme),
            kind => write!(f, "{}", kind),
        }
    }
}

/// Lexer for sketch source code
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
    tokens: Vec<Token>,
    /// Text of the last identifier, number or string scanned was empty
    last_lexeme_empty: bool,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
            tokens: Vec::new(),
            last_lexeme_empty: true,
        }
    }

    /// Tokenize the entire input, recording lexical errors in `diagnostics`
    pub fn tokenize(mut self, diagnostics: &mut Diagnostics) -> Vec<Token> {
        while let Some(ch) = self.peek() {
            let loc = self.current_location();

            match ch {
                c if c.is_ascii_whitespace() => {
                    self.advance();
                }
                '/' if self.peek_ahead(1) == Some('/') => self.skip_line_comment(),
                '/' if self.peek_ahead(1) == Some('*') => self.skip_block_comment(diagnostics),
                '"' => self.string_literal(diagnostics),
                '0'..='9' => self.number_literal(diagnostics),
                'a'..='z' | 'A'..='Z' | '_' => self.identifier_or_keyword(diagnostics),
                _ => {
                    self.advance();
                    self.operator(ch, loc, diagnostics);
                }
            }
        }

        let eof = Token::new(TokenKind::Eof, "", self.current_location());
        self.tokens.push(eof);

        tracing::debug!(
            tokens = self.tokens.len(),
            lines = self.line,
            "lexical analysis finished"
        );
        self.tokens
    }

    fn emit(&mut self, kind: TokenKind, lexeme: impl Into<String>, location: SourceLocation) {
        let token = Token::new(kind, lexeme, location);
        tracing::trace!(kind = token.kind.name(), lexeme = %token.lexeme, %location, "token");
        self.tokens.push(token);
    }

    /// Operators and punctuation; `ch` has already been consumed
    fn operator(&mut self, ch: char, loc: SourceLocation, diagnostics: &mut Diagnostics) {
        match ch {
            '(' => self.emit(TokenKind::LParen, "(", loc),
            ')' => self.emit(TokenKind::RParen, ")", loc),
            '{' => self.emit(TokenKind::LBrace, "{", loc),
            '}' => self.emit(TokenKind::RBrace, "}", loc),
            ';' => self.emit(TokenKind::Semicolon, ";", loc),
            ',' => self.emit(TokenKind::Comma, ",", loc),
            '+' => self.emit(TokenKind::Plus, "+", loc),
            '-' => self.emit(TokenKind::Minus, "-", loc),
            '*' => self.emit(TokenKind::Star, "*", loc),
            '=' => {
                if self.match_char('=') {
                    self.emit(TokenKind::EqEq, "==", loc);
                } else {
                    self.emit(TokenKind::Assign, "=", loc);
                }
            }
            '!' => {
                if self.match_char('=') {
                    self.emit(TokenKind::NotEq, "!=", loc);
                } else {
                    diagnostics.lexical("invalid operator '!' (did you mean '!='?)", loc);
                }
            }
            '>' => {
                if self.match_char('=') {
                    self.emit(TokenKind::Ge, ">=", loc);
                } else {
                    self.emit(TokenKind::Gt, ">", loc);
                }
            }
            '<' => {
                if self.match_char('=') {
                    self.emit(TokenKind::Le, "<=", loc);
                } else {
                    self.emit(TokenKind::Lt, "<", loc);
                }
            }
            '/' => {
                let after_assign = self
                    .tokens
                    .last()
                    .is_some_and(|t| t.kind == TokenKind::Assign);
                if self.last_lexeme_empty && after_assign {
                    diagnostics.lexical("invalid '/' immediately after assignment", loc);
                } else {
                    self.emit(TokenKind::Slash, "/", loc);
                }
            }
            _ => diagnostics.lexical(format!("unrecognized character '{}'", ch), loc),
        }
    }

    /// Parse string literal; the lexeme excludes the quotes
    fn string_literal(&mut self, diagnostics: &mut Diagnostics) {
        let loc = self.current_location();
        self.advance(); // opening quote
        let mut string = String::new();

        while let Some(ch) = self.advance() {
            match ch {
                '"' => {
                    self.last_lexeme_empty = string.is_empty();
                    self.emit(TokenKind::StringLiteral, string, loc);
                    return;
                }
                '\n' => {
                    self.last_lexeme_empty = string.is_empty();
                    diagnostics.lexical("invalid newline inside string literal", loc);
                    return;
                }
                _ => string.push(ch),
            }
        }

        self.last_lexeme_empty = string.is_empty();
        diagnostics.lexical("unterminated string literal", loc);
    }

    /// Parse numeric literal: digits with at most one decimal point
    fn number_literal(&mut self, diagnostics: &mut Diagnostics) {
        let loc = self.current_location();
        let mut num_str = String::new();

        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                num_str.push(ch);
                self.advance();
            } else if ch == '.' {
                if num_str.contains('.') {
                    // the second point is left in the input
                    diagnostics.lexical(
                        "number with multiple decimal points",
                        self.current_location(),
                    );
                    break;
                }
                num_str.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        self.last_lexeme_empty = num_str.is_empty();
        let kind = if num_str.contains('.') {
            TokenKind::DecimalLiteral
        } else {
            TokenKind::IntegerLiteral
        };
        self.emit(kind, num_str, loc);
    }

    /// Parse identifier or keyword
    fn identifier_or_keyword(&mut self, diagnostics: &mut Diagnostics) {
        let loc = self.current_location();
        let mut ident = String::new();

        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                ident.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        self.last_lexeme_empty = ident.is_empty();
        if ident.chars().count() > MAX_IDENTIFIER_LENGTH {
            diagnostics.lexical(
                format!(
                    "identifier exceeds maximum length ({} characters)",
                    MAX_IDENTIFIER_LENGTH
                ),
                loc,
            );
            return;
        }

        let kind = TokenKind::keyword(&ident).unwrap_or(TokenKind::Identifier);
        self.emit(kind, ident, loc);
    }

    /// Skip single-line comment (// ...)
    fn skip_line_comment(&mut self) {
        while let Some(ch) = self.advance() {
            if ch == '\n' {
                break;
            }
        }
    }

    /// Skip multi-line comment (/* ... */)
    fn skip_block_comment(&mut self, diagnostics: &mut Diagnostics) {
        self.advance(); // skip '/'
        self.advance(); // skip '*'

        while !self.is_at_end() {
            if self.peek() == Some('*') && self.peek_ahead(1) == Some('/') {
                self.advance(); // skip '*'
                self.advance(); // skip '/'
                return;
            }
            self.advance();
        }

        diagnostics.lexical("unterminated comment", self.current_location());
    }

    /// Peek at current character without consuming
    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Peek ahead n characters
    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    /// Consume the next character only if it is `expected`
    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Advance to next character
    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    /// Check if at end of input
    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Get current source location
    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}

/// Tokenize `source`, recording lexical errors in `diagnostics`
pub fn tokenize(source: &str, diagnostics: &mut Diagnostics) -> Vec<Token> {
    Lexer::new(source).tokenize(diagnostics)
}
