//! Terminal tables for tokens, symbols and diagnostics
//!
//! Tables are rendered to a `String` with ASCII borders. When color is on,
//! headers are tinted with the table's accent and borders are greyed out.

use super::theme::DEFAULT_THEME;
use crate::diagnostics::Diagnostics;
use crate::parser::lexer::Token;
use crate::semantic::symbols::SymbolTable;
use crossterm::style::{Color, Stylize};

/// A titled table of text cells
#[derive(Debug, Clone)]
pub struct Table {
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    accent: Color,
}

impl Table {
    pub fn new(title: &str, headers: &[&str], accent: Color) -> Self {
        Self {
            title: title.to_string(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
            accent,
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    fn column_widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }
        widths
    }

    /// Render the table, optionally with terminal colors
    pub fn render(&self, color: bool) -> String {
        let widths = self.column_widths();
        let paint = |text: String, tint: Color| -> String {
            if color {
                text.with(tint).to_string()
            } else {
                text
            }
        };

        let separator: String = widths
            .iter()
            .map(|w| format!("+{}", "-".repeat(w + 2)))
            .collect::<String>()
            + "+";
        let separator = paint(separator, DEFAULT_THEME.border);
        let bar = paint("|".to_string(), DEFAULT_THEME.border);

        let line = |cells: &[String], header: bool| -> String {
            let mut out = String::new();
            for (cell, width) in cells.iter().zip(&widths) {
                let padded = format!(" {:<width$} ", cell, width = width);
                out.push_str(&bar);
                if header && color {
                    out.push_str(&padded.with(self.accent).bold().to_string());
                } else {
                    out.push_str(&padded);
                }
            }
            out.push_str(&bar);
            out
        };

        let mut out = String::new();
        out.push_str(&paint(self.title.clone(), self.accent));
        out.push('\n');
        out.push_str(&separator);
        out.push('\n');
        out.push_str(&line(self.headers.as_slice(), true));
        out.push('\n');
        out.push_str(&separator);
        out.push('\n');
        for row in &self.rows {
            out.push_str(&line(row.as_slice(), false));
            out.push('\n');
        }
        out.push_str(&separator);
        out.push('\n');
        out
    }
}

pub fn token_table(tokens: &[Token]) -> Table {
    let mut table = Table::new(
        "Tokens",
        &["LEXEME", "KIND", "LINE", "COLUMN"],
        DEFAULT_THEME.primary,
    );
    for token in tokens {
        table.push_row(vec![
            token.lexeme.clone(),
            token.kind.name().to_string(),
            token.line().to_string(),
            token.column().to_string(),
        ]);
    }
    table
}

pub fn symbol_table(symbols: &SymbolTable) -> Table {
    let mut table = Table::new(
        "Symbols",
        &["NAME", "TYPE", "LINE", "VALUE"],
        DEFAULT_THEME.primary,
    );
    for symbol in symbols.sorted() {
        table.push_row(vec![
            symbol.name.clone(),
            symbol.declared_type.name().to_string(),
            symbol.declaration_line.to_string(),
            symbol.value.to_string(),
        ]);
    }
    table
}

pub fn diagnostics_table(diagnostics: &Diagnostics) -> Table {
    let mut table = Table::new(
        "Errors",
        &["KIND", "LINE", "COLUMN", "MESSAGE"],
        DEFAULT_THEME.error,
    );
    for diagnostic in diagnostics {
        table.push_row(vec![
            diagnostic.kind.to_string(),
            diagnostic.line().to_string(),
            diagnostic.column().to_string(),
            diagnostic.message.clone(),
        ]);
    }
    table
}
