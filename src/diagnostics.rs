//! Compiler diagnostics
//!
//! Every stage of the pipeline reports malformed input by appending a
//! [`Diagnostic`] to a caller-owned [`Diagnostics`] sink and then carries on.
//! Nothing in the lexer or parser aborts on bad input; the caller decides what
//! to do with the accumulated list (normally: skip code generation if it is
//! non-empty).
//!
//! The sink is append-only. Stages never read or remove entries recorded by
//! another stage.

use crate::parser::ast::SourceLocation;
use std::fmt;

/// Which stage produced a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    Lexical,
    Syntactic,
    Semantic,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::Lexical => write!(f, "Lexical"),
            DiagnosticKind::Syntactic => write!(f, "Syntactic"),
            DiagnosticKind::Semantic => write!(f, "Semantic"),
        }
    }
}

/// A single error found in the source program
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub message: String,
    pub location: SourceLocation,
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    pub fn line(&self) -> usize {
        self.location.line
    }

    pub fn column(&self) -> usize {
        self.location.column
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} error at line {}, column {}: {}",
            self.kind, self.location.line, self.location.column, self.message
        )
    }
}

/// Ordered, append-only list of diagnostics shared by all stages
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(
        &mut self,
        kind: DiagnosticKind,
        message: impl Into<String>,
        location: SourceLocation,
    ) {
        let diagnostic = Diagnostic {
            message: message.into(),
            location,
            kind,
        };
        tracing::trace!(%diagnostic, "recorded diagnostic");
        self.entries.push(diagnostic);
    }

    pub fn lexical(&mut self, message: impl Into<String>, location: SourceLocation) {
        self.push(DiagnosticKind::Lexical, message, location);
    }

    pub fn syntactic(&mut self, message: impl Into<String>, location: SourceLocation) {
        self.push(DiagnosticKind::Syntactic, message, location);
    }

    pub fn semantic(&mut self, message: impl Into<String>, location: SourceLocation) {
        self.push(DiagnosticKind::Semantic, message, location);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[Diagnostic] {
        &self.entries
    }

    /// Number of diagnostics of the given kind
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.entries.iter().filter(|d| d.kind == kind).count()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
