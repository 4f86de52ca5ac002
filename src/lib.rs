//! # Introduction
//!
//! sketchc compiles a small Spanish-keyword teaching language into Arduino
//! C++ sketches. A program declares globals, a `configurar` block that runs
//! once and a `bucle_principal` block that runs forever:
//!
//! ```text
//! programa Parpadeo
//!     entero led = 13;
//!     configurar
//!         configurar_pin(led, "SALIDA");
//!     fin_configurar
//!     bucle_principal
//!         escribir(led, "ALTO");
//!         esperar(1000);
//!     fin_bucle
//! fin_programa
//! ```
//!
//! ## Compilation pipeline
//!
//! ```text
//! Source → Lexer → Tokens → Parser → AST + Symbols → Code generator → C++
//! ```
//!
//! 1. [`parser::lexer`] — tokenises the source.
//! 2. [`parser`] — builds the AST and fills the [`semantic::SymbolTable`],
//!    checking declarations and uses as it goes.
//! 3. [`semantic::codegen`] — regroups the program into `setup()` / `loop()`
//!    and translates types, calls and pin constants.
//! 4. [`report`] — terminal tables and JSON projections of each stage.
//!
//! Every stage records problems in a shared [`diagnostics::Diagnostics`] list
//! and keeps going. Code is only generated when that list stays empty.

pub mod diagnostics;
pub mod errors;
pub mod parser;
pub mod report;
pub mod semantic;

use diagnostics::Diagnostics;
use parser::ast::Program;
use parser::lexer::Token;
use semantic::SymbolTable;

/// Everything produced by one run of the pipeline
#[derive(Debug)]
pub struct Compilation {
    pub tokens: Vec<Token>,
    pub program: Program,
    pub symbols: SymbolTable,
    pub diagnostics: Diagnostics,
    /// Generated sketch, present only when no diagnostics were recorded
    pub output: Option<String>,
}

impl Compilation {
    pub fn is_success(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Run every stage over `source`
pub fn compile(source: &str) -> Compilation {
    let _span = tracing::info_span!("compile").entered();
    let mut diagnostics = Diagnostics::new();

    let tokens = parser::tokenize(source, &mut diagnostics);
    let (program, symbols) = parser::parse(tokens.clone(), &mut diagnostics);

    let output = if diagnostics.is_empty() {
        Some(semantic::generate(&program, &symbols))
    } else {
        tracing::debug!(errors = diagnostics.len(), "code generation skipped");
        None
    };

    Compilation {
        tokens,
        program,
        symbols,
        diagnostics,
        output,
    }
}
