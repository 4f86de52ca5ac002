// sketchc: Spanish-keyword sketch language to Arduino C++ compiler

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;

use sketchc::errors::{read_source, OutputError};
use sketchc::report::json::{self, AST_FILE, ERRORS_FILE, SYMBOLS_FILE, TOKENS_FILE};
use sketchc::report::{diagnostics_table, symbol_table, token_table};
use sketchc::semantic::CodeGenerator;
use sketchc::{compile, Compilation};

#[derive(Parser, Debug)]
#[command(author, version, about = "Compile sketch programs to Arduino C++")]
struct Args {
    /// Source file to compile (asked for on stdin when omitted)
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// Where to write the generated sketch
    #[arg(short, long, value_name = "FILE", default_value = "salida.cpp")]
    output: PathBuf,

    /// Write tokens, symbols, AST and errors as JSON into this directory
    #[arg(long, value_name = "DIR")]
    json: Option<PathBuf>,

    /// Print the token table
    #[arg(long)]
    tokens: bool,

    /// Print the symbol table
    #[arg(long)]
    symbols: bool,

    /// Disable colored tables
    #[arg(long)]
    no_color: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Options for a single compiler run
#[derive(Debug, Clone)]
struct Config {
    input: Option<PathBuf>,
    output: PathBuf,
    json_dir: Option<PathBuf>,
    show_tokens: bool,
    show_symbols: bool,
    color: bool,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Config {
            input: args.input,
            output: args.output,
            json_dir: args.json,
            show_tokens: args.tokens,
            show_symbols: args.symbols,
            color: !args.no_color,
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    // Initialize logging with dynamic filter based on verbosity
    let filter = if args.verbose {
        EnvFilter::from_default_env().add_directive(LevelFilter::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(LevelFilter::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    run(Config::from(args))
}

fn run(config: Config) -> anyhow::Result<ExitCode> {
    let input = match config.input.clone() {
        Some(path) => path,
        None => prompt_for_input()?,
    };

    let source = read_source(&input)?;
    info!(path = %input.display(), bytes = source.len(), "compiling");

    let compilation = compile(&source);

    if config.show_tokens {
        print!("{}", token_table(&compilation.tokens).render(config.color));
    }

    if let Some(dir) = &config.json_dir {
        write_json_reports(dir, &compilation)
            .with_context(|| format!("writing JSON reports to {}", dir.display()))?;
    }

    if !compilation.is_success() {
        eprint!("{}", diagnostics_table(&compilation.diagnostics).render(config.color));
        eprintln!(
            "{} error(s) found, no code generated",
            compilation.diagnostics.len()
        );
        return Ok(ExitCode::FAILURE);
    }

    if config.show_symbols {
        print!("{}", symbol_table(&compilation.symbols).render(config.color));
    }

    CodeGenerator::new(&compilation.program, &compilation.symbols).save(&config.output)?;
    println!("Code generated: {}", config.output.display());
    Ok(ExitCode::SUCCESS)
}

/// Ask for the source path on stdin
fn prompt_for_input() -> anyhow::Result<PathBuf> {
    print!("Source file: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let path = line.trim();
    if path.is_empty() {
        anyhow::bail!("no input file given");
    }
    Ok(PathBuf::from(path))
}

/// Tokens are always written; errors only when there are some, symbols and
/// AST only after a clean run
fn write_json_reports(dir: &Path, compilation: &Compilation) -> Result<(), OutputError> {
    std::fs::create_dir_all(dir).map_err(|source| OutputError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;

    json::write_json(&dir.join(TOKENS_FILE), &json::token_report(&compilation.tokens))?;

    if compilation.is_success() {
        json::write_json(&dir.join(SYMBOLS_FILE), &json::symbol_report(&compilation.symbols))?;
        json::write_json(&dir.join(AST_FILE), &json::ast_report(&compilation.program))?;
    } else {
        json::write_json(
            &dir.join(ERRORS_FILE),
            &json::error_report(&compilation.diagnostics),
        )?;
    }
    Ok(())
}
