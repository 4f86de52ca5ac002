//! Infrastructure error types
//!
//! Problems in the compiled program are [`Diagnostic`](crate::diagnostics::Diagnostic)s.
//! The errors here cover the filesystem around a compilation: reading the
//! source file and writing generated code or report artifacts.

use std::path::PathBuf;
use thiserror::Error;

/// Failure to read a source file
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("could not open source file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure to persist compiler output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("could not create file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Read a whole source file
pub fn read_source(path: impl Into<PathBuf>) -> Result<String, SourceError> {
    let path = path.into();
    std::fs::read_to_string(&path).map_err(|source| SourceError::Read { path, source })
}

/// Write `contents` to `path`, replacing any existing file
pub fn write_output(path: impl Into<PathBuf>, contents: &str) -> Result<(), OutputError> {
    let path = path.into();
    std::fs::write(&path, contents).map_err(|source| OutputError::Write { path, source })
}
