//! CLI support for ls-lang
//!
//! Provides programmatic access to lsrun functionality for embedding in
//! other tools.

mod check;
mod run;

pub use check::{CheckOptions, CheckResult, execute_check};
pub use run::{RunOptions, execute_run};

use std::io;

use thiserror::Error;

/// Errors that can occur during CLI operations
#[derive(Error, Debug)]
pub enum CliError {
    /// Parser error from a syntax check
    #[error("syntax error: {0}")]
    Parse(#[from] crate::ParseError),

    /// Registry manifest error
    #[error("{0}")]
    Manifest(#[from] crate::registry::ManifestError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// No input provided
    #[error("no input provided; pass a file or pipe markup to stdin")]
    NoInput,
}
