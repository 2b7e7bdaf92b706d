//! Validate LS script syntax without executing anything.

use super::CliError;
use crate::{Lexer, Parser};

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// The LS source to validate
    pub source: String,
}

/// Result of a check operation
#[derive(Debug)]
pub enum CheckResult {
    /// Syntax validation passed
    SyntaxValid {
        /// Number of top-level statements parsed
        statements: usize,
    },
}

/// Lex and parse the source; report the statement count on success.
///
/// No document is involved, so query nodes are accepted but not resolved,
/// and nothing is executed.
pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    let mut parser = Parser::new(Lexer::new(&options.source));
    let program = parser.parse().map_err(CliError::Parse)?;
    Ok(CheckResult::SyntaxValid {
        statements: program.len(),
    })
}
