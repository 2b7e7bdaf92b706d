//! Script-unit discovery and execution.
//!
//! A document may embed any number of LS script units as
//! `<script type="ls">` elements, inline or via a `src` attribute routed
//! through a [`ScriptLoader`]. Units are independent: each one is lexed,
//! parsed, resolved, and executed against its own fresh environment, and a
//! failure in one is reported and discarded without stopping the others.
//! Processing is strictly sequential; the only shared mutable resource is
//! the live document tree, with last-writer-wins semantics.

use std::fs;
use std::io;
use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, error, warn};

use crate::{
    dom::Document,
    evaluator::{Evaluator, RuntimeError},
    host::Host,
    lexer::Lexer,
    parser::{ParseError, Parser},
    registry::Registry,
    resolve::resolve,
};

/// Fixed prefix for script-unit failure reports on the host output channel.
pub const ERROR_PREFIX: &str = "[LS ERROR]";

/// Any failure that aborts a single script unit.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScriptError {
    #[error("syntax error: {0}")]
    Syntax(#[from] ParseError),

    #[error("runtime error: {0}")]
    Runtime(#[from] RuntimeError),
}

/// Where a script unit's source text came from.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptOrigin {
    /// Inline text of the n-th `script[type="ls"]` element (document order).
    Inline(usize),
    /// Loaded through a [`ScriptLoader`] from a `src` attribute.
    External(String),
}

/// One discovered script unit: source text plus provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptUnit {
    pub origin: ScriptOrigin,
    pub source: String,
}

/// Resolves `src` attributes to source text.
///
/// The core does not care whether the text arrives from a file, a network
/// fetch, or anywhere else; the embedding context supplies the loader.
pub trait ScriptLoader {
    fn load(&self, src: &str) -> io::Result<String>;
}

/// File-system loader resolving `src` relative to a base directory.
#[derive(Debug, Clone)]
pub struct FsLoader {
    base: PathBuf,
}

impl FsLoader {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        FsLoader { base: base.into() }
    }
}

impl ScriptLoader for FsLoader {
    fn load(&self, src: &str) -> io::Result<String> {
        fs::read_to_string(self.base.join(src))
    }
}

/// Loader for contexts with no external script support: every `src` fails,
/// which skips that unit with a warning.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLoader;

impl ScriptLoader for NoLoader {
    fn load(&self, src: &str) -> io::Result<String> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            format!("external scripts are not supported here: {}", src),
        ))
    }
}

/// Collect the script units of a document, in document order.
///
/// A unit is a `script` element whose `type` attribute is `ls`. A loader
/// failure skips only the failing unit.
pub fn discover(document: &Document, loader: &dyn ScriptLoader) -> Vec<ScriptUnit> {
    let mut units = Vec::new();

    let scripts = document.by_tag("script");
    let ls_scripts = scripts
        .handles()
        .filter(|h| h.attr("type").as_deref() == Some("ls"));

    for (index, handle) in ls_scripts.enumerate() {
        match handle.attr("src") {
            Some(src) => match loader.load(&src) {
                Ok(source) => {
                    debug!(src = %src, bytes = source.len(), "loaded external script");
                    units.push(ScriptUnit {
                        origin: ScriptOrigin::External(src),
                        source,
                    });
                }
                Err(e) => {
                    warn!(src = %src, error = %e, "failed to load external script, skipping unit");
                }
            },
            None => units.push(ScriptUnit {
                origin: ScriptOrigin::Inline(index),
                source: handle.text(),
            }),
        }
    }

    units
}

/// Run one script unit: lex, parse, resolve queries, execute against a fresh
/// environment.
pub fn run_source(
    source: &str,
    document: &Document,
    host: &dyn Host,
    registry: &Registry,
) -> Result<(), ScriptError> {
    let mut parser = Parser::new(Lexer::new(source));
    let program = parser.parse()?;
    let program = resolve(program, document);
    Evaluator::new(host, document, registry).execute(&program)?;
    Ok(())
}

/// Discover and run every script unit of a document, sequentially.
///
/// Each unit's failure is reported on the host output channel with the
/// [`ERROR_PREFIX`] and never prevents later units from running. Side
/// effects applied before a failure stay applied.
pub fn run_document(
    document: &Document,
    host: &dyn Host,
    registry: &Registry,
    loader: &dyn ScriptLoader,
) {
    for unit in discover(document, loader) {
        debug!(origin = ?unit.origin, "running script unit");
        if let Err(e) = run_source(&unit.source, document, host, registry) {
            error!(origin = ?unit.origin, error = %e, "script unit failed");
            host.emit(&format!("{} {}", ERROR_PREFIX, e));
        }
    }
}
