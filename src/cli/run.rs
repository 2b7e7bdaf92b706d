//! Execute the LS scripts embedded in a markup document.

use std::path::PathBuf;

use super::CliError;
use crate::{
    Document, Registry,
    driver::{FsLoader, run_document},
    host::ConsoleHost,
};

/// Options for the run command
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Markup of the host document
    pub markup: String,
    /// Base directory for resolving `src` attributes
    pub base: PathBuf,
    /// Optional registry manifest (JSON text)
    pub manifest: Option<String>,
    /// Return the final document markup after all scripts ran
    pub print_document: bool,
}

/// Parse the document, run every embedded script unit, and optionally
/// return the mutated document's markup.
///
/// Script failures are reported on the output channel and never abort the
/// run; only a bad registry manifest fails up front.
pub fn execute_run(options: &RunOptions) -> Result<Option<String>, CliError> {
    let registry = match &options.manifest {
        Some(manifest) => Registry::from_manifest(manifest)?,
        None => Registry::new(),
    };

    let document = Document::parse(&options.markup);
    let loader = FsLoader::new(&options.base);
    run_document(&document, &ConsoleHost, &registry, &loader);

    Ok(options.print_document.then(|| document.markup()))
}
