//! Static registry of host-native callables.
//!
//! Some deployments side-load a mapping from script-visible names to
//! host-native behavior, invoked by bare `name(...)` statements. The registry
//! is a statically typed table: every entry is a pre-registered Rust callable
//! with a declared arity, registered programmatically or selected from a
//! fixed built-in catalog by a JSON manifest. No code string is ever
//! evaluated.

use std::collections::HashMap;
use std::rc::Rc;

use thiserror::Error;

use crate::dom::Document;
use crate::host::Host;
use crate::value::Value;

/// Context handed to native callables at invocation time.
pub struct NativeCtx<'a> {
    pub host: &'a dyn Host,
    pub document: &'a Document,
}

pub type NativeFn = Rc<dyn Fn(&NativeCtx<'_>, &[Value]) -> Result<(), String>>;

/// Invocation failures reported back to the evaluator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistryError {
    #[error("'{0}' is not a registered callable")]
    Unregistered(String),

    #[error("'{name}' expects {expected} argument(s), got {got}")]
    ArityMismatch {
        name: String,
        expected: usize,
        got: usize,
    },

    #[error("'{name}' failed: {message}")]
    Failed { name: String, message: String },
}

/// Manifest loading failures. These abort registry construction, never a
/// running script.
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("invalid manifest: {0}")]
    Json(#[from] serde_json::Error),

    #[error("manifest must be an object of name-to-builtin strings")]
    BadShape,

    #[error("manifest entry '{name}' refers to unknown builtin '{builtin}'")]
    UnknownBuiltin { name: String, builtin: String },
}

struct Entry {
    arity: usize,
    func: NativeFn,
}

/// Name-to-callable table consulted for bare `name(...)` statements.
#[derive(Default)]
pub struct Registry {
    entries: HashMap<String, Entry>,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("entries", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Registry {
    /// An empty registry: every native call fails as unregistered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callable under a script-visible name with a fixed arity.
    pub fn register<F>(&mut self, name: &str, arity: usize, func: F)
    where
        F: Fn(&NativeCtx<'_>, &[Value]) -> Result<(), String> + 'static,
    {
        self.entries.insert(
            name.to_string(),
            Entry {
                arity,
                func: Rc::new(func),
            },
        );
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Invoke a registered callable with already-evaluated arguments.
    pub fn invoke(
        &self,
        name: &str,
        ctx: &NativeCtx<'_>,
        args: &[Value],
    ) -> Result<(), RegistryError> {
        let entry = self
            .entries
            .get(name)
            .ok_or_else(|| RegistryError::Unregistered(name.to_string()))?;
        if args.len() != entry.arity {
            return Err(RegistryError::ArityMismatch {
                name: name.to_string(),
                expected: entry.arity,
                got: args.len(),
            });
        }
        (entry.func)(ctx, args).map_err(|message| RegistryError::Failed {
            name: name.to_string(),
            message,
        })
    }

    /// Build a registry from a JSON manifest mapping script-visible names to
    /// built-in catalog identifiers: `{"log": "journal", "clear": "vider"}`.
    pub fn from_manifest(manifest: &str) -> Result<Self, ManifestError> {
        let parsed: serde_json::Value = serde_json::from_str(manifest)?;
        let object = parsed.as_object().ok_or(ManifestError::BadShape)?;

        let mut registry = Registry::new();
        for (name, builtin) in object {
            let builtin = builtin.as_str().ok_or(ManifestError::BadShape)?;
            match builtin {
                "journal" => registry.register(name, 1, builtin_journal),
                "vider" => registry.register(name, 1, builtin_vider),
                _ => {
                    return Err(ManifestError::UnknownBuiltin {
                        name: name.clone(),
                        builtin: builtin.to_string(),
                    });
                }
            }
        }
        Ok(registry)
    }
}

/// Catalog builtin: emit the argument on the host output channel.
fn builtin_journal(ctx: &NativeCtx<'_>, args: &[Value]) -> Result<(), String> {
    ctx.host.emit(&args[0].to_string());
    Ok(())
}

/// Catalog builtin: clear the text of the element with the given id.
/// A missing element absorbs the write, like any other selection write.
fn builtin_vider(ctx: &NativeCtx<'_>, args: &[Value]) -> Result<(), String> {
    let id = args[0].as_text();
    ctx.document
        .by_id(&id)
        .write_member("texte", "")
        .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_rejects_unknown_builtin() {
        let err = Registry::from_manifest(r#"{"x": "nonexistent"}"#).unwrap_err();
        assert!(matches!(err, ManifestError::UnknownBuiltin { .. }));
    }

    #[test]
    fn manifest_maps_catalog_entries() {
        let registry = Registry::from_manifest(r#"{"log": "journal"}"#).unwrap();
        assert!(registry.contains("log"));
        assert!(!registry.contains("journal"));
    }
}
