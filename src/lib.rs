pub mod ast;
pub mod dom;
pub mod driver;
pub mod evaluator;
pub mod host;
pub mod lexer;
pub mod parser;
pub mod registry;
pub mod resolve;
pub mod value;

#[cfg(feature = "cli")]
pub mod cli;

pub use ast::{Expr, Program, QueryKind, Statement, Token};
pub use dom::{Document, ElementHandle, Selection};
pub use driver::{ScriptError, ScriptLoader, ScriptUnit, discover, run_document, run_source};
pub use evaluator::{Environment, Evaluator, RuntimeError};
pub use host::{ConsoleHost, Host, RecordingHost};
pub use lexer::Lexer;
pub use parser::{ParseError, Parser};
pub use registry::{Registry, RegistryError};
pub use value::Value;
