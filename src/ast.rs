//! # LS - Abstract Syntax Tree
//!
//! This module defines the token and node types for LS, a small imperative
//! scripting language embedded in markup documents and executed against the
//! live document tree.
//!
//! ## Architecture Overview
//!
//! The AST module is organized into focused submodules:
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[expressions]** - Value expressions (literals, variables, document queries)
//! - **[statements]** - Statements (bindings, output, control flow, member access)
//!
//! ## Quick Start
//!
//! ```text
//! def titre = doc.id("titre")
//! titre.texte = "Bonjour"
//! repeter 3 { msg("encore") }
//! ```
//!
//! ## Core Concepts
//!
//! ### Statements only
//!
//! A program is an ordered sequence of statements; order is execution order.
//! There are no user-defined functions and no operators; value expressions
//! only produce literals, variable reads, and document query results.
//!
//! ### Two-phase queries
//!
//! The parser produces a pure AST. `doc.id(...)` and `doc.type(...)` nodes
//! are executed by a dedicated resolution pass against a live document, which
//! captures each result once. A captured selection never refreshes, so
//! elements added to the document later are not seen by it.
//!
//! ### Flat environment
//!
//! Bindings live in a single flat environment per script unit. `si` and
//! `repeter` bodies do not introduce scopes; bindings created inside a block
//! persist after it.
pub mod tokens;
pub mod expressions;
pub mod statements;

pub use tokens::Token;
pub use expressions::{Expr, QueryKind};
pub use statements::{Program, Statement};
