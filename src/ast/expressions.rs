use crate::value::Value;

/// Which document query a [`Expr::Query`] node performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    /// `doc.id(...)`: lookup by element identifier, yields one handle or none
    ById,
    /// `doc.type(...)`: lookup by tag name, yields every matching element
    ByTag,
}

/// Abstract Syntax Tree node representing a parsed value expression.
///
/// LS value expressions are deliberately small: a literal, a variable
/// reference, or a document query. There are no operators.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Literal integer
    ///
    /// # Example
    /// ```text
    /// 42
    /// ```
    Integer(i64),

    /// String literal
    ///
    /// # Example
    /// ```text
    /// "bonjour"
    /// ```
    String(String),

    /// Variable reference
    ///
    /// An identifier that is neither a keyword nor the `doc` query prefix.
    /// Resolved against the environment at evaluation time.
    ///
    /// # Example
    /// ```text
    /// titre
    /// ```
    Variable(String),

    /// Unresolved document query
    ///
    /// Parsing produces a pure AST; queries are executed by the resolution
    /// pass ([`crate::resolve::resolve`]) against a live document, which
    /// rewrites this node into [`Expr::Resolved`]. The captured result is
    /// never refreshed afterwards.
    ///
    /// # Examples
    /// ```text
    /// doc.id("titre")
    /// doc.type("div")
    /// ```
    Query { kind: QueryKind, key: String },

    /// A document query result captured by the resolution pass.
    ///
    /// Behaves like a literal from the evaluator's point of view.
    Resolved(Value),
}
