use crate::ast::Expr;

/// A complete LS program: top-level statements in execution order.
pub type Program = Vec<Statement>;

/// A single LS statement.
///
/// Statements are the only side-effecting constructs in the language; value
/// expressions never mutate anything.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// Binding assignment
    ///
    /// `def` carries constant intent: it fails at runtime when the name is
    /// already bound. `var` rebinds unconditionally, including over a prior
    /// `def` binding.
    ///
    /// # Examples
    /// ```text
    /// def titre = "Bonjour"
    /// var n = 3
    /// ```
    Assign {
        constant: bool,
        name: String,
        value: Expr,
    },

    /// Emit a value on the host output channel
    ///
    /// # Example
    /// ```text
    /// msg("bonjour")
    /// ```
    Print(Expr),

    /// Present a value on the host notification surface
    ///
    /// # Example
    /// ```text
    /// popup("attention")
    /// ```
    Notify(Expr),

    /// Conditional block
    ///
    /// The body executes once when the condition is truthy. No new binding
    /// scope is introduced; bindings created inside persist afterwards.
    ///
    /// # Example
    /// ```text
    /// si(n) { msg(n) }
    /// ```
    If { condition: Expr, body: Vec<Statement> },

    /// Counted loop
    ///
    /// The count is captured once before the first iteration; mutating a
    /// binding the count referenced does not change the iteration count.
    ///
    /// # Example
    /// ```text
    /// repeter 3 { msg("encore") }
    /// ```
    Repeat { count: Expr, body: Vec<Statement> },

    /// Member write on an element selection
    ///
    /// The target is either a bound name or an inline document query.
    ///
    /// # Examples
    /// ```text
    /// titre.texte = "Bonjour"
    /// doc.type("div").texte = "x"
    /// ```
    MemberAssign {
        target: Expr,
        member: String,
        value: Expr,
    },

    /// Member call on an element selection
    ///
    /// # Examples
    /// ```text
    /// titre.suppr()
    /// doc.id("note").suppr()
    /// ```
    MemberCall {
        target: Expr,
        member: String,
        args: Vec<Expr>,
    },

    /// Native callable invocation through the registry
    ///
    /// # Example
    /// ```text
    /// horodater("fin")
    /// ```
    NativeCall { name: String, args: Vec<Expr> },
}
