//! Host-query resolution pass.
//!
//! Parsing produces a pure AST; this pass executes every `doc.id(...)` /
//! `doc.type(...)` node against a live document and rewrites it into a
//! captured [`Expr::Resolved`] value. Each query runs exactly once, so a
//! captured selection never refreshes: elements added to the document after
//! resolution are not seen by it, preserving the language's capture-once
//! behavior.

use crate::{
    ast::{Expr, Program, QueryKind, Statement},
    dom::Document,
    value::Value,
};

/// Resolve every query node in the program against `document`.
pub fn resolve(program: Program, document: &Document) -> Program {
    program
        .into_iter()
        .map(|stmt| resolve_statement(stmt, document))
        .collect()
}

fn resolve_statement(stmt: Statement, document: &Document) -> Statement {
    match stmt {
        Statement::Assign {
            constant,
            name,
            value,
        } => Statement::Assign {
            constant,
            name,
            value: resolve_expr(value, document),
        },
        Statement::Print(value) => Statement::Print(resolve_expr(value, document)),
        Statement::Notify(value) => Statement::Notify(resolve_expr(value, document)),
        Statement::If { condition, body } => Statement::If {
            condition: resolve_expr(condition, document),
            body: resolve(body, document),
        },
        Statement::Repeat { count, body } => Statement::Repeat {
            count: resolve_expr(count, document),
            body: resolve(body, document),
        },
        Statement::MemberAssign {
            target,
            member,
            value,
        } => Statement::MemberAssign {
            target: resolve_expr(target, document),
            member,
            value: resolve_expr(value, document),
        },
        Statement::MemberCall {
            target,
            member,
            args,
        } => Statement::MemberCall {
            target: resolve_expr(target, document),
            member,
            args: resolve_exprs(args, document),
        },
        Statement::NativeCall { name, args } => Statement::NativeCall {
            name,
            args: resolve_exprs(args, document),
        },
    }
}

fn resolve_exprs(exprs: Vec<Expr>, document: &Document) -> Vec<Expr> {
    exprs
        .into_iter()
        .map(|e| resolve_expr(e, document))
        .collect()
}

fn resolve_expr(expr: Expr, document: &Document) -> Expr {
    match expr {
        Expr::Query { kind, key } => {
            let selection = match kind {
                QueryKind::ById => document.by_id(&key),
                QueryKind::ByTag => document.by_tag(&key),
            };
            Expr::Resolved(Value::Nodes(selection))
        }
        other => other,
    }
}
