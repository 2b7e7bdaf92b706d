use std::collections::HashMap;

use thiserror::Error;

use crate::{
    ast::{Expr, Program, Statement},
    dom::{Document, MemberError, Selection},
    host::Host,
    registry::{NativeCtx, Registry, RegistryError},
    value::Value,
};

/// Failures raised while executing a program. Each aborts only the current
/// script unit; side effects applied before the failure point stay applied.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuntimeError {
    #[error("undefined variable '{0}'")]
    UndefinedVariable(String),

    #[error("undefined target '{0}'")]
    UndefinedTarget(String),

    #[error("cannot redefine constant '{0}'")]
    ConstantRedefinition(String),

    #[error("'{target}' is not an element selection")]
    NotASelection { target: String },

    #[error(transparent)]
    Member(#[from] MemberError),

    #[error(transparent)]
    Native(#[from] RegistryError),

    /// An unresolved query node reached the evaluator. Only possible when a
    /// caller skips the resolution pass.
    #[error("document query was not resolved before evaluation")]
    UnresolvedQuery,
}

/// Binding table for one script unit.
///
/// A single flat map: `si` and `repeter` bodies do not introduce scopes.
/// `def` refuses to bind a name that is already bound, by either `def` or
/// `var`, while `var` rebinds unconditionally, including over a prior `def`
/// (documented quirk of the language).
#[derive(Debug, Default)]
pub struct Environment {
    bindings: HashMap<String, Value>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    pub fn bind(&mut self, name: &str, value: Value, constant: bool) -> Result<(), RuntimeError> {
        if constant && self.bindings.contains_key(name) {
            return Err(RuntimeError::ConstantRedefinition(name.to_string()));
        }
        self.bindings.insert(name.to_string(), value);
        Ok(())
    }
}

/// Tree-walking evaluator for one script unit.
///
/// Owns a fresh [`Environment`] per instance; the host, document, and
/// registry are borrowed from the embedding context. Never a process-wide
/// singleton; each script unit gets its own evaluator.
pub struct Evaluator<'a> {
    env: Environment,
    host: &'a dyn Host,
    document: &'a Document,
    registry: &'a Registry,
}

impl<'a> Evaluator<'a> {
    pub fn new(host: &'a dyn Host, document: &'a Document, registry: &'a Registry) -> Self {
        Evaluator {
            env: Environment::new(),
            host,
            document,
            registry,
        }
    }

    /// Execute statements in order. The first failure aborts the unit;
    /// nothing is rolled back.
    pub fn execute(&mut self, program: &Program) -> Result<(), RuntimeError> {
        for statement in program {
            self.eval_statement(statement)?;
        }
        Ok(())
    }

    fn eval_statement(&mut self, statement: &Statement) -> Result<(), RuntimeError> {
        match statement {
            Statement::Assign {
                constant,
                name,
                value,
            } => {
                let value = self.eval_value(value)?;
                self.env.bind(name, value, *constant)
            }
            Statement::Print(value) => {
                let value = self.eval_value(value)?;
                self.host.emit(&value.to_string());
                Ok(())
            }
            Statement::Notify(value) => {
                let value = self.eval_value(value)?;
                self.host.notify(&value.as_text());
                Ok(())
            }
            Statement::If { condition, body } => {
                if self.eval_value(condition)?.is_truthy() {
                    for statement in body {
                        self.eval_statement(statement)?;
                    }
                }
                Ok(())
            }
            Statement::Repeat { count, body } => {
                // Count is captured once; body mutations cannot extend or
                // shorten the loop.
                let count = self.eval_value(count)?.as_count();
                for _ in 0..count {
                    for statement in body {
                        self.eval_statement(statement)?;
                    }
                }
                Ok(())
            }
            Statement::MemberAssign {
                target,
                member,
                value,
            } => {
                let text = self.eval_value(value)?.as_text();
                let selection = self.lookup_selection(target)?;
                selection.write_member(member, &text)?;
                Ok(())
            }
            Statement::MemberCall {
                target,
                member,
                args,
            } => {
                // Arguments evaluate left to right before the call, even
                // though the current member surface ignores them.
                for arg in args {
                    self.eval_value(arg)?;
                }
                let selection = self.lookup_selection(target)?;
                selection.call_member(member)?;
                Ok(())
            }
            Statement::NativeCall { name, args } => {
                let args: Vec<Value> = args
                    .iter()
                    .map(|arg| self.eval_value(arg))
                    .collect::<Result<_, _>>()?;
                let ctx = NativeCtx {
                    host: self.host,
                    document: self.document,
                };
                self.registry.invoke(name, &ctx, &args)?;
                Ok(())
            }
        }
    }

    /// Resolve a member-statement target to a selection. A bound name that
    /// is missing is an undefined-target error, distinct from an undefined
    /// variable in value position.
    fn lookup_selection(&self, target: &Expr) -> Result<Selection, RuntimeError> {
        let (value, label) = match target {
            Expr::Variable(name) => match self.env.get(name) {
                Some(value) => (value.clone(), name.as_str()),
                None => return Err(RuntimeError::UndefinedTarget(name.clone())),
            },
            other => (self.eval_value(other)?, "document query"),
        };
        match value {
            Value::Nodes(selection) => Ok(selection),
            _ => Err(RuntimeError::NotASelection {
                target: label.to_string(),
            }),
        }
    }

    fn eval_value(&self, expr: &Expr) -> Result<Value, RuntimeError> {
        match expr {
            Expr::Integer(n) => Ok(Value::Integer(*n)),
            Expr::String(s) => Ok(Value::String(s.clone())),
            Expr::Resolved(value) => Ok(value.clone()),
            Expr::Variable(name) => self
                .env
                .get(name)
                .cloned()
                .ok_or_else(|| RuntimeError::UndefinedVariable(name.clone())),
            Expr::Query { .. } => Err(RuntimeError::UnresolvedQuery),
        }
    }
}
