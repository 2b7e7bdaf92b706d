use std::fmt;

use crate::dom::Selection;

/// A runtime value in an LS environment.
///
/// LS values are integers, strings, or element selections produced by
/// document queries. Selections carry their own single/many/none shape; see
/// [`Selection`].
///
/// # Examples
///
/// ```
/// use ls_lang::Value;
///
/// let n = Value::Integer(3);
/// let s = Value::String("bonjour".to_string());
/// assert!(n.is_truthy());
/// assert!(!Value::Integer(0).is_truthy());
/// assert!(!Value::String(String::new()).is_truthy());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Integer number
    Integer(i64),

    /// UTF-8 string
    String(String),

    /// Element selection from a document query
    Nodes(Selection),
}

impl Value {
    /// Check if the value is truthy (for `si` conditions).
    ///
    /// Zero, the empty string, and empty selections are falsy; everything
    /// else is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Integer(n) => *n != 0,
            Value::String(s) => !s.is_empty(),
            Value::Nodes(sel) => !sel.is_empty(),
        }
    }

    /// Coerce to a `repeter` iteration count.
    ///
    /// Captured once at loop entry. Integers clamp below zero to zero,
    /// strings parse as an integer or count as zero, selections are zero.
    pub fn as_count(&self) -> i64 {
        match self {
            Value::Integer(n) => (*n).max(0),
            Value::String(s) => s.trim().parse::<i64>().unwrap_or(0).max(0),
            Value::Nodes(_) => 0,
        }
    }

    /// Text form used by member writes and `popup`.
    pub fn as_text(&self) -> String {
        match self {
            Value::Integer(n) => n.to_string(),
            Value::String(s) => s.clone(),
            Value::Nodes(sel) => sel.summary(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{}", s),
            Value::Nodes(sel) => write!(f, "{}", sel.summary()),
        }
    }
}
