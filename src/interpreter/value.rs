//! Runtime values for the interpreter

use std::fmt;

use super::heap::ObjectId;

/// Runtime value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Nil,
    Bool(bool),
    Int(i32),
    Double(f64),
    Char(char),
    Str(String),
    /// Reference to a record instance on the heap
    Object(ObjectId),
}

impl Value {
    /// Get type name for error messages
    pub fn type_name(&self) -> &str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Double(_) => "double",
            Value::Char(_) => "char",
            Value::Str(_) => "string",
            Value::Object(_) => "object",
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Double(d) => write!(f, "{}", format_double(*d)),
            Value::Char(c) => write!(f, "{c}"),
            Value::Str(s) => write!(f, "{s}"),
            Value::Object(oid) => write!(f, "<object {oid}>"),
        }
    }
}

/// Renders a double with six decimals, then drops trailing zeros while
/// keeping at least one digit after the point: `5.30` gives `5.3`, `5.0`
/// gives `5.0`.
pub fn format_double(value: f64) -> String {
    let mut text = format!("{:.6}", value);

    if text.contains('.') {
        while text.ends_with('0') && !text.ends_with(".0") {
            text.pop();
        }
    }

    text
}
