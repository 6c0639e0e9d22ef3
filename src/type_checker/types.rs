use std::collections::HashMap;

pub const INT: &str = "int";
pub const DOUBLE: &str = "double";
pub const BOOL: &str = "bool";
pub const CHAR: &str = "char";
pub const STRING: &str = "string";
pub const NIL: &str = "nil";

/// Name bound to the enclosing function's return type inside its body.
/// `return` is a keyword, so no user binding can collide with it.
pub const RETURN_BINDING: &str = "return";

/// Type information the checker stores in the symbol table.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeInfo {
    /// A variable and the name of its type.
    Variable(String),
    /// A function: parameter types followed by the return type.
    Function(Vec<String>),
    /// A record type: field name to field type.
    Record(HashMap<String, String>),
}

pub fn is_primitive(type_name: &str) -> bool {
    matches!(type_name, INT | DOUBLE | BOOL | CHAR | STRING)
}

/// Whether `op` may combine operands of types `lhs` and `rhs`.
pub fn is_legal_op(op: &str, lhs: &str, rhs: &str) -> bool {
    let equality = matches!(op, "==" | "!=");
    let ordering = matches!(op, "<" | ">" | "<=" | ">=");
    let arithmetic = matches!(op, "+" | "-" | "*" | "/");

    if lhs == NIL || rhs == NIL {
        return equality;
    }

    match (lhs, rhs) {
        (BOOL, BOOL) => equality || matches!(op, "and" | "or"),
        (STRING | CHAR, STRING | CHAR) => op == "+" || ((equality || ordering) && lhs == rhs),
        (INT, INT) => arithmetic || equality || ordering || op == "%",
        (DOUBLE, DOUBLE) => arithmetic || equality || ordering,
        _ if is_primitive(lhs) || is_primitive(rhs) => false,
        _ => equality && lhs == rhs,
    }
}

/// Type of `lhs op rhs`, assuming the operation is legal.
pub fn result_type(op: &str, lhs: &str, rhs: &str) -> String {
    if matches!(op, "==" | "!=" | "<" | ">" | "<=" | ">=") {
        return BOOL.to_string();
    }

    match (lhs, rhs) {
        (STRING, CHAR) | (CHAR, CHAR) => STRING.to_string(),
        // Only reachable if mixed numeric operands are ever allowed.
        (DOUBLE, INT) => DOUBLE.to_string(),
        _ => rhs.to_string(),
    }
}
