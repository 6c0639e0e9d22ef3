//! Scoped symbol table used by both the type checker (type information) and
//! the interpreter (runtime values).

pub mod symbol_table;

#[cfg(test)]
mod tests;
