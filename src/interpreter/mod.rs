//! Tree-walking interpreter.
//!
//! Runs a type checked program by walking its statements directly:
//!
//! - Values and variables are kept in the shared [`crate::symbol_table`]
//! - Record instances are stored on a [`heap::Heap`] and referenced by id
//! - Built-in functions read from and write to injectable streams
//!
//! The exit code of a program is the value returned by its `main`.

pub mod builtins;
pub mod heap;
pub mod interpreter;
pub mod value;

#[cfg(test)]
mod tests;
