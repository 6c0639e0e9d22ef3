//! Type checking and semantic analysis module.
//!
//! A single forward pass over the program that:
//!
//! - Verifies operator, assignment, argument and return types
//! - Resolves variables, record fields and function signatures
//! - Rejects redeclarations within one scope
//! - Requires an `int main()` entry point
//! - Writes the resolved type onto every variable declaration
//!
//! Scopes are tracked with the shared [`crate::symbol_table`].

pub mod type_checker;
pub mod types;
