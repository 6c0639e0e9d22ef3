//! Parser module for building an Abstract Syntax Tree (AST).
//!
//! This module contains the parser that transforms source text into a
//! [`crate::ast::ast::Program`]. It handles:
//!
//! - Type and function declarations
//! - Statement parsing through a token-keyed lookup table
//! - Right-leaning expression chains with flag-based negation
//! - Reporting the first syntax error with its position

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
