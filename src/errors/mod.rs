//! Error types and error handling for the pipeline.
//!
//! Every phase (lexing, parsing, static checking, execution) reports
//! failures through the same [`errors::Error`] type. It carries:
//!
//! - A specific error variant describing what went wrong
//! - The source position, when one exists
//! - The phase the error belongs to, used by the CLI report
//! - A short suggestion for the user

pub mod errors;

#[cfg(test)]
mod tests;
