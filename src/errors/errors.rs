use std::fmt::Display;

use thiserror::Error;

use crate::Position;

#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Option<Position>,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position: Some(position),
        }
    }

    /// Builds an error that is not tied to any token, such as a missing `main`.
    pub fn without_position(error_impl: ErrorImpl) -> Self {
        Error {
            internal_error: error_impl,
            position: None,
        }
    }

    pub fn get_position(&self) -> Option<&Position> {
        self.position.as_ref()
    }

    pub fn get_internal_error(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_phase(&self) -> ErrorPhase {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. }
            | ErrorImpl::MissingLeadingDigit
            | ErrorImpl::DoubleNegation
            | ErrorImpl::InvalidCharLiteral { .. }
            | ErrorImpl::MultilineString
            | ErrorImpl::UnterminatedString
            | ErrorImpl::LeadingZero { .. }
            | ErrorImpl::MissingFractionalDigit { .. }
            | ErrorImpl::InvalidIdentifier { .. }
            | ErrorImpl::MissingOpeningQuote { .. } => ErrorPhase::Lexical,

            ErrorImpl::UnexpectedToken { .. }
            | ErrorImpl::UnexpectedTokenDetailed { .. }
            | ErrorImpl::ExpectedExplicitValue => ErrorPhase::Syntax,

            ErrorImpl::VariableAlreadyDeclared { .. }
            | ErrorImpl::VariableNotDeclared { .. }
            | ErrorImpl::FunctionAlreadyDeclared { .. }
            | ErrorImpl::TypeAlreadyDeclared { .. }
            | ErrorImpl::UnknownType { .. }
            | ErrorImpl::UnknownField { .. }
            | ErrorImpl::UnexpectedArguments { .. }
            | ErrorImpl::MissingArguments { .. }
            | ErrorImpl::ArgumentTypeMatchError { .. }
            | ErrorImpl::TypeMatchError { .. }
            | ErrorImpl::IllegalOperator { .. }
            | ErrorImpl::IllegalNegation { .. }
            | ErrorImpl::UndefinedFunction { .. }
            | ErrorImpl::MissingMain
            | ErrorImpl::MalformedMain { .. } => ErrorPhase::Semantic,

            ErrorImpl::UndefinedName { .. }
            | ErrorImpl::ObjectNotFound { .. }
            | ErrorImpl::NilDereference { .. }
            | ErrorImpl::DivisionByZero
            | ErrorImpl::NumberParseError { .. }
            | ErrorImpl::InvalidConversion { .. }
            | ErrorImpl::IndexOutOfRange { .. }
            | ErrorImpl::InvalidOperands { .. }
            | ErrorImpl::UnexpectedValue { .. }
            | ErrorImpl::InvalidExitValue { .. }
            | ErrorImpl::IoError { .. } => ErrorPhase::Runtime,
        }
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::MissingLeadingDigit => "MissingLeadingDigit",
            ErrorImpl::DoubleNegation => "DoubleNegation",
            ErrorImpl::InvalidCharLiteral { .. } => "InvalidCharLiteral",
            ErrorImpl::MultilineString => "MultilineString",
            ErrorImpl::UnterminatedString => "UnterminatedString",
            ErrorImpl::LeadingZero { .. } => "LeadingZero",
            ErrorImpl::MissingFractionalDigit { .. } => "MissingFractionalDigit",
            ErrorImpl::InvalidIdentifier { .. } => "InvalidIdentifier",
            ErrorImpl::MissingOpeningQuote { .. } => "MissingOpeningQuote",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorImpl::ExpectedExplicitValue => "ExpectedExplicitValue",
            ErrorImpl::VariableAlreadyDeclared { .. } => "VariableAlreadyDeclared",
            ErrorImpl::VariableNotDeclared { .. } => "VariableNotDeclared",
            ErrorImpl::FunctionAlreadyDeclared { .. } => "FunctionAlreadyDeclared",
            ErrorImpl::TypeAlreadyDeclared { .. } => "TypeAlreadyDeclared",
            ErrorImpl::UnknownType { .. } => "UnknownType",
            ErrorImpl::UnknownField { .. } => "UnknownField",
            ErrorImpl::UnexpectedArguments { .. } => "UnexpectedArguments",
            ErrorImpl::MissingArguments { .. } => "MissingArguments",
            ErrorImpl::ArgumentTypeMatchError { .. } => "ArgumentTypeMatchError",
            ErrorImpl::TypeMatchError { .. } => "TypeMatchError",
            ErrorImpl::IllegalOperator { .. } => "IllegalOperator",
            ErrorImpl::IllegalNegation { .. } => "IllegalNegation",
            ErrorImpl::UndefinedFunction { .. } => "UndefinedFunction",
            ErrorImpl::MissingMain => "MissingMain",
            ErrorImpl::MalformedMain { .. } => "MalformedMain",
            ErrorImpl::UndefinedName { .. } => "UndefinedName",
            ErrorImpl::ObjectNotFound { .. } => "ObjectNotFound",
            ErrorImpl::NilDereference { .. } => "NilDereference",
            ErrorImpl::DivisionByZero => "DivisionByZero",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::InvalidConversion { .. } => "InvalidConversion",
            ErrorImpl::IndexOutOfRange { .. } => "IndexOutOfRange",
            ErrorImpl::InvalidOperands { .. } => "InvalidOperands",
            ErrorImpl::UnexpectedValue { .. } => "UnexpectedValue",
            ErrorImpl::InvalidExitValue { .. } => "InvalidExitValue",
            ErrorImpl::IoError { .. } => "IoError",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::MissingLeadingDigit => ErrorTip::Suggestion(String::from(
                "Doubles need a leading digit, write `0.5` instead of `.5`",
            )),
            ErrorImpl::DoubleNegation => {
                ErrorTip::Suggestion(String::from("Double negation is not allowed"))
            }
            ErrorImpl::InvalidCharLiteral { found } => ErrorTip::Suggestion(format!(
                "Invalid ending character `{}` for char, a char holds exactly one character",
                found
            )),
            ErrorImpl::MultilineString => {
                ErrorTip::Suggestion(String::from("Multiline strings are not allowed"))
            }
            ErrorImpl::UnterminatedString => {
                ErrorTip::Suggestion(String::from("Did you forget the closing `\"`?"))
            }
            ErrorImpl::LeadingZero { token } => ErrorTip::Suggestion(format!(
                "Leading 0 not allowed in `{}`",
                token
            )),
            ErrorImpl::MissingFractionalDigit { token } => ErrorTip::Suggestion(format!(
                "Needs at least one digit after '.' in `{}`",
                token
            )),
            ErrorImpl::InvalidIdentifier { token } => ErrorTip::Suggestion(format!(
                "Cannot start identifier `{}` with `_`",
                token
            )),
            ErrorImpl::MissingOpeningQuote { token } => ErrorTip::Suggestion(format!(
                "Possible missing starting quote before `{}`",
                token
            )),
            ErrorImpl::UnexpectedToken { token } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`", token))
            }
            ErrorImpl::UnexpectedTokenDetailed { token, message } => {
                ErrorTip::Suggestion(format!("{}, found `{}`", message, token))
            }
            ErrorImpl::ExpectedExplicitValue => ErrorTip::Suggestion(String::from(
                "Expected explicit value when no type is given",
            )),
            ErrorImpl::VariableAlreadyDeclared { variable } => {
                ErrorTip::Suggestion(format!("Variable `{}` already declared", variable))
            }
            ErrorImpl::VariableNotDeclared { variable } => {
                ErrorTip::Suggestion(format!("Variable `{}` not declared", variable))
            }
            ErrorImpl::FunctionAlreadyDeclared { function } => {
                ErrorTip::Suggestion(format!("Function `{}` already declared", function))
            }
            ErrorImpl::TypeAlreadyDeclared { name } => {
                ErrorTip::Suggestion(format!("Type `{}` already declared", name))
            }
            ErrorImpl::UnknownType { type_ } => {
                ErrorTip::Suggestion(format!("Unknown type `{}` found", type_))
            }
            ErrorImpl::UnknownField { field, record } => ErrorTip::Suggestion(format!(
                "`{}` is not a field of `{}`",
                field, record
            )),
            ErrorImpl::UnexpectedArguments { expected, received } => ErrorTip::Suggestion(
                format!("Too many arguments, expected {}, received {}", expected, received),
            ),
            ErrorImpl::MissingArguments { expected, received } => ErrorTip::Suggestion(format!(
                "Too few arguments, expected {}, received {}",
                expected, received
            )),
            ErrorImpl::ArgumentTypeMatchError { expected, received } => {
                ErrorTip::Suggestion(format!(
                    "Expected argument type `{}`, received `{}`",
                    expected, received
                ))
            }
            ErrorImpl::TypeMatchError { expected, received } => ErrorTip::Suggestion(format!(
                "Expected type `{}`, received `{}`",
                expected, received
            )),
            ErrorImpl::IllegalOperator { operator, lhs, rhs } => ErrorTip::Suggestion(format!(
                "Operator `{}` cannot be applied to `{}` and `{}`",
                operator, lhs, rhs
            )),
            ErrorImpl::IllegalNegation { received } => ErrorTip::Suggestion(format!(
                "Only bool, int and double values can be negated, received `{}`",
                received
            )),
            ErrorImpl::UndefinedFunction { function } => {
                ErrorTip::Suggestion(format!("Missing function definition for `{}`", function))
            }
            ErrorImpl::MissingMain => {
                ErrorTip::Suggestion(String::from("Declare `fun int main()` as the entry point"))
            }
            ErrorImpl::MalformedMain { reason } => {
                ErrorTip::Suggestion(format!("`main` {}", reason))
            }
            ErrorImpl::UndefinedName { name } => {
                ErrorTip::Suggestion(format!("`{}` has no value in this scope", name))
            }
            ErrorImpl::ObjectNotFound { oid } => {
                ErrorTip::Suggestion(format!("No object with id {} on the heap", oid))
            }
            ErrorImpl::NilDereference { field } => {
                ErrorTip::Suggestion(format!("Cannot access field `{}` of nil", field))
            }
            ErrorImpl::DivisionByZero => ErrorTip::Suggestion(String::from(
                "The right-hand side of `/` or `%` evaluated to 0",
            )),
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, is it above the integer limit?",
                token
            )),
            ErrorImpl::InvalidConversion { value, target } => ErrorTip::Suggestion(format!(
                "`{}` cannot be converted to {}",
                value, target
            )),
            ErrorImpl::IndexOutOfRange { index, length } => ErrorTip::Suggestion(format!(
                "Index {} is out of range for a string of length {}",
                index, length
            )),
            ErrorImpl::InvalidOperands { operator, lhs, rhs } => ErrorTip::Suggestion(format!(
                "Cannot evaluate `{}` on {} and {}",
                operator, lhs, rhs
            )),
            ErrorImpl::UnexpectedValue { expected, received } => ErrorTip::Suggestion(format!(
                "Expected {}, found a value of type {}",
                expected, received
            )),
            ErrorImpl::InvalidExitValue { received } => ErrorTip::Suggestion(format!(
                "`main` must return an int, returned {}",
                received
            )),
            ErrorImpl::IoError { message } => ErrorTip::Suggestion(message.clone()),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.position {
            Some(position) => write!(
                f,
                "{} error at line {}, column {}: {}",
                self.get_phase(),
                position.line,
                position.column,
                self.internal_error
            ),
            None => write!(f, "{} error: {}", self.get_phase(), self.internal_error),
        }
    }
}

impl std::error::Error for Error {}

/// The pipeline phase that raised an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPhase {
    Lexical,
    Syntax,
    Semantic,
    Runtime,
}

impl Display for ErrorPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorPhase::Lexical => write!(f, "Lexer"),
            ErrorPhase::Syntax => write!(f, "Parser"),
            ErrorPhase::Semantic => write!(f, "Static"),
            ErrorPhase::Runtime => write!(f, "Runtime"),
        }
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    // Lexical
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("missing leading digit in double value")]
    MissingLeadingDigit,
    #[error("double negation not allowed")]
    DoubleNegation,
    #[error("invalid ending character for char: {found:?}")]
    InvalidCharLiteral { found: String },
    #[error("multiline strings are not allowed")]
    MultilineString,
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("leading 0 not allowed: {token:?}")]
    LeadingZero { token: String },
    #[error("needs at least one digit after '.': {token:?}")]
    MissingFractionalDigit { token: String },
    #[error("cannot start identifier with '_': {token:?}")]
    InvalidIdentifier { token: String },
    #[error("possible missing starting quote after {token:?}")]
    MissingOpeningQuote { token: String },

    // Syntax
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("{message}, found {token:?}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("expected explicit value when no type is given")]
    ExpectedExplicitValue,

    // Semantic
    #[error("variable {variable:?} already declared")]
    VariableAlreadyDeclared { variable: String },
    #[error("variable {variable:?} not declared")]
    VariableNotDeclared { variable: String },
    #[error("function {function:?} already declared")]
    FunctionAlreadyDeclared { function: String },
    #[error("type {name:?} already declared")]
    TypeAlreadyDeclared { name: String },
    #[error("unknown type {type_} found")]
    UnknownType { type_: String },
    #[error("{field:?} is not a field of {record:?}")]
    UnknownField { field: String, record: String },
    #[error("too many arguments: expected {expected:?}, received {received:?}")]
    UnexpectedArguments { expected: usize, received: usize },
    #[error("too few arguments: expected {expected:?}, received {received:?}")]
    MissingArguments { expected: usize, received: usize },
    #[error("argument types do not match: expected {expected:?}, received {received:?}")]
    ArgumentTypeMatchError { expected: String, received: String },
    #[error("types do not match: expected {expected:?}, received {received:?}")]
    TypeMatchError { expected: String, received: String },
    #[error("operator {operator:?} is not defined for {lhs:?} and {rhs:?}")]
    IllegalOperator { operator: String, lhs: String, rhs: String },
    #[error("cannot negate a value of type {received:?}")]
    IllegalNegation { received: String },
    #[error("missing function definition for {function:?}")]
    UndefinedFunction { function: String },
    #[error("undefined main function")]
    MissingMain,
    #[error("main {reason}")]
    MalformedMain { reason: String },

    // Runtime
    #[error("{name:?} is not bound")]
    UndefinedName { name: String },
    #[error("object {oid} not found")]
    ObjectNotFound { oid: usize },
    #[error("nil dereference reading field {field:?}")]
    NilDereference { field: String },
    #[error("division by zero")]
    DivisionByZero,
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },
    #[error("cannot convert {value:?} to {target}")]
    InvalidConversion { value: String, target: String },
    #[error("index {index} out of range for length {length}")]
    IndexOutOfRange { index: i64, length: usize },
    #[error("invalid operands for {operator:?}: {lhs} and {rhs}")]
    InvalidOperands { operator: String, lhs: String, rhs: String },
    #[error("expected {expected}, found {received}")]
    UnexpectedValue { expected: String, received: String },
    #[error("main returned {received} instead of an int")]
    InvalidExitValue { received: String },
    #[error("io error: {message}")]
    IoError { message: String },
}
