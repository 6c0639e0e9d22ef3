//! Unit tests for error handling.
//!
//! This module contains tests for error types, phases and error reporting.

use crate::errors::errors::{Error, ErrorImpl, ErrorPhase, ErrorTip};
use crate::Position;
use std::rc::Rc;

fn position(line: u32, column: u32) -> Position {
    Position::new(line, column, Rc::new("test.mypl".to_string()))
}

#[test]
fn test_error_creation() {
    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: "@".to_string(),
        },
        position(1, 10),
    );

    assert_eq!(error.get_error_name(), "UnrecognisedToken");
    assert_eq!(error.get_phase(), ErrorPhase::Lexical);
}

#[test]
fn test_error_position() {
    let error = Error::new(
        ErrorImpl::UnexpectedToken {
            token: "identifier".to_string(),
        },
        position(4, 42),
    );

    let pos = error.get_position().unwrap();
    assert_eq!(pos.line, 4);
    assert_eq!(pos.column, 42);
}

#[test]
fn test_error_without_position() {
    let error = Error::without_position(ErrorImpl::MissingMain);

    assert!(error.get_position().is_none());
    assert_eq!(error.get_phase(), ErrorPhase::Semantic);
    assert_eq!(error.to_string(), "Static error: undefined main function");
}

#[test]
fn test_error_display_with_position() {
    let error = Error::new(ErrorImpl::DivisionByZero, position(3, 7));

    assert_eq!(
        error.to_string(),
        "Runtime error at line 3, column 7: division by zero"
    );
}

#[test]
fn test_unexpected_token_detailed_error() {
    let error = Error::new(
        ErrorImpl::UnexpectedTokenDetailed {
            token: "x".to_string(),
            message: "expecting 'end'".to_string(),
        },
        position(2, 1),
    );

    assert_eq!(error.get_error_name(), "UnexpectedTokenDetailed");
    assert_eq!(error.get_phase(), ErrorPhase::Syntax);
    assert_eq!(error.get_tip().to_string(), "expecting 'end', found `x`");
}

#[test]
fn test_type_mismatch_error() {
    let error = Error::new(
        ErrorImpl::TypeMatchError {
            expected: "int".to_string(),
            received: "string".to_string(),
        },
        position(1, 1),
    );

    assert_eq!(error.get_error_name(), "TypeMatchError");
    assert_eq!(error.get_phase(), ErrorPhase::Semantic);
}

#[test]
fn test_variable_already_declared_error() {
    let error = Error::new(
        ErrorImpl::VariableAlreadyDeclared {
            variable: "x".to_string(),
        },
        position(1, 1),
    );

    assert_eq!(error.get_error_name(), "VariableAlreadyDeclared");
}

#[test]
fn test_error_tip_none() {
    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: "@".to_string(),
        },
        position(1, 1),
    );

    assert!(matches!(error.get_tip(), ErrorTip::None));
}

#[test]
fn test_error_tip_suggestion() {
    let error = Error::new(
        ErrorImpl::LeadingZero {
            token: "01".to_string(),
        },
        position(1, 1),
    );

    match error.get_tip() {
        ErrorTip::Suggestion(tip) => assert_eq!(tip, "Leading 0 not allowed in `01`"),
        _ => panic!("Expected suggestion tip"),
    }
}

#[test]
fn test_error_tip_display() {
    let tip = ErrorTip::Suggestion("Try this instead".to_string());
    assert_eq!(tip.to_string(), "Try this instead");

    let tip = ErrorTip::None;
    assert_eq!(tip.to_string(), "");
}

#[test]
fn test_argument_count_errors() {
    let too_many = Error::new(
        ErrorImpl::UnexpectedArguments {
            expected: 2,
            received: 3,
        },
        position(1, 1),
    );
    let too_few = Error::new(
        ErrorImpl::MissingArguments {
            expected: 3,
            received: 1,
        },
        position(1, 1),
    );

    assert_eq!(too_many.get_error_name(), "UnexpectedArguments");
    assert_eq!(too_few.get_error_name(), "MissingArguments");
    assert_ne!(too_many.get_internal_error(), too_few.get_internal_error());
}

#[test]
fn test_runtime_phase() {
    let error = Error::new(ErrorImpl::ObjectNotFound { oid: 9 }, position(1, 1));

    assert_eq!(error.get_phase(), ErrorPhase::Runtime);
    assert_eq!(error.get_phase().to_string(), "Runtime");
}
