use std::io::{BufRead, Write};

use lazy_static::lazy_static;
use regex::Regex;
use tracing::trace;

use crate::{
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::Token,
};

use super::value::{format_double, Value};

pub const BUILT_IN_FUNCTIONS: [&str; 8] = [
    "print", "stoi", "stod", "itos", "dtos", "get", "length", "read",
];

lazy_static! {
    static ref NEWLINE_ESCAPE: Regex = Regex::new(r"\\n").unwrap();
    static ref TAB_ESCAPE: Regex = Regex::new(r"\\t").unwrap();
}

pub fn is_built_in(name: &str) -> bool {
    BUILT_IN_FUNCTIONS.contains(&name)
}

/// String literals keep their escapes as written, `print` is where `\n` and
/// `\t` turn into real characters.
pub fn expand_escapes(text: &str) -> String {
    let text = NEWLINE_ESCAPE.replace_all(text, "\n");
    TAB_ESCAPE.replace_all(&text, "\t").into_owned()
}

/// Runs the built-in named by `function` on already evaluated arguments.
pub fn call_built_in<R: BufRead, W: Write>(
    function: &Token,
    args: &[Value],
    input: &mut R,
    output: &mut W,
) -> Result<Value, Error> {
    let position = function.position();
    trace!(function = %function.value, args = args.len(), "calling built-in");

    match (function.value.as_str(), args) {
        ("print", [value]) => {
            let text = match value {
                Value::Str(text) => expand_escapes(text),
                other => other.to_string(),
            };

            write!(output, "{}", text)
                .and_then(|_| output.flush())
                .map_err(|error| io_error(error, function))?;

            Ok(Value::Nil)
        }
        ("itos", [Value::Int(n)]) => Ok(Value::Str(n.to_string())),
        ("dtos", [Value::Double(d)]) => Ok(Value::Str(format_double(*d))),
        ("stoi", [Value::Str(text)]) => text
            .trim()
            .parse::<i32>()
            .map(Value::Int)
            .map_err(|_| conversion_error(text, "int", function)),
        ("stod", [Value::Str(text)]) => text
            .trim()
            .parse::<f64>()
            .map(Value::Double)
            .map_err(|_| conversion_error(text, "double", function)),
        ("length", [Value::Str(text)]) => Ok(Value::Int(text.chars().count() as i32)),
        ("get", [Value::Int(index), Value::Str(text)]) => {
            let out_of_range = || {
                Error::new(
                    ErrorImpl::IndexOutOfRange {
                        index: *index as i64,
                        length: text.chars().count(),
                    },
                    position.clone(),
                )
            };

            if *index < 0 {
                return Err(out_of_range());
            }

            text.chars()
                .nth(*index as usize)
                .map(Value::Char)
                .ok_or_else(out_of_range)
        }
        ("read", []) => {
            let mut line = String::new();
            input
                .read_line(&mut line)
                .map_err(|error| io_error(error, function))?;

            if line.ends_with('\n') {
                line.pop();
                if line.ends_with('\r') {
                    line.pop();
                }
            }

            Ok(Value::Str(line))
        }
        (name, args) => Err(Error::new(
            ErrorImpl::UnexpectedValue {
                expected: format!("valid arguments for `{}`", name),
                received: args
                    .iter()
                    .map(|arg| arg.type_name())
                    .collect::<Vec<_>>()
                    .join(", "),
            },
            position,
        )),
    }
}

fn conversion_error(value: &str, target: &str, function: &Token) -> Error {
    Error::new(
        ErrorImpl::InvalidConversion {
            value: value.to_string(),
            target: target.to_string(),
        },
        function.position(),
    )
}

fn io_error(error: std::io::Error, function: &Token) -> Error {
    Error::new(
        ErrorImpl::IoError {
            message: error.to_string(),
        },
        function.position(),
    )
}
