#![allow(clippy::module_inception)]

use std::{rc::Rc, time::Instant};

use tracing::debug;

use crate::{
    ast::ast::Program,
    errors::errors::{Error, ErrorTip},
    parser::parser::parse,
    type_checker::type_checker::type_check,
};

pub mod ast;
pub mod errors;
pub mod interpreter;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod symbol_table;
pub mod type_checker;

extern crate regex;

/// A 1-based line and column inside a named source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub line: u32,
    pub column: u32,
    pub file: Rc<String>,
}

impl Position {
    pub fn new(line: u32, column: u32, file: Rc<String>) -> Self {
        Position { line, column, file }
    }

    pub fn null() -> Self {
        Position::new(0, 0, Rc::new(String::from("<null>")))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

/// Lexes, parses and type checks `source`, returning the annotated program.
///
/// The program is only handed back once every phase has succeeded, so the
/// interpreter never sees a tree that failed checking.
pub fn load_program(source: String, file: Option<String>) -> Result<Program, Error> {
    let parse_start = Instant::now();
    let mut program = parse(source, file)?;
    debug!("Parsed in {:?}", parse_start.elapsed());

    let type_check_start = Instant::now();
    type_check(&mut program)?;
    debug!("Type checked in {:?}", type_check_start.elapsed());

    Ok(program)
}

/// Returns the text of the 1-based `line` in `source`, without its newline.
pub fn get_line_at_position(source: &str, line: u32) -> Option<String> {
    if line == 0 {
        return None;
    }

    source
        .split('\n')
        .nth(line as usize - 1)
        .map(|text| text.trim_end_matches('\r').to_string())
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_get_line_at_position() {
        let source = "Hello, world!\nsecond\n\n    Testing { }\n";

        assert_eq!(super::get_line_at_position(source, 1).unwrap(), "Hello, world!");
        assert_eq!(super::get_line_at_position(source, 3).unwrap(), "");
        assert_eq!(super::get_line_at_position(source, 4).unwrap(), "    Testing { }");
        assert!(super::get_line_at_position(source, 0).is_none());
        assert!(super::get_line_at_position(source, 9).is_none());
    }

    #[test]
    fn test_remove_starting_whitespace() {
        let (text, removed) = super::remove_starting_whitespace("   var x = 1");
        assert_eq!(text, "var x = 1");
        assert_eq!(removed, 3);
    }
}

pub fn display_error(error: &Error, source: &str) {
    /*
        error: message
        -> final.mypl
           |
        20 | var a = #
           | --------^
    */

    if let ErrorTip::None = error.get_tip() {
        eprintln!("{} error: {}", error.get_phase(), error.get_error_name());
    } else {
        eprintln!(
            "{} error: {} ({})",
            error.get_phase(),
            error.get_error_name(),
            error.get_tip()
        );
    }

    let Some(position) = error.get_position() else {
        return;
    };

    eprintln!("-> {}:{}:{}", position.file, position.line, position.column);

    let Some(line_text) = get_line_at_position(source, position.line) else {
        return;
    };

    let line_string = position.line.to_string();
    let padding = line_string.len() + 2;

    eprintln!("{:>padding$}", "|");

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
    eprintln!("{} | {}", line_string, line_text_removed.trim_end());

    let arrows = (position.column as usize).saturating_sub(removed_whitespace).max(1);

    eprintln!("{:>padding$} {:->arrows$}", "|", "^");
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let mut start = 0;
    for c in string.chars() {
        if c == ' ' || c == '\t' {
            start += 1;
        } else {
            break;
        }
    }

    (String::from(&string[start..]), start)
}
