//! Parser implementation for building the Abstract Syntax Tree.
//!
//! This module contains the main Parser struct and the program entry point.
//! The parser is recursive descent with a single token of lookahead, pulling
//! tokens lazily from the lexer so that the first error in source order is
//! the one reported, whether it is lexical or syntactic.
//!
//! Statements are dispatched through a lookup table keyed by the leading
//! token kind; see [`super::lookups`].

use std::{collections::HashMap, mem};

use crate::{
    ast::ast::{Decl, Program},
    errors::errors::{Error, ErrorImpl},
    lexer::{
        lexer::Lexer,
        tokens::{Token, TokenKind},
    },
    Position,
};

use super::{
    lookups::{create_token_lookups, StmtHandler, StmtLookup},
    stmt::{parse_fun_decl, parse_type_decl},
};

/// The main parser structure that maintains parsing state.
///
/// This struct owns the lexer and the current lookahead token, along with
/// the statement lookup table.
pub struct Parser {
    /// The token source
    lexer: Lexer,
    /// The single token of lookahead
    current: Token,
    /// Lookup table for statement parsing handlers
    stmt_lookup: StmtLookup,
}

impl Parser {
    /// Creates a new Parser instance, reading the first token.
    ///
    /// # Arguments
    ///
    /// * `lexer` - The lexer positioned at the start of the source
    ///
    /// # Returns
    ///
    /// The parser, or the lexical error raised by the first token.
    pub fn new(mut lexer: Lexer) -> Result<Self, Error> {
        let current = lexer.next_token()?;
        Ok(Parser {
            lexer,
            current,
            stmt_lookup: HashMap::new(),
        })
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> &Token {
        &self.current
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.current.kind
    }

    /// Advances to the next token and returns the previous token.
    pub fn advance(&mut self) -> Result<Token, Error> {
        let next = self.lexer.next_token()?;
        Ok(mem::replace(&mut self.current, next))
    }

    /// Expects a token of the specified kind, with optional custom error.
    ///
    /// # Arguments
    ///
    /// * `expected_kind` - The expected TokenKind
    /// * `error` - Optional custom error to return if expectation fails
    ///
    /// # Returns
    ///
    /// Returns Ok(Token) if the current token matches, otherwise returns an Error.
    pub fn expect_error(
        &mut self,
        expected_kind: TokenKind,
        error: Option<Error>,
    ) -> Result<Token, Error> {
        if self.current.kind != expected_kind {
            match error {
                Some(error) => Err(error),
                None => Err(Error::new(
                    ErrorImpl::UnexpectedToken {
                        token: self.current.value.clone(),
                    },
                    self.current.position(),
                )),
            }
        } else {
            self.advance()
        }
    }

    /// Expects a token of the specified kind, failing with `message`.
    ///
    /// # Arguments
    ///
    /// * `expected_kind` - The expected TokenKind
    /// * `message` - What the parser was looking for, e.g. `expecting 'end'`
    pub fn expect(&mut self, expected_kind: TokenKind, message: &str) -> Result<Token, Error> {
        let error = self.error(message);
        self.expect_error(expected_kind, Some(error))
    }

    /// Builds a syntax error pointing at the current token.
    pub fn error(&self, message: &str) -> Error {
        Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: self.current.value.clone(),
                message: String::from(message),
            },
            self.current.position(),
        )
    }

    /// Checks if there are more tokens to parse.
    pub fn has_tokens(&self) -> bool {
        self.current.kind != TokenKind::EOF
    }

    /// Returns a reference to the statement lookup table.
    pub fn get_stmt_lookup(&self) -> &StmtLookup {
        &self.stmt_lookup
    }

    /// Registers a statement handler for a token.
    ///
    /// # Arguments
    ///
    /// * `kind` - The token kind that starts the statement
    /// * `stmt_fn` - The handler function for this statement type
    pub fn stmt(&mut self, kind: TokenKind, stmt_fn: StmtHandler) {
        self.stmt_lookup.insert(kind, stmt_fn);
    }

    /// Returns the current position in the source file.
    pub fn get_position(&self) -> Position {
        self.current.position()
    }
}

/// Parses source text into a [`Program`].
///
/// This is the main entry point for parsing. It creates a lexer and parser,
/// initializes the lookup table and parses declarations until EOF.
///
/// # Arguments
///
/// * `source` - The program text
/// * `file` - Name of the source file, used in error positions
///
/// # Returns
///
/// The program, or the first lexical or syntax error.
pub fn parse(source: String, file: Option<String>) -> Result<Program, Error> {
    let mut parser = Parser::new(Lexer::new(source, file))?;
    create_token_lookups(&mut parser);

    let mut decls = vec![];

    while parser.has_tokens() {
        match parser.current_token_kind() {
            TokenKind::Type => decls.push(Decl::Type(parse_type_decl(&mut parser)?)),
            TokenKind::Fun => decls.push(Decl::Fun(parse_fun_decl(&mut parser)?)),
            _ => return Err(parser.error("expecting 'fun' or 'type'")),
        }
    }

    Ok(Program { decls })
}
