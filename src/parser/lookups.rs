use std::collections::{HashMap, HashSet};

use lazy_static::lazy_static;

use crate::{ast::statements::Stmt, errors::errors::Error, lexer::tokens::TokenKind};

use super::{parser::Parser, stmt::*};

pub type StmtHandler = fn(&mut Parser) -> Result<Stmt, Error>;

lazy_static! {
    /// Tokens that continue an expression with a right-hand operand.
    pub static ref BINARY_OPERATORS: HashSet<TokenKind> = {
        let mut set = HashSet::new();
        set.insert(TokenKind::Plus);
        set.insert(TokenKind::Dash);
        set.insert(TokenKind::Star);
        set.insert(TokenKind::Slash);
        set.insert(TokenKind::Percent);
        set.insert(TokenKind::And);
        set.insert(TokenKind::Or);
        set.insert(TokenKind::Equals);
        set.insert(TokenKind::NotEquals);
        set.insert(TokenKind::Less);
        set.insert(TokenKind::LessEquals);
        set.insert(TokenKind::Greater);
        set.insert(TokenKind::GreaterEquals);
        set
    };
}

pub fn create_token_lookups(parser: &mut Parser) {
    parser.stmt(TokenKind::Var, parse_var_decl_stmt);
    parser.stmt(TokenKind::Identifier, parse_identifier_stmt);
    parser.stmt(TokenKind::If, parse_if_stmt);
    parser.stmt(TokenKind::While, parse_while_stmt);
    parser.stmt(TokenKind::For, parse_for_stmt);
    parser.stmt(TokenKind::Return, parse_return_stmt);
}

// Lookup tables inside parser struct, so it's easier
pub type StmtLookup = HashMap<TokenKind, StmtHandler>;
