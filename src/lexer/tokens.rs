use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::{Position, Span};

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("and", TokenKind::And);
        map.insert("or", TokenKind::Or);
        map.insert("not", TokenKind::Not);
        map.insert("neg", TokenKind::Neg);
        map.insert("bool", TokenKind::BoolType);
        map.insert("char", TokenKind::CharType);
        map.insert("double", TokenKind::DoubleType);
        map.insert("int", TokenKind::IntType);
        map.insert("string", TokenKind::StringType);
        map.insert("true", TokenKind::Bool);
        map.insert("false", TokenKind::Bool);
        map.insert("nil", TokenKind::Nil);
        map.insert("var", TokenKind::Var);
        map.insert("type", TokenKind::Type);
        map.insert("fun", TokenKind::Fun);
        map.insert("new", TokenKind::New);
        map.insert("return", TokenKind::Return);
        map.insert("if", TokenKind::If);
        map.insert("then", TokenKind::Then);
        map.insert("elseif", TokenKind::ElseIf);
        map.insert("else", TokenKind::Else);
        map.insert("while", TokenKind::While);
        map.insert("for", TokenKind::For);
        map.insert("to", TokenKind::To);
        map.insert("do", TokenKind::Do);
        map.insert("end", TokenKind::End);
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,
    Identifier,

    // Literals
    Int,
    Double,
    Bool,
    Char,
    String,

    OpenParen,
    CloseParen,

    Assignment,    // =
    Equals,        // ==
    NotEquals,     // !=
    Less,          // <
    LessEquals,    // <=
    Greater,       // >
    GreaterEquals, // >=

    Dot,
    Colon,
    Comma,

    Plus,
    Dash,
    Slash,
    Star,
    Percent,

    // Reserved
    And,
    Or,
    Not,
    Neg,
    IntType,
    DoubleType,
    BoolType,
    CharType,
    StringType,
    Nil,
    Var,
    Type,
    Fun,
    New,
    Return,
    If,
    Then,
    ElseIf,
    Else,
    While,
    For,
    To,
    Do,
    End,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub span: Span,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{} {} '{}'",
            self.line(),
            self.column(),
            self.kind,
            self.value
        )
    }
}

impl Token {
    pub fn line(&self) -> u32 {
        self.span.start.line
    }

    pub fn column(&self) -> u32 {
        self.span.start.column
    }

    pub fn position(&self) -> Position {
        self.span.start.clone()
    }

    pub fn is_one_of_many(&self, kinds: &[TokenKind]) -> bool {
        kinds.contains(&self.kind)
    }

    /// Data type keywords and identifiers naming a record type.
    pub fn is_data_type(&self) -> bool {
        self.is_one_of_many(&[
            TokenKind::IntType,
            TokenKind::DoubleType,
            TokenKind::BoolType,
            TokenKind::CharType,
            TokenKind::StringType,
            TokenKind::Identifier,
        ])
    }

    pub fn debug(&self) {
        if self.is_one_of_many(&[
            TokenKind::Identifier,
            TokenKind::Int,
            TokenKind::Double,
            TokenKind::Bool,
            TokenKind::Char,
            TokenKind::String,
        ]) {
            println!("{}:{} {} ({})", self.line(), self.column(), self.kind, self.value);
        } else {
            println!("{}:{} {} ()", self.line(), self.column(), self.kind);
        }
    }
}
