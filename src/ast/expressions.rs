use crate::lexer::tokens::Token;

/// Expression
///
/// A chain `first op rest` that leans right: `a - b - c` is stored as
/// `a - (b - c)`. Negation is a flag applied to the value of the whole chain.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub negated: bool,
    pub first: Term,
    pub op: Option<Token>,
    pub rest: Option<Box<Expr>>,
}

impl Expr {
    pub fn simple(first: Term) -> Self {
        Expr {
            negated: false,
            first,
            op: None,
            rest: None,
        }
    }

    pub fn first_token(&self) -> &Token {
        self.first.first_token()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    Simple(RValue),
    Complex(Box<Expr>),
}

impl Term {
    pub fn first_token(&self) -> &Token {
        match self {
            Term::Simple(rvalue) => rvalue.first_token(),
            Term::Complex(expr) => expr.first_token(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RValue {
    Simple(SimpleRValue),
    New(NewRValue),
    Call(CallExpr),
    Id(IdRValue),
    Negated(NegatedRValue),
}

impl RValue {
    pub fn first_token(&self) -> &Token {
        match self {
            RValue::Simple(simple) => &simple.value,
            RValue::New(new) => &new.type_id,
            RValue::Call(call) => &call.function_id,
            RValue::Id(id) => &id.path[0],
            RValue::Negated(negated) => negated.expr.first_token(),
        }
    }
}

/// Literal or `nil`
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleRValue {
    pub value: Token,
}

/// `new T`
#[derive(Debug, Clone, PartialEq)]
pub struct NewRValue {
    pub type_id: Token,
}

/// Function call, usable both as a statement and as a value.
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub function_id: Token,
    pub args: Vec<Expr>,
}

/// Dotted identifier path such as `p.next.value`.
#[derive(Debug, Clone, PartialEq)]
pub struct IdRValue {
    pub path: Vec<Token>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NegatedRValue {
    pub expr: Box<Expr>,
}
