use crate::lexer::tokens::Token;

use super::expressions::{CallExpr, Expr};

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub id: Token,
    pub data_type: Token,
}

/// Function Declaration
/// `return_type` is a data type token or the `nil` keyword.
#[derive(Debug, Clone, PartialEq)]
pub struct FunDecl {
    pub return_type: Token,
    pub id: Token,
    pub params: Vec<Param>,
    pub stmts: Vec<Stmt>,
}

/// Record Type Declaration
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDecl {
    pub id: Token,
    pub vdecls: Vec<VarDeclStmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    VarDecl(VarDeclStmt),
    Assign(AssignStmt),
    Call(CallExpr),
    If(IfStmt),
    While(WhileStmt),
    For(ForStmt),
    Return(ReturnStmt),
}

impl Stmt {
    /// The token that starts the statement, used for error positions.
    pub fn first_token(&self) -> &Token {
        match self {
            Stmt::VarDecl(var_decl) => &var_decl.id,
            Stmt::Assign(assign) => &assign.lvalue[0],
            Stmt::Call(call) => &call.function_id,
            Stmt::If(if_stmt) => if_stmt.if_part.condition.first_token(),
            Stmt::While(while_stmt) => while_stmt.condition.first_token(),
            Stmt::For(for_stmt) => &for_stmt.var_id,
            Stmt::Return(return_stmt) => return_stmt.expr.first_token(),
        }
    }
}

/// Variable Declaration Statement
///
/// At least one of `data_type` and `expr` is present. `resolved_type` is
/// filled in by the type checker with the declared or inferred type.
#[derive(Debug, Clone, PartialEq)]
pub struct VarDeclStmt {
    pub id: Token,
    pub data_type: Option<Token>,
    pub expr: Option<Expr>,
    pub resolved_type: Option<String>,
}

/// Assignment Statement
/// `lvalue` holds the dotted path, head first, and is never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignStmt {
    pub lvalue: Vec<Token>,
    pub expr: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BasicIf {
    pub condition: Expr,
    pub stmts: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub if_part: BasicIf,
    pub else_ifs: Vec<BasicIf>,
    pub else_stmts: Option<Vec<Stmt>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub condition: Expr,
    pub stmts: Vec<Stmt>,
}

/// `for var_id = start to end do stmts end`, bounds inclusive.
#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    pub var_id: Token,
    pub start: Expr,
    pub end: Expr,
    pub stmts: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    pub expr: Expr,
}
