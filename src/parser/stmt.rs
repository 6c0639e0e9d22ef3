use crate::{
    ast::statements::{
        AssignStmt, BasicIf, ForStmt, FunDecl, IfStmt, Param, ReturnStmt, Stmt, TypeDecl,
        VarDeclStmt, WhileStmt,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
};

use super::{
    expr::{parse_call, parse_expr},
    parser::Parser,
};

/// Parses statements until a token with no statement handler is reached.
pub fn parse_stmts(parser: &mut Parser) -> Result<Vec<Stmt>, Error> {
    let mut stmts = vec![];

    while let Some(handler) = parser.get_stmt_lookup().get(&parser.current_token_kind()).copied() {
        stmts.push(handler(parser)?);
    }

    Ok(stmts)
}

pub fn parse_data_type(parser: &mut Parser) -> Result<Token, Error> {
    if parser.current_token().is_data_type() {
        parser.advance()
    } else {
        Err(parser.error("expecting a data type"))
    }
}

pub fn parse_type_decl(parser: &mut Parser) -> Result<TypeDecl, Error> {
    parser.advance()?;
    let id = parser.expect(TokenKind::Identifier, "expecting a type name")?;

    let mut vdecls = vec![];
    while parser.current_token_kind() == TokenKind::Var {
        vdecls.push(parse_var_decl(parser)?);
    }

    parser.expect(TokenKind::End, "expecting 'end' at the end of the type declaration")?;

    Ok(TypeDecl { id, vdecls })
}

pub fn parse_fun_decl(parser: &mut Parser) -> Result<FunDecl, Error> {
    parser.advance()?;

    let return_type = if parser.current_token().is_data_type()
        || parser.current_token_kind() == TokenKind::Nil
    {
        parser.advance()?
    } else {
        return Err(parser.error("expecting a return type or 'nil'"));
    };

    let id = parser.expect(TokenKind::Identifier, "expecting a function name")?;
    parser.expect(TokenKind::OpenParen, "expecting '(' after the function name")?;

    let mut params = vec![];
    if parser.current_token_kind() == TokenKind::Identifier {
        loop {
            let param_id = parser.expect(TokenKind::Identifier, "expecting a parameter name")?;
            parser.expect(TokenKind::Colon, "expecting ':' after the parameter name")?;
            let data_type = parse_data_type(parser)?;
            params.push(Param { id: param_id, data_type });

            if parser.current_token_kind() != TokenKind::Comma {
                break;
            }
            parser.advance()?;
        }
    }

    parser.expect(TokenKind::CloseParen, "expecting ')' after the parameters")?;
    let stmts = parse_stmts(parser)?;
    parser.expect(TokenKind::End, "expecting 'end' at the end of the function")?;

    Ok(FunDecl { return_type, id, params, stmts })
}

pub fn parse_var_decl(parser: &mut Parser) -> Result<VarDeclStmt, Error> {
    parser.advance()?;
    let id = parser.expect(TokenKind::Identifier, "expecting a variable name")?;

    let data_type = if parser.current_token_kind() == TokenKind::Colon {
        parser.advance()?;
        Some(parse_data_type(parser)?)
    } else {
        None
    };

    let expr = if parser.current_token_kind() == TokenKind::Assignment {
        parser.advance()?;
        Some(parse_expr(parser)?)
    } else {
        None
    };

    if data_type.is_none() && expr.is_none() {
        return Err(Error::new(ErrorImpl::ExpectedExplicitValue, parser.get_position()));
    }

    Ok(VarDeclStmt { id, data_type, expr, resolved_type: None })
}

pub fn parse_var_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    Ok(Stmt::VarDecl(parse_var_decl(parser)?))
}

/// A statement starting with an identifier is either a call or an assignment.
pub fn parse_identifier_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let id = parser.advance()?;

    match parser.current_token_kind() {
        TokenKind::OpenParen => Ok(Stmt::Call(parse_call(parser, id)?)),
        TokenKind::Assignment | TokenKind::Dot => {
            let mut lvalue = vec![id];

            while parser.current_token_kind() == TokenKind::Dot {
                parser.advance()?;
                lvalue.push(parser.expect(TokenKind::Identifier, "expecting a field name after '.'")?);
            }

            parser.expect(TokenKind::Assignment, "expecting '='")?;
            let expr = parse_expr(parser)?;

            Ok(Stmt::Assign(AssignStmt { lvalue, expr }))
        }
        _ => Err(parser.error("expecting '(' or '=' or '.'")),
    }
}

fn parse_basic_if(parser: &mut Parser) -> Result<BasicIf, Error> {
    parser.advance()?;
    let condition = parse_expr(parser)?;
    parser.expect(TokenKind::Then, "expecting 'then'")?;
    let stmts = parse_stmts(parser)?;

    Ok(BasicIf { condition, stmts })
}

pub fn parse_if_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let if_part = parse_basic_if(parser)?;

    let mut else_ifs = vec![];
    while parser.current_token_kind() == TokenKind::ElseIf {
        else_ifs.push(parse_basic_if(parser)?);
    }

    let else_stmts = if parser.current_token_kind() == TokenKind::Else {
        parser.advance()?;
        Some(parse_stmts(parser)?)
    } else {
        None
    };

    parser.expect(TokenKind::End, "expecting 'end' at the end of the if statement")?;

    Ok(Stmt::If(IfStmt { if_part, else_ifs, else_stmts }))
}

pub fn parse_while_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    parser.advance()?;
    let condition = parse_expr(parser)?;
    parser.expect(TokenKind::Do, "expecting 'do'")?;
    let stmts = parse_stmts(parser)?;
    parser.expect(TokenKind::End, "expecting 'end' at the end of the while loop")?;

    Ok(Stmt::While(WhileStmt { condition, stmts }))
}

pub fn parse_for_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    parser.advance()?;
    let var_id = parser.expect(TokenKind::Identifier, "expecting a loop variable")?;
    parser.expect(TokenKind::Assignment, "expecting '=' after the loop variable")?;
    let start = parse_expr(parser)?;
    parser.expect(TokenKind::To, "expecting 'to'")?;
    let end = parse_expr(parser)?;
    parser.expect(TokenKind::Do, "expecting 'do'")?;
    let stmts = parse_stmts(parser)?;
    parser.expect(TokenKind::End, "expecting 'end' at the end of the for loop")?;

    Ok(Stmt::For(ForStmt { var_id, start, end, stmts }))
}

pub fn parse_return_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    parser.advance()?;
    let expr = parse_expr(parser)?;

    Ok(Stmt::Return(ReturnStmt { expr }))
}
