use crate::{
    ast::expressions::{CallExpr, Expr, IdRValue, NewRValue, RValue, SimpleRValue, Term},
    errors::errors::Error,
    lexer::tokens::{Token, TokenKind},
};

use super::{lookups::BINARY_OPERATORS, parser::Parser};

/// Parses an expression.
///
/// `not`/`neg` wrap the whole following expression, so `not a and b` negates
/// `a and b`. Binary operators chain to the right without precedence.
pub fn parse_expr(parser: &mut Parser) -> Result<Expr, Error> {
    if matches!(parser.current_token_kind(), TokenKind::Not | TokenKind::Neg) {
        parser.advance()?;
        let inner = parse_expr(parser)?;

        return Ok(Expr {
            negated: true,
            first: Term::Complex(Box::new(inner)),
            op: None,
            rest: None,
        });
    }

    let first = if parser.current_token_kind() == TokenKind::OpenParen {
        parser.advance()?;
        let inner = parse_expr(parser)?;
        parser.expect(TokenKind::CloseParen, "expecting ')'")?;
        Term::Complex(Box::new(inner))
    } else {
        Term::Simple(parse_rvalue(parser)?)
    };

    if BINARY_OPERATORS.contains(&parser.current_token_kind()) {
        let op = parser.advance()?;
        let rest = parse_expr(parser)?;

        return Ok(Expr {
            negated: false,
            first,
            op: Some(op),
            rest: Some(Box::new(rest)),
        });
    }

    Ok(Expr::simple(first))
}

pub fn parse_rvalue(parser: &mut Parser) -> Result<RValue, Error> {
    match parser.current_token_kind() {
        TokenKind::Int
        | TokenKind::Double
        | TokenKind::Bool
        | TokenKind::Char
        | TokenKind::String
        | TokenKind::Nil => Ok(RValue::Simple(SimpleRValue {
            value: parser.advance()?,
        })),
        TokenKind::New => {
            parser.advance()?;
            let type_id = parser.expect(TokenKind::Identifier, "expecting a type name after 'new'")?;
            Ok(RValue::New(NewRValue { type_id }))
        }
        TokenKind::Identifier => {
            let id = parser.advance()?;

            if parser.current_token_kind() == TokenKind::OpenParen {
                return Ok(RValue::Call(parse_call(parser, id)?));
            }

            let mut path = vec![id];
            while parser.current_token_kind() == TokenKind::Dot {
                parser.advance()?;
                path.push(parser.expect(TokenKind::Identifier, "expecting a field name after '.'")?);
            }

            Ok(RValue::Id(IdRValue { path }))
        }
        _ => Err(parser.error("expecting a value")),
    }
}

/// Parses `( args )` after an already consumed function name.
pub fn parse_call(parser: &mut Parser, function_id: Token) -> Result<CallExpr, Error> {
    parser.expect(TokenKind::OpenParen, "expecting '('")?;

    let mut args = vec![];
    if parser.current_token_kind() != TokenKind::CloseParen {
        loop {
            args.push(parse_expr(parser)?);

            if parser.current_token_kind() != TokenKind::Comma {
                break;
            }
            parser.advance()?;
        }
    }

    parser.expect(TokenKind::CloseParen, "expecting ')' after the arguments")?;

    Ok(CallExpr { function_id, args })
}
