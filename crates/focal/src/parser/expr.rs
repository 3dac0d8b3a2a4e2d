//! Filter-expression grammar, precedence climbing from `or` down to operands.

use focal_core::{Atom, Value};

use crate::error::Result;
use crate::expr::{CmpOp, Expr, FieldKey, Operand};

use super::Parser;
use super::lexer::TokenKind;

/// Parse a standalone filter expression.
pub fn parse_expression(source: &str) -> Result<Expr> {
    let mut p = Parser::new(source)?;
    let expr = expression(&mut p)?;
    p.expect_end()?;
    Ok(expr)
}

/// Entry point used by the path parser inside `[?...]`; stops at the first
/// token that cannot continue the expression.
pub(crate) fn expression(p: &mut Parser<'_>) -> Result<Expr> {
    or_expr(p)
}

fn or_expr(p: &mut Parser<'_>) -> Result<Expr> {
    let mut expr = and_expr(p)?;
    while p.eat(TokenKind::KwOr) {
        expr = Expr::Or(Box::new(expr), Box::new(and_expr(p)?));
    }
    Ok(expr)
}

fn and_expr(p: &mut Parser<'_>) -> Result<Expr> {
    let mut expr = not_expr(p)?;
    while p.eat(TokenKind::KwAnd) {
        expr = Expr::And(Box::new(expr), Box::new(not_expr(p)?));
    }
    Ok(expr)
}

fn not_expr(p: &mut Parser<'_>) -> Result<Expr> {
    if p.eat(TokenKind::KwNot) {
        Ok(Expr::Not(Box::new(not_expr(p)?)))
    } else {
        primary(p)
    }
}

fn primary(p: &mut Parser<'_>) -> Result<Expr> {
    if p.eat(TokenKind::LParen) {
        let expr = expression(p)?;
        p.expect(TokenKind::RParen, "')'")?;
        return Ok(expr);
    }
    comparison(p)
}

fn comparison(p: &mut Parser<'_>) -> Result<Expr> {
    let left = operand(p)?;
    let Some(op) = cmp_op(p.current()) else {
        return Ok(Expr::Get(left));
    };
    p.bump();
    let right = operand(p)?;
    Ok(Expr::Compare { op, left, right })
}

fn cmp_op(kind: TokenKind) -> Option<CmpOp> {
    match kind {
        TokenKind::EqEq => Some(CmpOp::Eq),
        TokenKind::BangEq => Some(CmpOp::Neq),
        TokenKind::TildeTilde => Some(CmpOp::StrEq),
        TokenKind::BangTilde => Some(CmpOp::StrNeq),
        TokenKind::LtEq => Some(CmpOp::Lte),
        TokenKind::GtEq => Some(CmpOp::Gte),
        TokenKind::Lt => Some(CmpOp::Lt),
        TokenKind::Gt => Some(CmpOp::Gt),
        _ => None,
    }
}

fn operand(p: &mut Parser<'_>) -> Result<Operand> {
    match p.current() {
        TokenKind::At => {
            p.bump();
            let chain = field_chain(p, Vec::new());
            let isos = iso_chain(p)?;
            if chain.is_empty() {
                Ok(Operand::Slf { isos })
            } else {
                Ok(Operand::Field { chain, isos })
            }
        }
        TokenKind::Ident => {
            if p.nth(1) == TokenKind::LParen {
                return function_call(p);
            }
            let first = FieldKey::Str(p.ident_value().to_owned());
            let chain = field_chain(p, vec![first]);
            let isos = iso_chain(p)?;
            Ok(Operand::Field { chain, isos })
        }
        TokenKind::Str => {
            let value = Value::Str(p.string_value());
            literal(p, value)
        }
        TokenKind::Int => {
            let value = Value::Int(p.int_value()?);
            literal(p, value)
        }
        TokenKind::Float => {
            let value = Value::Float(p.float_value()?);
            literal(p, value)
        }
        TokenKind::KwTrue => {
            p.bump();
            literal(p, Value::Bool(true))
        }
        TokenKind::KwFalse => {
            p.bump();
            literal(p, Value::Bool(false))
        }
        TokenKind::KwNil => {
            p.bump();
            literal(p, Value::Nil)
        }
        TokenKind::Colon => {
            p.bump();
            let name = p.expect(TokenKind::Ident, "atom name after ':'")?;
            let value = Value::Atom(Atom::new(p.text(&name)));
            literal(p, value)
        }
        other => Err(p.error(format!("expected operand, found {}", other.describe()))),
    }
}

/// Extend a field chain with `.name` (string key) and `:name` (atom key)
/// steps. `::` is a converter chain, not a chain step.
fn field_chain(p: &mut Parser<'_>, mut chain: Vec<FieldKey>) -> Vec<FieldKey> {
    loop {
        if p.at(TokenKind::Dot) && p.nth(1) == TokenKind::Ident {
            p.bump();
            chain.push(FieldKey::Str(p.ident_value().to_owned()));
        } else if p.at(TokenKind::Colon) && p.nth(1) == TokenKind::Ident {
            p.bump();
            chain.push(FieldKey::Atom(Atom::new(p.ident_value())));
        } else {
            return chain;
        }
    }
}

fn literal(p: &mut Parser<'_>, value: Value) -> Result<Operand> {
    let isos = iso_chain(p)?;
    Ok(Operand::Literal { value, isos })
}

fn function_call(p: &mut Parser<'_>) -> Result<Operand> {
    let name = Atom::new(p.ident_value());
    p.bump();
    let mut args = Vec::new();
    if !p.at(TokenKind::RParen) {
        loop {
            args.push(operand(p)?);
            if !p.eat(TokenKind::Comma) {
                break;
            }
        }
    }
    p.expect(TokenKind::RParen, "')' closing arguments")?;
    if p.at(TokenKind::ColonColon) {
        return Err(p.error("converter chain cannot follow a function call"));
    }
    Ok(Operand::Call { name, args })
}

fn iso_chain(p: &mut Parser<'_>) -> Result<Vec<Atom>> {
    let mut isos = Vec::new();
    while p.eat(TokenKind::ColonColon) {
        let name = p.expect(TokenKind::Ident, "converter name after '::'")?;
        isos.push(Atom::new(p.text(&name)));
    }
    Ok(isos)
}
