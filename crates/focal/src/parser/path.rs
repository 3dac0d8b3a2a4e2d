//! Path grammar: components into optics.

use focal_core::Atom;

use crate::error::Result;
use crate::optic::{Filter, Index, Optic, Pattern, Prism};

use super::Parser;
use super::expr::expression;
use super::lexer::TokenKind;

/// Parse a path into a single optic, or a `Sequence` when it has several
/// components.
pub fn parse_path(source: &str) -> Result<Optic> {
    let mut p = Parser::new(source)?;
    if p.at_end() {
        return Err(p.error("empty path"));
    }
    let mut optics = Vec::new();
    loop {
        parse_component(&mut p, &mut optics)?;
        if p.at_end() {
            break;
        }
        if p.eat(TokenKind::Dot) {
            if p.at_end() {
                return Err(p.error("expected path component after '.'"));
            }
            continue;
        }
        // The dot separator is optional before brackets, prisms, converters,
        // and atom keys.
        match p.current() {
            TokenKind::LBracket
            | TokenKind::ColonBrace
            | TokenKind::ColonColon
            | TokenKind::Colon => continue,
            _ => break,
        }
    }
    p.expect_end()?;
    Ok(Optic::sequence(optics))
}

fn parse_component(p: &mut Parser<'_>, optics: &mut Vec<Optic>) -> Result<()> {
    match p.current() {
        TokenKind::LBracket => optics.push(parse_bracket(p)?),
        TokenKind::ColonBrace => optics.push(parse_prism(p)?),
        TokenKind::ColonColon => {
            p.bump();
            let name = p.expect(TokenKind::Ident, "converter name after '::'")?;
            let name = Atom::new(p.text(&name));
            optics.push(Optic::IsoRef(name));
        }
        TokenKind::Colon => {
            p.bump();
            let name = p.expect(TokenKind::Ident, "atom key after ':'")?;
            let name = Atom::new(p.text(&name));
            optics.push(Optic::One(Index::Atom(name)));
        }
        TokenKind::Ident => {
            let key = p.ident_value().to_owned();
            optics.push(Optic::One(Index::Str(key)));
        }
        TokenKind::Str => {
            let key = p.string_value();
            optics.push(Optic::One(Index::Str(key)));
        }
        // Keywords of the filter language are ordinary keys in a path.
        TokenKind::KwAnd
        | TokenKind::KwOr
        | TokenKind::KwNot
        | TokenKind::KwTrue
        | TokenKind::KwFalse
        | TokenKind::KwNil => {
            let key = p.ident_value().to_owned();
            optics.push(Optic::One(Index::Str(key)));
        }
        other => {
            return Err(p.error(format!(
                "expected path component, found {}",
                other.describe()
            )));
        }
    }
    Ok(())
}

fn parse_bracket(p: &mut Parser<'_>) -> Result<Optic> {
    p.bump();
    match p.current() {
        TokenKind::Star => {
            p.bump();
            p.expect(TokenKind::RBracket, "']'")?;
            Ok(Optic::All)
        }
        TokenKind::Question => {
            p.bump();
            let expr = expression(p)?;
            p.expect(TokenKind::RBracket, "']' after filter expression")?;
            Ok(Optic::Filter(Filter::new(expr)))
        }
        TokenKind::RBracket => Err(p.error("empty brackets")),
        _ => {
            let mut indices = Vec::new();
            loop {
                indices.push(parse_index(p)?);
                if !p.eat(TokenKind::Comma) {
                    break;
                }
            }
            p.expect(TokenKind::RBracket, "']'")?;
            if indices.len() == 1 {
                Ok(Optic::One(indices.pop().expect("len checked")))
            } else {
                Ok(Optic::Slice(indices))
            }
        }
    }
}

fn parse_index(p: &mut Parser<'_>) -> Result<Index> {
    match p.current() {
        TokenKind::Int => Ok(Index::Int(p.int_value()?)),
        TokenKind::Ident => Ok(Index::Str(p.ident_value().to_owned())),
        TokenKind::Str => Ok(Index::Str(p.string_value())),
        TokenKind::Colon => {
            p.bump();
            let name = p.expect(TokenKind::Ident, "atom key after ':'")?;
            Ok(Index::Atom(Atom::new(p.text(&name))))
        }
        other => Err(p.error(format!(
            "expected index, key, or atom, found {}",
            other.describe()
        ))),
    }
}

fn parse_prism(p: &mut Parser<'_>) -> Result<Optic> {
    p.bump();
    p.expect(TokenKind::Colon, "':' before prism tag")?;
    let tag = p.expect(TokenKind::Ident, "prism tag")?;
    let tag = Atom::new(p.text(&tag));

    // A bare tag and an explicit `, ...` both mean arity-agnostic.
    let pattern = if p.eat(TokenKind::Comma) {
        if p.eat(TokenKind::Ellipsis) {
            Pattern::Rest
        } else {
            let mut fields = Vec::new();
            loop {
                match p.current() {
                    TokenKind::Underscore => {
                        p.bump();
                        fields.push(None);
                    }
                    TokenKind::Ident => fields.push(Some(Atom::new(p.ident_value()))),
                    other => {
                        return Err(p.error(format!(
                            "expected extraction name or '_', found {}",
                            other.describe()
                        )));
                    }
                }
                if !p.eat(TokenKind::Comma) {
                    break;
                }
            }
            Pattern::Fields(fields)
        }
    } else {
        Pattern::Rest
    };
    p.expect(TokenKind::RBrace, "'}' closing prism")?;

    let mut prism = Prism::new(tag, pattern);
    if p.eat(TokenKind::Arrow) {
        prism = parse_retag(p, prism)?;
    }
    Ok(Optic::Prism(prism))
}

fn parse_retag(p: &mut Parser<'_>, prism: Prism) -> Result<Prism> {
    match p.current() {
        TokenKind::Colon => {
            p.bump();
            let tag = p.expect(TokenKind::Ident, "output tag")?;
            Ok(prism.with_output_tag(Atom::new(p.text(&tag))))
        }
        TokenKind::ColonBrace => {
            p.bump();
            p.expect(TokenKind::Colon, "':' before output tag")?;
            let tag = p.expect(TokenKind::Ident, "output tag")?;
            let mut prism = prism.with_output_tag(Atom::new(p.text(&tag)));
            if p.eat(TokenKind::Comma) && !p.eat(TokenKind::Ellipsis) {
                let mut names = Vec::new();
                loop {
                    let name = p.expect(TokenKind::Ident, "output name")?;
                    names.push(Atom::new(p.text(&name)));
                    if !p.eat(TokenKind::Comma) {
                        break;
                    }
                }
                prism = prism.with_output_pattern(names)?;
            }
            p.expect(TokenKind::RBrace, "'}' closing output pattern")?;
            Ok(prism)
        }
        other => Err(p.error(format!(
            "expected ':tag' or ':{{' after '->', found {}",
            other.describe()
        ))),
    }
}
