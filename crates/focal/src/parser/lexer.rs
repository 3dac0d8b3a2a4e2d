//! Lexer shared by the path and filter-expression languages.
//!
//! Produces span-based tokens; text is sliced from the source only when a
//! token's spelling matters. Keywords are plain tokens and lose to the
//! identifier rule on longer matches, so `android` is an identifier while
//! `and` is a keyword.

use std::fmt;
use std::ops::Range;

use logos::Logos;

use crate::error::{Error, Result};

/// Byte span into the path source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn empty(offset: u32) -> Self {
        Self { start: offset, end: offset }
    }

    /// Byte range, widened to one character for empty spans and clamped to
    /// the source length, for snippet rendering. An empty span at the very
    /// end widens backwards so the annotation still lands on a character.
    pub fn clamped_range(&self, limit: usize) -> Range<usize> {
        let start = (self.start as usize).min(limit);
        let end = (self.end as usize).min(limit);
        if start < end {
            return start..end;
        }
        if start < limit {
            start..start + 1
        } else {
            limit.saturating_sub(1)..limit
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// All token kinds of both languages.
///
/// `Eof` is a parser-side sentinel and never produced by the lexer.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n]+")]
pub enum TokenKind {
    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    /// `:{` opens a prism body. Must outrank the bare `Colon`.
    #[token(":{")]
    ColonBrace,

    #[token("}")]
    RBrace,

    #[token("::")]
    ColonColon,

    #[token(":")]
    Colon,

    #[token("->")]
    Arrow,

    #[token("...")]
    Ellipsis,

    #[token(".")]
    Dot,

    #[token(",")]
    Comma,

    #[token("*")]
    Star,

    #[token("?")]
    Question,

    #[token("_", priority = 3)]
    Underscore,

    #[token("@")]
    At,

    #[token("==")]
    EqEq,

    #[token("!=")]
    BangEq,

    #[token("~~")]
    TildeTilde,

    #[token("!~")]
    BangTilde,

    #[token("<=")]
    LtEq,

    #[token(">=")]
    GtEq,

    #[token("<")]
    Lt,

    #[token(">")]
    Gt,

    #[token("and")]
    KwAnd,

    #[token("or")]
    KwOr,

    #[token("not")]
    KwNot,

    #[token("true")]
    KwTrue,

    #[token("false")]
    KwFalse,

    #[token("nil")]
    KwNil,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,

    #[regex(r"-?[0-9]+\.[0-9]+")]
    Float,

    #[regex(r"-?[0-9]+")]
    Int,

    #[regex(r#""(?:[^"\\]|\\.)*""#)]
    #[regex(r"'(?:[^'\\]|\\.)*'")]
    Str,

    Eof,
}

impl TokenKind {
    /// Human-readable spelling for error messages.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::LBracket => "'['",
            Self::RBracket => "']'",
            Self::LParen => "'('",
            Self::RParen => "')'",
            Self::ColonBrace => "':{'",
            Self::RBrace => "'}'",
            Self::ColonColon => "'::'",
            Self::Colon => "':'",
            Self::Arrow => "'->'",
            Self::Ellipsis => "'...'",
            Self::Dot => "'.'",
            Self::Comma => "','",
            Self::Star => "'*'",
            Self::Question => "'?'",
            Self::Underscore => "'_'",
            Self::At => "'@'",
            Self::EqEq => "'=='",
            Self::BangEq => "'!='",
            Self::TildeTilde => "'~~'",
            Self::BangTilde => "'!~'",
            Self::LtEq => "'<='",
            Self::GtEq => "'>='",
            Self::Lt => "'<'",
            Self::Gt => "'>'",
            Self::KwAnd => "'and'",
            Self::KwOr => "'or'",
            Self::KwNot => "'not'",
            Self::KwTrue => "'true'",
            Self::KwFalse => "'false'",
            Self::KwNil => "'nil'",
            Self::Ident => "identifier",
            Self::Float => "number",
            Self::Int => "number",
            Self::Str => "string",
            Self::Eof => "end of input",
        }
    }
}

/// Token: kind plus span; text is sliced from source on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

pub fn token_text<'src>(source: &'src str, token: &Token) -> &'src str {
    &source[token.span.start as usize..token.span.end as usize]
}

/// Tokenize the whole source, failing on the first unrecognized character.
pub fn lex(source: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(source);
    while let Some(item) = lexer.next() {
        let range = lexer.span();
        let span = Span::new(range.start as u32, range.end as u32);
        match item {
            Ok(kind) => tokens.push(Token::new(kind, span)),
            Err(()) => {
                let offender = source.get(range.clone()).unwrap_or("?");
                let message = if offender.starts_with('\'') || offender.starts_with('"') {
                    "unterminated string literal".to_owned()
                } else {
                    format!("unrecognized character {offender:?}")
                };
                return Err(Error::Parse { message, span });
            }
        }
    }
    Ok(tokens)
}

/// Strip quotes and process escapes of a string literal's raw text.
///
/// Recognizes `\\`, `\n`, `\t`, `\r` and the escaped enclosing quote; any
/// other escaped character is kept as-is.
pub fn unescape(raw: &str) -> String {
    let inner = &raw[1..raw.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
