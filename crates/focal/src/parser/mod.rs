//! Recursive-descent parsers for the path and filter-expression languages.
//!
//! Both grammars share one token stream; the path parser hands the cursor to
//! the expression parser inside `[?...]` and takes it back at the closing
//! bracket. Parse errors are fatal: no partial AST ever escapes.

pub mod lexer;

mod expr;
mod path;

pub use expr::parse_expression;
pub use lexer::Span;
pub use path::parse_path;

#[cfg(test)]
mod lexer_tests;
#[cfg(test)]
mod path_tests;

use crate::error::{Error, Result};
use lexer::{Token, TokenKind, lex, token_text};

/// Token cursor shared by the two grammars.
pub(crate) struct Parser<'src> {
    source: &'src str,
    tokens: Vec<Token>,
    pos: usize,
}

impl<'src> Parser<'src> {
    pub(crate) fn new(source: &'src str) -> Result<Self> {
        let tokens = lex(source)?;
        Ok(Self { source, tokens, pos: 0 })
    }

    /// Returns `Eof` past the end of input.
    pub(crate) fn current(&self) -> TokenKind {
        self.nth(0)
    }

    pub(crate) fn nth(&self, lookahead: usize) -> TokenKind {
        self.tokens
            .get(self.pos + lookahead)
            .map_or(TokenKind::Eof, |t| t.kind)
    }

    pub(crate) fn at(&self, kind: TokenKind) -> bool {
        self.current() == kind
    }

    pub(crate) fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    pub(crate) fn current_span(&self) -> Span {
        self.tokens
            .get(self.pos)
            .map_or_else(|| Span::empty(self.source.len() as u32), |t| t.span)
    }

    pub(crate) fn bump(&mut self) -> Token {
        let token = self.tokens[self.pos];
        self.pos += 1;
        token
    }

    pub(crate) fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, kind: TokenKind, what: &str) -> Result<Token> {
        if self.at(kind) {
            return Ok(self.bump());
        }
        Err(self.error(format!(
            "expected {what}, found {}",
            self.current().describe()
        )))
    }

    pub(crate) fn text(&self, token: &Token) -> &'src str {
        token_text(self.source, token)
    }

    /// Parse error anchored at the current token.
    pub(crate) fn error(&self, message: impl Into<String>) -> Error {
        Error::Parse {
            message: message.into(),
            span: self.current_span(),
        }
    }

    /// Bump an `Int` token and parse its text.
    pub(crate) fn int_value(&mut self) -> Result<i64> {
        let token = self.bump();
        self.text(&token)
            .parse()
            .map_err(|_| Error::Parse {
                message: "integer literal out of range".to_owned(),
                span: token.span,
            })
    }

    /// Bump a `Float` token and parse its text.
    pub(crate) fn float_value(&mut self) -> Result<f64> {
        let token = self.bump();
        self.text(&token)
            .parse()
            .map_err(|_| Error::Parse {
                message: "malformed number literal".to_owned(),
                span: token.span,
            })
    }

    /// Bump a `Str` token and unescape its content.
    pub(crate) fn string_value(&mut self) -> String {
        let token = self.bump();
        lexer::unescape(self.text(&token))
    }

    /// Bump an `Ident`-like token and return its text.
    pub(crate) fn ident_value(&mut self) -> &'src str {
        let token = self.bump();
        self.text(&token)
    }

    /// Error out unless the whole input was consumed.
    pub(crate) fn expect_end(&self) -> Result<()> {
        if self.at_end() {
            return Ok(());
        }
        Err(self.error(format!(
            "unexpected trailing {}",
            self.current().describe()
        )))
    }
}
