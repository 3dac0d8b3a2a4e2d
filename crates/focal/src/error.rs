//! Errors raised by parsing and evaluation.

use annotate_snippets::{AnnotationKind, Group, Level, Renderer, Snippet};

use crate::parser::Span;

/// Everything that can go wrong in Focal.
///
/// Parse errors abort before evaluation begins; evaluation errors abort the
/// call with no partial writes. Missing keys, out-of-range indices, and
/// prism non-matches are not errors; they produce empty outcomes instead.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// Malformed path or filter expression.
    #[error("{message}")]
    Parse { message: String, span: Span },

    /// An optic was applied to a value of an incompatible structural kind.
    #[error("cannot apply {optic} to {kind} value")]
    BadTarget { optic: String, kind: &'static str },

    /// A converter reference was not bound in options and is not a built-in.
    #[error("converter :{name} is not bound (built-ins: {available})")]
    UnresolvedConverter { name: String, available: String },

    /// A filter expression called a function that options do not bind.
    #[error("function {name} is not bound in options")]
    UnknownFunction { name: String },

    /// A prism output pattern names a field its input pattern does not extract.
    #[error("output pattern references {name}, which the input pattern does not extract")]
    InvalidOutputPattern { name: String },

    /// A prism transform closure returned a tuple of the wrong shape.
    #[error("pattern substitutes {expected} values but transform returned {actual}")]
    ArityMismatch { expected: usize, actual: usize },

    /// A converter received content it could not convert.
    #[error("converter :{name} failed: {message}")]
    Conversion { name: String, message: String },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Symbolic kind of this error, stable across message changes.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Parse { .. } => "parse-error",
            Self::BadTarget { .. } => "bad-target",
            Self::UnresolvedConverter { .. } => "unresolved-converter",
            Self::UnknownFunction { .. } => "unknown-function",
            Self::InvalidOutputPattern { .. } => "invalid-output-pattern",
            Self::ArityMismatch { .. } => "arity-mismatch",
            Self::Conversion { .. } => "conversion",
        }
    }

    /// Render this error against the path text it came from.
    ///
    /// Parse errors get an annotated snippet pointing at the offending span;
    /// other errors fall back to their display form.
    pub fn render(&self, source: &str) -> String {
        let Self::Parse { message, span } = self else {
            return self.to_string();
        };

        let range = span.clamped_range(source.len());
        let snippet = Snippet::source(source)
            .line_start(1)
            .annotation(AnnotationKind::Primary.span(range).label(message));
        let report: Vec<Group> = vec![Level::ERROR.primary_title(message).element(snippet)];
        format!("{}", Renderer::plain().render(&report))
    }
}
