//! The optic AST.
//!
//! Parsed paths become a single optic or a [`Sequence`] of them. Optics are
//! pure values: evaluation never mutates them, and the closure-bearing
//! variants (`Filter` predicates, resolved `Iso`s) share their closures via
//! `Arc`, so a parsed optic is cheap to clone and safe to share across
//! threads.

use std::fmt;
use std::sync::Arc;

use focal_core::{Atom, Value};

use crate::error::{Error, Result};
use crate::expr::{Expr, Predicate, compile};
use crate::options::{IsoPair, Options};

/// Child address used by `One` and `Slice`.
#[derive(Debug, Clone, PartialEq)]
pub enum Index {
    Int(i64),
    Str(String),
    Atom(Atom),
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Str(s) => write!(f, "{s:?}"),
            Self::Atom(a) => write!(f, "{a}"),
        }
    }
}

impl From<i64> for Index {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<&str> for Index {
    fn from(key: &str) -> Self {
        Self::Str(key.to_owned())
    }
}

impl From<Atom> for Index {
    fn from(atom: Atom) -> Self {
        Self::Atom(atom)
    }
}

/// One element of the lens algebra.
#[derive(Debug, Clone)]
pub enum Optic {
    /// Focus exactly one child.
    One(Index),
    /// Focus several children, output in the listed order.
    Slice(Vec<Index>),
    /// Focus every child (mapping → values only).
    All,
    /// Keep only children satisfying a predicate.
    Filter(Filter),
    /// Match tagged variants; extract, reshape, retag.
    Prism(Prism),
    /// Resolved bidirectional conversion.
    Iso(IsoOptic),
    /// Converter reference, resolved at evaluation.
    IsoRef(Atom),
    /// Left-to-right composition.
    Sequence(Sequence),
}

impl Optic {
    /// Compose optics; a single element stays a bare optic.
    pub fn sequence(mut optics: Vec<Optic>) -> Optic {
        if optics.len() == 1 {
            optics.pop().expect("len checked")
        } else {
            Optic::Sequence(Sequence { optics, bindings: None })
        }
    }
}

/// Filter optic: expression plus, when the expression is static, the
/// predicate compiled at parse time. Dynamic expressions recompile per
/// evaluation so runtime-supplied converters and functions resolve.
#[derive(Clone)]
pub struct Filter {
    pub expr: Expr,
    pub(crate) predicate: Option<Predicate>,
}

impl Filter {
    pub fn new(expr: Expr) -> Self {
        let predicate = expr.is_static().then(|| compile(&expr));
        Self { expr, predicate }
    }
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Filter")
            .field("expr", &self.expr.to_string())
            .field("static", &self.predicate.is_some())
            .finish()
    }
}

/// Extraction pattern of a prism.
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    /// Arity-agnostic: everything after the tag, as a tuple.
    Rest,
    /// Fixed arity: a name extracts the position, `None` ignores it.
    Fields(Vec<Option<Atom>>),
}

impl Pattern {
    /// Names extracted by this pattern, in pattern order.
    pub fn names(&self) -> Vec<&Atom> {
        match self {
            Self::Rest => Vec::new(),
            Self::Fields(fields) => fields.iter().flatten().collect(),
        }
    }
}

/// Prism over tagged variants.
#[derive(Debug, Clone, PartialEq)]
pub struct Prism {
    pub tag: Atom,
    pub pattern: Pattern,
    pub output_tag: Option<Atom>,
    pub output_pattern: Option<Vec<Atom>>,
}

impl Prism {
    pub fn new(tag: impl Into<Atom>, pattern: Pattern) -> Self {
        Self {
            tag: tag.into(),
            pattern,
            output_tag: None,
            output_pattern: None,
        }
    }

    pub fn with_output_tag(mut self, tag: impl Into<Atom>) -> Self {
        self.output_tag = Some(tag.into());
        self
    }

    /// Set an explicit output reorder; names must be extracted by the input
    /// pattern.
    pub fn with_output_pattern(mut self, names: Vec<Atom>) -> Result<Self> {
        self.output_pattern = Some(names);
        self.validate_output()?;
        Ok(self)
    }

    /// Check every output name against the input pattern's extractions.
    ///
    /// The parser runs this at parse time; the engine reruns it at
    /// evaluation for prisms built programmatically.
    pub fn validate_output(&self) -> Result<()> {
        let Some(output) = &self.output_pattern else {
            return Ok(());
        };
        let names = self.pattern.names();
        for name in output {
            if !names.contains(&name) {
                return Err(Error::InvalidOutputPattern {
                    name: name.as_str().to_owned(),
                });
            }
        }
        Ok(())
    }
}

/// Resolved iso: a converter pair, named when it came from a reference.
#[derive(Clone)]
pub struct IsoOptic {
    pub(crate) pair: IsoPair,
    pub(crate) name: Option<Atom>,
}

impl IsoOptic {
    pub fn new(pair: IsoPair) -> Self {
        Self { pair, name: None }
    }

    pub fn named(pair: IsoPair, name: impl Into<Atom>) -> Self {
        Self { pair, name: Some(name.into()) }
    }

    /// Forward and backward conversions over `Value`.
    pub fn from_fns(
        forward: impl Fn(&Value) -> Result<Value> + Send + Sync + 'static,
        backward: impl Fn(&Value) -> Result<Value> + Send + Sync + 'static,
    ) -> Self {
        Self::new(IsoPair::new(forward, backward))
    }
}

impl fmt::Debug for IsoOptic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "IsoOptic({name})"),
            None => f.write_str("IsoOptic"),
        }
    }
}

/// Composition of optics, with the bindings the path was parsed with.
#[derive(Debug, Clone, Default)]
pub struct Sequence {
    pub optics: Vec<Optic>,
    pub(crate) bindings: Option<Arc<Options>>,
}

impl Sequence {
    pub fn new(optics: Vec<Optic>) -> Self {
        Self { optics, bindings: None }
    }

    pub fn with_bindings(mut self, options: Options) -> Self {
        self.bindings = Some(Arc::new(options));
        self
    }
}

impl fmt::Display for Optic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::One(index) => write!(f, "one({index})"),
            Self::Slice(indices) => {
                f.write_str("slice(")?;
                for (i, index) in indices.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{index}")?;
                }
                f.write_str(")")
            }
            Self::All => f.write_str("all"),
            Self::Filter(filter) => write!(f, "filter({})", filter.expr),
            Self::Prism(prism) => write!(f, "{prism}"),
            Self::Iso(iso) => match &iso.name {
                Some(name) => write!(f, "iso({name})"),
                None => f.write_str("iso(<fn>)"),
            },
            Self::IsoRef(name) => write!(f, "iso({name})"),
            Self::Sequence(seq) => {
                f.write_str("seq(")?;
                for (i, optic) in seq.optics.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" . ")?;
                    }
                    write!(f, "{optic}")?;
                }
                f.write_str(")")
            }
        }
    }
}

impl fmt::Display for Prism {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "prism({}", self.tag)?;
        match &self.pattern {
            Pattern::Rest => f.write_str(", ...")?,
            Pattern::Fields(fields) => {
                f.write_str(", [")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    match field {
                        Some(name) => f.write_str(name.as_str())?,
                        None => f.write_str("_")?,
                    }
                }
                f.write_str("]")?;
            }
        }
        if let Some(tag) = &self.output_tag {
            write!(f, " -> {tag}")?;
        }
        if let Some(names) = &self.output_pattern {
            f.write_str(" [")?;
            for (i, name) in names.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                f.write_str(name.as_str())?;
            }
            f.write_str("]")?;
        }
        f.write_str(")")
    }
}
