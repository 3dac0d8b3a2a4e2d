//! Filter-expression AST.
//!
//! Built by the expression parser, compiled to a predicate closure by
//! [`compile`]. Expressions that reference converters or call functions are
//! *dynamic*: their bindings can only be resolved at evaluation time.

mod compile;

pub use compile::{Predicate, compile};


use std::fmt;

use focal_core::{Atom, Value};

/// A filter expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Not(Box<Expr>),
    /// Bare operand: evaluates to the operand's truthiness.
    Get(Operand),
    Compare {
        op: CmpOp,
        left: Operand,
        right: Operand,
    },
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
    /// `~~`: compare display renderings.
    StrEq,
    /// `!~`: negated `~~`.
    StrNeq,
}

/// One step of a field chain.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKey {
    Str(String),
    Atom(Atom),
}

/// One side of a comparison.
///
/// `isos` is a converter chain applied forward, left-to-right, after the
/// base value is resolved. Function calls carry no converter chain.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// `@`: the element under test.
    Slf { isos: Vec<Atom> },
    /// `@.a:b` and friends: mapping access walk.
    Field { chain: Vec<FieldKey>, isos: Vec<Atom> },
    Literal { value: Value, isos: Vec<Atom> },
    Call { name: Atom, args: Vec<Operand> },
}

impl Expr {
    /// True when no converter chain and no function call appears anywhere.
    ///
    /// Static expressions can be compiled once at parse time; dynamic ones
    /// are recompiled per evaluation so runtime bindings resolve.
    pub fn is_static(&self) -> bool {
        match self {
            Self::And(l, r) | Self::Or(l, r) => l.is_static() && r.is_static(),
            Self::Not(e) => e.is_static(),
            Self::Get(op) => op.is_static(),
            Self::Compare { left, right, .. } => left.is_static() && right.is_static(),
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            Self::Or(..) => 1,
            Self::And(..) => 2,
            Self::Not(..) => 3,
            Self::Get(_) | Self::Compare { .. } => 4,
        }
    }

    fn fmt_child(&self, child: &Expr, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if child.precedence() < self.precedence() {
            write!(f, "({child})")
        } else {
            write!(f, "{child}")
        }
    }
}

impl Operand {
    fn is_static(&self) -> bool {
        match self {
            Self::Slf { isos } | Self::Field { isos, .. } | Self::Literal { isos, .. } => {
                isos.is_empty()
            }
            Self::Call { .. } => false,
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::And(l, r) => {
                self.fmt_child(l, f)?;
                f.write_str(" and ")?;
                self.fmt_child(r, f)
            }
            Self::Or(l, r) => {
                self.fmt_child(l, f)?;
                f.write_str(" or ")?;
                self.fmt_child(r, f)
            }
            Self::Not(e) => {
                f.write_str("not ")?;
                self.fmt_child(e, f)
            }
            Self::Get(op) => write!(f, "{op}"),
            Self::Compare { op, left, right } => write!(f, "{left} {op} {right}"),
        }
    }
}

impl fmt::Display for CmpOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Self::Eq => "==",
            Self::Neq => "!=",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::StrEq => "~~",
            Self::StrNeq => "!~",
        };
        f.write_str(symbol)
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Slf { isos } => {
                f.write_str("@")?;
                write_isos(f, isos)
            }
            Self::Field { chain, isos } => {
                f.write_str("@")?;
                for key in chain {
                    match key {
                        FieldKey::Str(name) => write!(f, ".{name}")?,
                        FieldKey::Atom(name) => write!(f, ":{}", name.as_str())?,
                    }
                }
                write_isos(f, isos)
            }
            Self::Literal { value, isos } => {
                write!(f, "{value}")?;
                write_isos(f, isos)
            }
            Self::Call { name, args } => {
                write!(f, "{}(", name.as_str())?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(")")
            }
        }
    }
}

fn write_isos(f: &mut fmt::Formatter<'_>, isos: &[Atom]) -> fmt::Result {
    for iso in isos {
        write!(f, "::{}", iso.as_str())?;
    }
    Ok(())
}
