//! The heterogeneous value tree.

use std::cmp::Ordering;
use std::fmt;

use indexmap::IndexMap;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::{Atom, MapKey};

/// A node in the data tree.
///
/// `Map` uses [`IndexMap`] so that value iteration follows insertion order;
/// equality between maps is key-based and ignores order.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    #[default]
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Atom(Atom),
    Seq(Vec<Value>),
    Tuple(Vec<Value>),
    Map(IndexMap<MapKey, Value>),
}

impl Value {
    pub fn str(s: impl Into<String>) -> Self {
        Self::Str(s.into())
    }

    pub fn atom(name: impl Into<String>) -> Self {
        Self::Atom(Atom::new(name))
    }

    pub fn seq(items: impl IntoIterator<Item = Value>) -> Self {
        Self::Seq(items.into_iter().collect())
    }

    pub fn tuple(items: impl IntoIterator<Item = Value>) -> Self {
        Self::Tuple(items.into_iter().collect())
    }

    pub fn map<K: Into<MapKey>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        Self::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Tagged variant: a tuple led by an atom discriminator.
    pub fn tagged(tag: impl Into<String>, args: impl IntoIterator<Item = Value>) -> Self {
        let mut items = vec![Self::Atom(Atom::new(tag))];
        items.extend(args);
        Self::Tuple(items)
    }

    /// Discriminator and trailing elements, when `self` is a tagged variant.
    pub fn as_tagged(&self) -> Option<(&Atom, &[Value])> {
        match self {
            Self::Tuple(items) => match items.first() {
                Some(Self::Atom(tag)) => Some((tag, &items[1..])),
                _ => None,
            },
            _ => None,
        }
    }

    /// Only `nil` and `false` are falsy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Self::Nil | Self::Bool(false))
    }

    /// Stable lowercase name of the structural kind, for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Nil => "nil",
            Self::Bool(_) => "boolean",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
            Self::Atom(_) => "atom",
            Self::Seq(_) => "sequence",
            Self::Tuple(_) => "tuple",
            Self::Map(_) => "mapping",
        }
    }

    /// Structural equality with `Int`/`Float` unified numerically.
    ///
    /// `==`/`!=` in filter expressions go through this, so `age == 3` holds
    /// whether `age` arrived as `3` or `3.0`.
    pub fn equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Self::Int(a), Self::Float(b)) | (Self::Float(b), Self::Int(a)) => {
                (*a as f64) == *b
            }
            (Self::Seq(a), Self::Seq(b)) | (Self::Tuple(a), Self::Tuple(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.equals(y))
            }
            (Self::Map(a), Self::Map(b)) => {
                a.len() == b.len()
                    && a.iter().all(|(k, v)| b.get(k).is_some_and(|w| v.equals(w)))
            }
            _ => self == other,
        }
    }

    /// Total order over values.
    ///
    /// `Int`/`Float` compare numerically; otherwise same-kind values compare
    /// naturally (strings and atoms lexicographically, sequences and tuples
    /// element-wise) and distinct kinds fall back to a fixed kind rank.
    pub fn compare(&self, other: &Value) -> Ordering {
        use Value::*;
        match (self, other) {
            (Int(a), Int(b)) => a.cmp(b),
            (Int(a), Float(b)) => (*a as f64).total_cmp(b),
            (Float(a), Int(b)) => a.total_cmp(&(*b as f64)),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Bool(a), Bool(b)) => a.cmp(b),
            (Str(a), Str(b)) => a.cmp(b),
            (Atom(a), Atom(b)) => a.cmp(b),
            (Seq(a), Seq(b)) | (Tuple(a), Tuple(b)) => compare_slices(a, b),
            (Map(a), Map(b)) => a
                .len()
                .cmp(&b.len())
                .then_with(|| compare_pairs(a, b)),
            _ => self.kind_rank().cmp(&other.kind_rank()),
        }
    }

    fn kind_rank(&self) -> u8 {
        match self {
            Self::Nil => 0,
            Self::Bool(_) => 1,
            Self::Int(_) | Self::Float(_) => 2,
            Self::Atom(_) => 3,
            Self::Str(_) => 4,
            Self::Seq(_) => 5,
            Self::Tuple(_) => 6,
            Self::Map(_) => 7,
        }
    }

    /// Display conversion used by the `~~`/`!~` operators.
    ///
    /// Scalars render bare: `Nil` is empty, strings are unquoted, atoms drop
    /// the colon. Containers fall back to their literal rendering.
    pub fn to_text(&self) -> String {
        match self {
            Self::Nil => String::new(),
            Self::Bool(b) => b.to_string(),
            Self::Int(i) => i.to_string(),
            Self::Float(x) => format!("{x:?}"),
            Self::Str(s) => s.clone(),
            Self::Atom(a) => a.as_str().to_owned(),
            _ => self.to_string(),
        }
    }
}

fn compare_slices(a: &[Value], b: &[Value]) -> Ordering {
    for (x, y) in a.iter().zip(b) {
        match x.compare(y) {
            Ordering::Equal => {}
            other => return other,
        }
    }
    a.len().cmp(&b.len())
}

fn compare_pairs(a: &IndexMap<MapKey, Value>, b: &IndexMap<MapKey, Value>) -> Ordering {
    for ((ka, va), (kb, vb)) in a.iter().zip(b.iter()) {
        match ka.cmp(kb) {
            Ordering::Equal => {}
            other => return other,
        }
        match va.compare(vb) {
            Ordering::Equal => {}
            other => return other,
        }
    }
    Ordering::Equal
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => f.write_str("nil"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x:?}"),
            Self::Str(s) => write!(f, "{s:?}"),
            Self::Atom(a) => write!(f, "{a}"),
            Self::Seq(items) => {
                f.write_str("[")?;
                write_joined(f, items)?;
                f.write_str("]")
            }
            Self::Tuple(items) => {
                f.write_str("(")?;
                write_joined(f, items)?;
                f.write_str(")")
            }
            Self::Map(entries) => {
                f.write_str("{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                f.write_str("}")
            }
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Nil => serializer.serialize_none(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Int(i) => serializer.serialize_i64(*i),
            Self::Float(x) => serializer.serialize_f64(*x),
            Self::Str(s) => serializer.serialize_str(s),
            Self::Atom(a) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("$atom", a.as_str())?;
                map.end()
            }
            Self::Seq(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Tuple(items) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("$tuple", items)?;
                map.end()
            }
            Self::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (k, v) in entries {
                    map.serialize_entry(&k.as_text(), v)?;
                }
                map.end()
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<Atom> for Value {
    fn from(a: Atom) -> Self {
        Self::Atom(a)
    }
}
