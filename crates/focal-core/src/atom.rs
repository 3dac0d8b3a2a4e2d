//! Atom names and mapping keys.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Symbolic name, rendered as `:name`.
///
/// Atoms discriminate tagged variants, key mappings, and name converter
/// references. Two atoms are equal iff their names are equal; there is no
/// coercion between an atom and the string of the same spelling.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Atom(String);

impl Atom {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":{}", self.0)
    }
}

impl fmt::Debug for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":{}", self.0)
    }
}

impl From<&str> for Atom {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Atom {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Key of a mapping: a string or an atom.
///
/// Lookup is exact-type: `MapKey::Str("k")` never matches `MapKey::Atom(:k)`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MapKey {
    Str(String),
    Atom(Atom),
}

impl MapKey {
    pub fn str(key: impl Into<String>) -> Self {
        Self::Str(key.into())
    }

    pub fn atom(name: impl Into<String>) -> Self {
        Self::Atom(Atom::new(name))
    }

    /// Key spelling without quoting, used when a key round-trips through JSON.
    pub fn as_text(&self) -> String {
        match self {
            Self::Str(s) => s.clone(),
            Self::Atom(a) => format!(":{}", a.as_str()),
        }
    }
}

impl fmt::Display for MapKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => write!(f, "{s:?}"),
            Self::Atom(a) => write!(f, "{a}"),
        }
    }
}

impl From<&str> for MapKey {
    fn from(key: &str) -> Self {
        Self::Str(key.to_owned())
    }
}

impl From<String> for MapKey {
    fn from(key: String) -> Self {
        Self::Str(key)
    }
}

impl From<Atom> for MapKey {
    fn from(atom: Atom) -> Self {
        Self::Atom(atom)
    }
}
