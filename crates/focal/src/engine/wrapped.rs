//! The wrapped-outcome algebra.

use std::fmt;

use focal_core::Value;

use crate::error::Result;

/// Uniform outcome of applying an optic.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Wrapped {
    /// A focus is missing. Sequences short-circuit on it; collections drop it.
    #[default]
    None,
    /// Exactly one focus.
    Single(Value),
    /// A multi-focus; elements are themselves wrapped.
    Many(Vec<Wrapped>),
}

impl Wrapped {
    pub fn single(value: Value) -> Self {
        Self::Single(value)
    }

    pub fn many(items: impl IntoIterator<Item = Wrapped>) -> Self {
        Self::Many(items.into_iter().collect())
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Collapse to a plain value: `None` → `nil`, `Many` → the sequence of
    /// unwrapped elements (recursively).
    pub fn into_value(self) -> Value {
        match self {
            Self::None => Value::Nil,
            Self::Single(value) => value,
            Self::Many(items) => {
                Value::Seq(items.into_iter().map(Wrapped::into_value).collect())
            }
        }
    }

    /// Lift a per-value selection over the wrapper.
    ///
    /// `None` propagates. On a `Many`, `f` runs on each element's value;
    /// `None` results are dropped and `Many` results are spliced in place,
    /// so chained traversals yield a flat focus stream.
    pub fn select_with<F>(self, f: &mut F) -> Result<Wrapped>
    where
        F: FnMut(Value) -> Result<Wrapped>,
    {
        match self {
            Self::None => Ok(Self::None),
            Self::Single(value) => f(value),
            Self::Many(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    let result = match item {
                        Self::None => continue,
                        Self::Single(value) => f(value)?,
                        many @ Self::Many(_) => many.select_with(f)?,
                    };
                    match result {
                        Self::None => {}
                        Self::Many(inner) => out.extend(inner),
                        single => out.push(single),
                    }
                }
                Ok(Self::Many(out))
            }
        }
    }

    /// Lift a per-value rewrite over the wrapper, elementwise through `Many`.
    pub fn transform_with<F>(self, tf: &mut F) -> Result<Wrapped>
    where
        F: FnMut(Value) -> Result<Value>,
    {
        match self {
            Self::None => Ok(Self::None),
            Self::Single(value) => Ok(Self::Single(tf(value)?)),
            Self::Many(items) => {
                let items = items
                    .into_iter()
                    .map(|item| item.transform_with(tf))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Self::Many(items))
            }
        }
    }
}

impl From<Value> for Wrapped {
    fn from(value: Value) -> Self {
        Self::Single(value)
    }
}

impl fmt::Display for Wrapped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("none"),
            Self::Single(value) => write!(f, "single({value})"),
            Self::Many(items) => write!(f, "many({})", items.len()),
        }
    }
}
