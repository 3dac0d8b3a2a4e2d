//! Caller-supplied bindings: converters and filter functions.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use focal_core::{Atom, Value};

use crate::convert;
use crate::error::{Error, Result};

/// Converter direction: one half of an isomorphism.
pub type ConvertFn = Arc<dyn Fn(&Value) -> Result<Value> + Send + Sync>;

/// Function callable from filter expressions.
pub type FilterFn = Arc<dyn Fn(&[Value]) -> Result<Value> + Send + Sync>;

/// A named bidirectional conversion.
///
/// `select` applies `forward`; `transform` applies `forward`, the caller's
/// function, then `backward`. For round-trippable values the pair should
/// satisfy `backward(forward(v)) == v`; the engine does not verify this.
#[derive(Clone)]
pub struct IsoPair {
    pub forward: ConvertFn,
    pub backward: ConvertFn,
}

impl IsoPair {
    pub fn new(
        forward: impl Fn(&Value) -> Result<Value> + Send + Sync + 'static,
        backward: impl Fn(&Value) -> Result<Value> + Send + Sync + 'static,
    ) -> Self {
        Self {
            forward: Arc::new(forward),
            backward: Arc::new(backward),
        }
    }
}

impl fmt::Debug for IsoPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("IsoPair")
    }
}

/// Per-call (or parse-time) bindings for converter and function names.
///
/// ```
/// use focal::{Options, Value};
///
/// let opts = Options::new()
///     .iso(
///         "celsius",
///         |v| match v {
///             Value::Int(f) => Ok(Value::Int((f - 32) * 5 / 9)),
///             other => Err(focal::Error::BadTarget {
///                 optic: "celsius".into(),
///                 kind: other.kind_name(),
///             }),
///         },
///         |v| match v {
///             Value::Int(c) => Ok(Value::Int(c * 9 / 5 + 32)),
///             other => Err(focal::Error::BadTarget {
///                 optic: "celsius".into(),
///                 kind: other.kind_name(),
///             }),
///         },
///     )
///     .function("len", |args| match args {
///         [Value::Str(s)] => Ok(Value::Int(s.len() as i64)),
///         _ => Ok(Value::Nil),
///     });
/// let data = Value::map([("temp", Value::Int(212))]);
/// assert_eq!(
///     focal::select_with(&data, "temp::celsius", &opts).unwrap(),
///     Value::Int(100)
/// );
/// ```
#[derive(Clone, Default)]
pub struct Options {
    isos: IndexMap<Atom, IsoPair>,
    functions: IndexMap<Atom, FilterFn>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a converter name to a forward/backward pair.
    pub fn iso(
        self,
        name: impl Into<Atom>,
        forward: impl Fn(&Value) -> Result<Value> + Send + Sync + 'static,
        backward: impl Fn(&Value) -> Result<Value> + Send + Sync + 'static,
    ) -> Self {
        self.iso_pair(name, IsoPair::new(forward, backward))
    }

    pub fn iso_pair(mut self, name: impl Into<Atom>, pair: IsoPair) -> Self {
        self.isos.insert(name.into(), pair);
        self
    }

    /// Bind a function name callable from filter expressions.
    pub fn function(
        mut self,
        name: impl Into<Atom>,
        function: impl Fn(&[Value]) -> Result<Value> + Send + Sync + 'static,
    ) -> Self {
        self.functions.insert(name.into(), Arc::new(function));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.isos.is_empty() && self.functions.is_empty()
    }

    pub(crate) fn get_iso(&self, name: &Atom) -> Option<&IsoPair> {
        self.isos.get(name)
    }

    pub(crate) fn get_function(&self, name: &Atom) -> Option<&FilterFn> {
        self.functions.get(name)
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("isos", &self.isos.keys().collect::<Vec<_>>())
            .field("functions", &self.functions.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Resolution view over the binding layers.
///
/// Lookup order: per-call options, then the containing sequence's parse-time
/// bindings, then (for converters) the built-in catalogue.
#[derive(Clone, Copy)]
pub struct Bindings<'a> {
    call: Option<&'a Options>,
    seq: Option<&'a Options>,
}

impl<'a> Bindings<'a> {
    pub(crate) fn new(call: Option<&'a Options>, seq: Option<&'a Options>) -> Self {
        Self { call, seq }
    }

    /// Resolve a converter reference, falling back to the built-ins.
    pub fn resolve_iso(&self, name: &Atom) -> Result<IsoPair> {
        if let Some(pair) = self.call.and_then(|o| o.get_iso(name)) {
            return Ok(pair.clone());
        }
        if let Some(pair) = self.seq.and_then(|o| o.get_iso(name)) {
            return Ok(pair.clone());
        }
        convert::builtin(name.as_str()).ok_or_else(|| Error::UnresolvedConverter {
            name: name.as_str().to_owned(),
            available: convert::BUILTIN_NAMES.join(", "),
        })
    }

    /// Resolve a filter-function name.
    pub fn resolve_function(&self, name: &Atom) -> Result<FilterFn> {
        if let Some(function) = self.call.and_then(|o| o.get_function(name)) {
            return Ok(function.clone());
        }
        if let Some(function) = self.seq.and_then(|o| o.get_function(name)) {
            return Ok(function.clone());
        }
        Err(Error::UnknownFunction {
            name: name.as_str().to_owned(),
        })
    }
}
