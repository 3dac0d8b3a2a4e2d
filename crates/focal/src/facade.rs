//! Public entry points: the `Path` handle and the free functions.

use std::fmt;

use focal_core::Value;

use crate::engine::{self, NoopTracer, Tracer};
use crate::error::Result;
use crate::optic::{Optic, Sequence};
use crate::options::Options;
use crate::parser::parse_path;

/// A parsed path, ready to select from or transform any number of trees.
///
/// Parsing happens once; evaluation never mutates the optic AST, so a `Path`
/// can be shared freely.
#[derive(Clone)]
pub struct Path {
    optic: Optic,
}

impl Path {
    /// Parse a path string.
    pub fn parse(source: &str) -> Result<Self> {
        Ok(Self { optic: parse_path(source)? })
    }

    /// Parse a path string and bind options to it.
    ///
    /// Converters and functions bound here travel with the path and resolve
    /// after any per-call options.
    pub fn parse_with(source: &str, options: Options) -> Result<Self> {
        let optic = match parse_path(source)? {
            Optic::Sequence(seq) => Optic::Sequence(seq.with_bindings(options)),
            single => Optic::Sequence(Sequence::new(vec![single]).with_bindings(options)),
        };
        Ok(Self { optic })
    }

    /// Wrap a programmatically built optic.
    pub fn from_optic(optic: Optic) -> Self {
        Self { optic }
    }

    pub fn optic(&self) -> &Optic {
        &self.optic
    }

    /// Focused value(s): `nil` when the focus is missing, the value for a
    /// single focus, a sequence for a multi-focus.
    pub fn select(&self, data: &Value) -> Result<Value> {
        self.select_traced(data, None, &mut NoopTracer)
    }

    pub fn select_with(&self, data: &Value, options: &Options) -> Result<Value> {
        self.select_traced(data, Some(options), &mut NoopTracer)
    }

    pub fn select_traced(
        &self,
        data: &Value,
        options: Option<&Options>,
        tracer: &mut dyn Tracer,
    ) -> Result<Value> {
        let outcome = engine::select_root(&self.optic, data, options, tracer)?;
        Ok(outcome.into_value())
    }

    /// A new tree with every focused value rewritten by `f`; everything
    /// outside the focus is structurally unchanged.
    pub fn transform(&self, data: &Value, f: impl FnMut(Value) -> Value) -> Result<Value> {
        self.transform_traced(data, None, &mut NoopTracer, f)
    }

    pub fn transform_with(
        &self,
        data: &Value,
        options: &Options,
        f: impl FnMut(Value) -> Value,
    ) -> Result<Value> {
        self.transform_traced(data, Some(options), &mut NoopTracer, f)
    }

    pub fn transform_traced(
        &self,
        data: &Value,
        options: Option<&Options>,
        tracer: &mut dyn Tracer,
        mut f: impl FnMut(Value) -> Value,
    ) -> Result<Value> {
        engine::transform_root(&self.optic, data, options, tracer, &mut |value| Ok(f(value)))
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.optic)
    }
}

impl fmt::Debug for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Path({})", self.optic)
    }
}

impl From<Optic> for Path {
    fn from(optic: Optic) -> Self {
        Self::from_optic(optic)
    }
}

/// Parse and select in one step.
pub fn select(data: &Value, path: &str) -> Result<Value> {
    Path::parse(path)?.select(data)
}

/// Parse and select with options bound for the call.
pub fn select_with(data: &Value, path: &str, options: &Options) -> Result<Value> {
    Path::parse(path)?.select_with(data, options)
}

/// Parse and transform in one step.
pub fn transform(data: &Value, path: &str, f: impl FnMut(Value) -> Value) -> Result<Value> {
    Path::parse(path)?.transform(data, f)
}

/// Parse and transform with options bound for the call.
pub fn transform_with(
    data: &Value,
    path: &str,
    options: &Options,
    f: impl FnMut(Value) -> Value,
) -> Result<Value> {
    Path::parse(path)?.transform_with(data, options, f)
}
