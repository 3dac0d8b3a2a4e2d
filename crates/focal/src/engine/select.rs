//! Select strategies: optic in, wrapped outcome out.

use focal_core::{MapKey, Value};

use crate::error::{Error, Result};
use crate::expr::{Predicate, compile};
use crate::optic::{Filter, Index, Optic};
use crate::options::{Bindings, Options};

use super::context::EvalCtx;
use super::prism::prism_select_value;
use super::trace::Tracer;
use super::wrapped::Wrapped;
use super::resolve_position;

/// Evaluate a select over a fresh context.
pub(crate) fn select_root(
    optic: &Optic,
    data: &Value,
    opts: Option<&Options>,
    tracer: &mut dyn Tracer,
) -> Result<Wrapped> {
    let ctx = EvalCtx::new(opts, tracer);
    eval_select(optic, Wrapped::Single(data.clone()), None, &ctx)
}

/// Apply one optic to a wrapped outcome, with tracing around it.
pub(crate) fn eval_select(
    optic: &Optic,
    input: Wrapped,
    seq: Option<&Options>,
    ctx: &EvalCtx<'_>,
) -> Result<Wrapped> {
    ctx.enter();
    ctx.trace(|t, d| t.enter(d, optic));
    let result = select_optic(optic, input, seq, ctx);
    match &result {
        Ok(outcome) => ctx.trace(|t, d| t.matched(d, optic, outcome)),
        Err(error) => ctx.trace(|t, d| t.failed(d, optic, error)),
    }
    ctx.trace(|t, d| t.leave(d, optic));
    ctx.exit();
    result
}

fn select_optic(
    optic: &Optic,
    input: Wrapped,
    seq: Option<&Options>,
    ctx: &EvalCtx<'_>,
) -> Result<Wrapped> {
    match optic {
        Optic::One(index) => input.select_with(&mut |v| one_select(index, &v)),
        Optic::Slice(indices) => input.select_with(&mut |v| slice_select(indices, &v)),
        Optic::All => input.select_with(&mut |v| Ok(all_select(v))),
        Optic::Filter(filter) => {
            let predicate = filter_predicate(filter);
            let bindings = ctx.bindings(seq);
            input.select_with(&mut |v| filter_select(&predicate, &bindings, v))
        }
        Optic::Prism(prism) => {
            prism.validate_output()?;
            input.select_with(&mut |v| {
                Ok(prism_select_value(prism, &v)?.map_or(Wrapped::None, Wrapped::Single))
            })
        }
        Optic::Iso(iso) => {
            input.select_with(&mut |v| Ok(Wrapped::Single((iso.pair.forward)(&v)?)))
        }
        Optic::IsoRef(name) => {
            let pair = ctx.bindings(seq).resolve_iso(name)?;
            input.select_with(&mut |v| Ok(Wrapped::Single((pair.forward)(&v)?)))
        }
        Optic::Sequence(sequence) => {
            let inner = sequence.bindings.as_deref();
            let mut current = input;
            for optic in &sequence.optics {
                if current.is_none() {
                    return Ok(Wrapped::None);
                }
                current = eval_select(optic, current, inner, ctx)?;
            }
            Ok(current)
        }
    }
}

/// Predicate for a filter: the parse-time compilation when the expression is
/// static, a fresh compilation otherwise.
pub(crate) fn filter_predicate(filter: &Filter) -> Predicate {
    filter
        .predicate
        .clone()
        .unwrap_or_else(|| compile(&filter.expr))
}

fn one_select(index: &Index, value: &Value) -> Result<Wrapped> {
    match (value, index) {
        (Value::Seq(items), Index::Int(i)) | (Value::Tuple(items), Index::Int(i)) => {
            Ok(resolve_position(*i, items.len())
                .map_or(Wrapped::None, |pos| Wrapped::Single(items[pos].clone())))
        }
        (Value::Map(entries), Index::Str(key)) => Ok(entries
            .get(&MapKey::Str(key.clone()))
            .cloned()
            .map_or(Wrapped::None, Wrapped::Single)),
        (Value::Map(entries), Index::Atom(key)) => Ok(entries
            .get(&MapKey::Atom(key.clone()))
            .cloned()
            .map_or(Wrapped::None, Wrapped::Single)),
        (Value::Seq(items), _) => {
            // Keyed access across a sequence: descend into each element,
            // dropping elements the key cannot apply to.
            let mut out = Vec::new();
            for item in items {
                match one_select(index, item) {
                    Ok(Wrapped::None) => {}
                    Ok(found) => out.push(found),
                    Err(Error::BadTarget { .. }) => {}
                    Err(other) => return Err(other),
                }
            }
            Ok(Wrapped::Many(out))
        }
        _ => Err(Error::BadTarget {
            optic: format!("one({index})"),
            kind: value.kind_name(),
        }),
    }
}

fn slice_select(indices: &[Index], value: &Value) -> Result<Wrapped> {
    let mut out = Vec::new();
    match value {
        Value::Map(entries) => {
            for index in indices {
                let found = match index {
                    Index::Str(key) => entries.get(&MapKey::Str(key.clone())),
                    Index::Atom(key) => entries.get(&MapKey::Atom(key.clone())),
                    Index::Int(_) => None,
                };
                if let Some(found) = found {
                    out.push(Wrapped::Single(found.clone()));
                }
            }
        }
        Value::Seq(items) | Value::Tuple(items) => {
            for index in indices {
                if let Index::Int(i) = index {
                    if let Some(pos) = resolve_position(*i, items.len()) {
                        out.push(Wrapped::Single(items[pos].clone()));
                    }
                }
            }
        }
        other => {
            return Err(Error::BadTarget {
                optic: "slice".to_owned(),
                kind: other.kind_name(),
            });
        }
    }
    Ok(Wrapped::Many(out))
}

fn all_select(value: Value) -> Wrapped {
    match value {
        Value::Seq(items) | Value::Tuple(items) => {
            Wrapped::Many(items.into_iter().map(Wrapped::Single).collect())
        }
        Value::Map(entries) => {
            Wrapped::Many(entries.into_values().map(Wrapped::Single).collect())
        }
        _ => Wrapped::None,
    }
}

fn filter_select(
    predicate: &Predicate,
    bindings: &Bindings<'_>,
    value: Value,
) -> Result<Wrapped> {
    match &value {
        Value::Seq(items) | Value::Tuple(items) => {
            let mut out = Vec::new();
            for item in items {
                if predicate(item, bindings)? {
                    out.push(Wrapped::Single(item.clone()));
                }
            }
            Ok(Wrapped::Many(out))
        }
        _ => {
            if predicate(&value, bindings)? {
                Ok(Wrapped::Single(value))
            } else {
                Ok(Wrapped::None)
            }
        }
    }
}
