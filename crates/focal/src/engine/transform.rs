//! Transform strategies: structure-preserving rebuild around the focus.
//!
//! The chain recursion realizes the driver duality: each optic rebuilds its
//! container around the recursively transformed focused children, and the
//! caller's closure runs exactly at the leaf foci. A missing focus leaves
//! the sub-tree unchanged.

use focal_core::{Atom, MapKey, Value};

use crate::error::{Error, Result};
use crate::optic::{Index, Optic, Pattern, Prism};
use crate::options::{IsoPair, Options};

use super::context::EvalCtx;
use super::prism::prism_match;
use super::select::filter_predicate;
use super::trace::Tracer;
use super::resolve_position;

/// Rewrite closure threaded to the leaves.
pub(crate) type Leaf<'f> = dyn FnMut(Value) -> Result<Value> + 'f;

/// Evaluate a transform over a fresh context.
pub(crate) fn transform_root(
    optic: &Optic,
    data: &Value,
    opts: Option<&Options>,
    tracer: &mut dyn Tracer,
    f: &mut Leaf<'_>,
) -> Result<Value> {
    let ctx = EvalCtx::new(opts, tracer);
    let mut leaf = |value: Value| {
        ctx.trace(|t, d| t.picked(d, &value));
        f(value)
    };
    transform_chain(std::slice::from_ref(optic), data.clone(), &mut leaf, None, &ctx)
}

/// Run a value through the remaining optic chain; an exhausted chain is the
/// leaf focus.
pub(crate) fn transform_chain(
    optics: &[Optic],
    value: Value,
    leaf: &mut Leaf<'_>,
    seq: Option<&Options>,
    ctx: &EvalCtx<'_>,
) -> Result<Value> {
    let Some((optic, rest)) = optics.split_first() else {
        return leaf(value);
    };
    ctx.enter();
    ctx.trace(|t, d| t.enter(d, optic));
    let result = transform_optic(optic, rest, value, leaf, seq, ctx);
    if let Err(error) = &result {
        ctx.trace(|t, d| t.failed(d, optic, error));
    }
    ctx.trace(|t, d| t.leave(d, optic));
    ctx.exit();
    result
}

fn transform_optic(
    optic: &Optic,
    rest: &[Optic],
    value: Value,
    leaf: &mut Leaf<'_>,
    seq: Option<&Options>,
    ctx: &EvalCtx<'_>,
) -> Result<Value> {
    match optic {
        Optic::One(index) => one_transform(index, rest, value, leaf, seq, ctx),
        Optic::Slice(indices) => slice_transform(indices, rest, value, leaf, seq, ctx),
        Optic::All => all_transform(rest, value, leaf, seq, ctx),
        Optic::Filter(filter) => {
            let predicate = filter_predicate(filter);
            let matches = |v: &Value, ctx: &EvalCtx<'_>| predicate(v, &ctx.bindings(seq));
            filter_transform(&matches, rest, value, leaf, seq, ctx)
        }
        Optic::Prism(prism) => prism_transform(prism, rest, value, leaf, seq, ctx),
        Optic::Iso(iso) => iso_transform(&iso.pair, rest, value, leaf, seq, ctx),
        Optic::IsoRef(name) => {
            let pair = ctx.bindings(seq).resolve_iso(name)?;
            iso_transform(&pair, rest, value, leaf, seq, ctx)
        }
        Optic::Sequence(sequence) => {
            let inner = sequence.bindings.as_deref();
            transform_chain(
                &sequence.optics,
                value,
                &mut |focus| transform_chain(rest, focus, leaf, seq, ctx),
                inner,
                ctx,
            )
        }
    }
}

/// Whether `One(index)` can focus into this value at all; ineligible values
/// stay unchanged when reached through keyed access across a sequence.
fn one_applicable(index: &Index, value: &Value) -> bool {
    matches!(
        (value, index),
        (Value::Seq(_), _)
            | (Value::Tuple(_), Index::Int(_))
            | (Value::Map(_), Index::Str(_) | Index::Atom(_))
    )
}

fn one_transform(
    index: &Index,
    rest: &[Optic],
    value: Value,
    leaf: &mut Leaf<'_>,
    seq: Option<&Options>,
    ctx: &EvalCtx<'_>,
) -> Result<Value> {
    match (value, index) {
        (Value::Seq(items), Index::Int(i)) => {
            Ok(Value::Seq(update_position(items, *i, rest, leaf, seq, ctx)?))
        }
        (Value::Tuple(items), Index::Int(i)) => {
            Ok(Value::Tuple(update_position(items, *i, rest, leaf, seq, ctx)?))
        }
        (Value::Map(mut entries), Index::Str(_) | Index::Atom(_)) => {
            let key = match index {
                Index::Str(k) => MapKey::Str(k.clone()),
                Index::Atom(k) => MapKey::Atom(k.clone()),
                Index::Int(_) => unreachable!("matched above"),
            };
            if let Some(slot) = entries.get_mut(&key) {
                let old = std::mem::take(slot);
                *slot = transform_chain(rest, old, leaf, seq, ctx)?;
            }
            Ok(Value::Map(entries))
        }
        (Value::Seq(items), _) => {
            // Keyed access across a sequence: rewrite each eligible element,
            // leave the rest alone.
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                if one_applicable(index, &item) {
                    out.push(one_transform(index, rest, item, leaf, seq, ctx)?);
                } else {
                    out.push(item);
                }
            }
            Ok(Value::Seq(out))
        }
        (other, _) => Err(Error::BadTarget {
            optic: format!("one({index})"),
            kind: other.kind_name(),
        }),
    }
}

fn update_position(
    mut items: Vec<Value>,
    index: i64,
    rest: &[Optic],
    leaf: &mut Leaf<'_>,
    seq: Option<&Options>,
    ctx: &EvalCtx<'_>,
) -> Result<Vec<Value>> {
    if let Some(pos) = resolve_position(index, items.len()) {
        let old = std::mem::take(&mut items[pos]);
        items[pos] = transform_chain(rest, old, leaf, seq, ctx)?;
    }
    Ok(items)
}

fn slice_transform(
    indices: &[Index],
    rest: &[Optic],
    value: Value,
    leaf: &mut Leaf<'_>,
    seq: Option<&Options>,
    ctx: &EvalCtx<'_>,
) -> Result<Value> {
    match value {
        Value::Map(mut entries) => {
            for index in indices {
                let key = match index {
                    Index::Str(k) => MapKey::Str(k.clone()),
                    Index::Atom(k) => MapKey::Atom(k.clone()),
                    Index::Int(_) => continue,
                };
                if let Some(slot) = entries.get_mut(&key) {
                    let old = std::mem::take(slot);
                    *slot = transform_chain(rest, old, leaf, seq, ctx)?;
                }
            }
            Ok(Value::Map(entries))
        }
        Value::Seq(mut items) => {
            for index in indices {
                if let Index::Int(i) = index {
                    items = update_position(items, *i, rest, leaf, seq, ctx)?;
                }
            }
            Ok(Value::Seq(items))
        }
        Value::Tuple(mut items) => {
            for index in indices {
                if let Index::Int(i) = index {
                    items = update_position(items, *i, rest, leaf, seq, ctx)?;
                }
            }
            Ok(Value::Tuple(items))
        }
        other => Err(Error::BadTarget {
            optic: "slice".to_owned(),
            kind: other.kind_name(),
        }),
    }
}

fn all_transform(
    rest: &[Optic],
    value: Value,
    leaf: &mut Leaf<'_>,
    seq: Option<&Options>,
    ctx: &EvalCtx<'_>,
) -> Result<Value> {
    match value {
        Value::Seq(items) => {
            let items = items
                .into_iter()
                .map(|item| transform_chain(rest, item, leaf, seq, ctx))
                .collect::<Result<Vec<_>>>()?;
            Ok(Value::Seq(items))
        }
        Value::Tuple(items) => {
            let items = items
                .into_iter()
                .map(|item| transform_chain(rest, item, leaf, seq, ctx))
                .collect::<Result<Vec<_>>>()?;
            Ok(Value::Tuple(items))
        }
        Value::Map(entries) => {
            let mut out = indexmap::IndexMap::with_capacity(entries.len());
            for (key, old) in entries {
                out.insert(key, transform_chain(rest, old, leaf, seq, ctx)?);
            }
            Ok(Value::Map(out))
        }
        // No children to focus: the sub-tree stays as it is.
        other => Ok(other),
    }
}

fn filter_transform(
    matches: &dyn Fn(&Value, &EvalCtx<'_>) -> Result<bool>,
    rest: &[Optic],
    value: Value,
    leaf: &mut Leaf<'_>,
    seq: Option<&Options>,
    ctx: &EvalCtx<'_>,
) -> Result<Value> {
    match value {
        Value::Seq(items) => {
            let items = sieve(items, matches, rest, leaf, seq, ctx)?;
            Ok(Value::Seq(items))
        }
        Value::Tuple(items) => {
            let items = sieve(items, matches, rest, leaf, seq, ctx)?;
            Ok(Value::Tuple(items))
        }
        other => {
            if matches(&other, ctx)? {
                transform_chain(rest, other, leaf, seq, ctx)
            } else {
                Ok(other)
            }
        }
    }
}

/// Rewrite matching elements, keep the rest; length never changes.
fn sieve(
    items: Vec<Value>,
    matches: &dyn Fn(&Value, &EvalCtx<'_>) -> Result<bool>,
    rest: &[Optic],
    leaf: &mut Leaf<'_>,
    seq: Option<&Options>,
    ctx: &EvalCtx<'_>,
) -> Result<Vec<Value>> {
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        if matches(&item, ctx)? {
            out.push(transform_chain(rest, item, leaf, seq, ctx)?);
        } else {
            out.push(item);
        }
    }
    Ok(out)
}

fn iso_transform(
    pair: &IsoPair,
    rest: &[Optic],
    value: Value,
    leaf: &mut Leaf<'_>,
    seq: Option<&Options>,
    ctx: &EvalCtx<'_>,
) -> Result<Value> {
    let converted = (pair.forward)(&value)?;
    let rewritten = transform_chain(rest, converted, leaf, seq, ctx)?;
    (pair.backward)(&rewritten)
}

fn prism_transform(
    prism: &Prism,
    rest: &[Optic],
    value: Value,
    leaf: &mut Leaf<'_>,
    seq: Option<&Options>,
    ctx: &EvalCtx<'_>,
) -> Result<Value> {
    prism.validate_output()?;

    enum Mode {
        Whole,
        Rest,
        Named(Vec<(Atom, usize)>),
    }

    let mode = match prism_match(prism, &value) {
        None => return Ok(value),
        Some(extraction) => match &prism.pattern {
            Pattern::Rest => Mode::Rest,
            Pattern::Fields(_) if extraction.named.is_empty() => Mode::Whole,
            Pattern::Fields(_) => Mode::Named(
                extraction
                    .named
                    .iter()
                    .map(|(name, pos)| ((*name).clone(), *pos))
                    .collect(),
            ),
        },
    };

    let Value::Tuple(mut items) = value else {
        unreachable!("prism_match only matches tuples");
    };
    let arity = items.len();

    match mode {
        Mode::Whole => {
            let rewritten = transform_chain(rest, Value::Tuple(items), leaf, seq, ctx)?;
            let Some(tag) = &prism.output_tag else {
                return Ok(rewritten);
            };
            let Value::Tuple(mut out_items) = rewritten else {
                return Err(Error::ArityMismatch { expected: arity, actual: 1 });
            };
            if out_items.is_empty() {
                out_items.push(Value::Atom(tag.clone()));
            } else {
                out_items[0] = Value::Atom(tag.clone());
            }
            Ok(Value::Tuple(out_items))
        }
        Mode::Rest => {
            let extracted = Value::Tuple(items[1..].to_vec());
            let rewritten = transform_chain(rest, extracted, leaf, seq, ctx)?;
            let Value::Tuple(new_args) = rewritten else {
                return Err(Error::ArityMismatch { expected: arity - 1, actual: 1 });
            };
            let tag = prism.output_tag.as_ref().unwrap_or(&prism.tag);
            let mut out = vec![Value::Atom(tag.clone())];
            out.extend(new_args);
            Ok(Value::Tuple(out))
        }
        Mode::Named(named) => {
            let extracted = if let [(_, pos)] = named.as_slice() {
                items[*pos + 1].clone()
            } else {
                Value::Tuple(named.iter().map(|(_, pos)| items[*pos + 1].clone()).collect())
            };
            let rewritten = transform_chain(rest, extracted, leaf, seq, ctx)?;
            let new_values: Vec<Value> = if named.len() == 1 {
                vec![rewritten]
            } else {
                let Value::Tuple(outs) = rewritten else {
                    return Err(Error::ArityMismatch { expected: named.len(), actual: 1 });
                };
                if outs.len() != named.len() {
                    return Err(Error::ArityMismatch {
                        expected: named.len(),
                        actual: outs.len(),
                    });
                }
                outs
            };

            if let Some(output) = &prism.output_pattern {
                let tag = prism.output_tag.as_ref().unwrap_or(&prism.tag);
                let mut out = vec![Value::Atom(tag.clone())];
                for name in output {
                    let slot = named.iter().position(|(n, _)| n == name).ok_or_else(|| {
                        Error::InvalidOutputPattern {
                            name: name.as_str().to_owned(),
                        }
                    })?;
                    out.push(new_values[slot].clone());
                }
                Ok(Value::Tuple(out))
            } else if let Some(tag) = &prism.output_tag {
                let mut out = vec![Value::Atom(tag.clone())];
                out.extend(new_values);
                Ok(Value::Tuple(out))
            } else {
                for ((_, pos), new_value) in named.iter().zip(new_values) {
                    items[*pos + 1] = new_value;
                }
                Ok(Value::Tuple(items))
            }
        }
    }
}
