//! Compile expression ASTs to predicate closures.

use std::cmp::Ordering;
use std::sync::Arc;

use focal_core::{Atom, MapKey, Value};

use crate::error::Result;
use crate::options::Bindings;

use super::{CmpOp, Expr, FieldKey, Operand};

/// Compiled predicate: element in, verdict out.
///
/// The bindings view carries the converters and functions the expression may
/// reference; static expressions never consult it.
pub type Predicate = Arc<dyn Fn(&Value, &Bindings<'_>) -> Result<bool> + Send + Sync>;

/// Compile an expression into a predicate closure.
///
/// Logical connectives short-circuit. Comparisons resolve both operands and
/// dispatch on the operator: ordering goes through [`Value::compare`],
/// equality through [`Value::equals`], and `~~`/`!~` through display
/// renderings.
pub fn compile(expr: &Expr) -> Predicate {
    match expr {
        Expr::And(l, r) => {
            let (l, r) = (compile(l), compile(r));
            Arc::new(move |v, b| Ok(l(v, b)? && r(v, b)?))
        }
        Expr::Or(l, r) => {
            let (l, r) = (compile(l), compile(r));
            Arc::new(move |v, b| Ok(l(v, b)? || r(v, b)?))
        }
        Expr::Not(e) => {
            let inner = compile(e);
            Arc::new(move |v, b| Ok(!inner(v, b)?))
        }
        Expr::Get(op) => {
            let op = op.clone();
            Arc::new(move |v, b| Ok(resolve(&op, v, b)?.is_truthy()))
        }
        Expr::Compare { op, left, right } => {
            let cmp = *op;
            let (left, right) = (left.clone(), right.clone());
            Arc::new(move |v, b| {
                let l = resolve(&left, v, b)?;
                let r = resolve(&right, v, b)?;
                Ok(apply_cmp(cmp, &l, &r))
            })
        }
    }
}

fn apply_cmp(op: CmpOp, l: &Value, r: &Value) -> bool {
    match op {
        CmpOp::Eq => l.equals(r),
        CmpOp::Neq => !l.equals(r),
        CmpOp::Lt => l.compare(r) == Ordering::Less,
        CmpOp::Lte => l.compare(r) != Ordering::Greater,
        CmpOp::Gt => l.compare(r) == Ordering::Greater,
        CmpOp::Gte => l.compare(r) != Ordering::Less,
        CmpOp::StrEq => l.to_text() == r.to_text(),
        CmpOp::StrNeq => l.to_text() != r.to_text(),
    }
}

/// Resolve an operand against the element under test.
pub(crate) fn resolve(op: &Operand, element: &Value, bindings: &Bindings<'_>) -> Result<Value> {
    match op {
        Operand::Slf { isos } => apply_isos(element.clone(), isos, bindings),
        Operand::Field { chain, isos } => {
            let value = walk_chain(element, chain);
            apply_isos(value, isos, bindings)
        }
        Operand::Literal { value, isos } => apply_isos(value.clone(), isos, bindings),
        Operand::Call { name, args } => {
            let function = bindings.resolve_function(name)?;
            let mut resolved = Vec::with_capacity(args.len());
            for arg in args {
                resolved.push(resolve(arg, element, bindings)?);
            }
            function(&resolved)
        }
    }
}

/// Each step: mapping with the key present yields the value, else `nil`.
fn walk_chain(element: &Value, chain: &[FieldKey]) -> Value {
    let mut current = element;
    for key in chain {
        let Value::Map(entries) = current else {
            return Value::Nil;
        };
        let lookup = match key {
            FieldKey::Str(name) => entries.get(&MapKey::Str(name.clone())),
            FieldKey::Atom(name) => entries.get(&MapKey::Atom(name.clone())),
        };
        match lookup {
            Some(value) => current = value,
            None => return Value::Nil,
        }
    }
    current.clone()
}

fn apply_isos(mut value: Value, isos: &[Atom], bindings: &Bindings<'_>) -> Result<Value> {
    for name in isos {
        let pair = bindings.resolve_iso(name)?;
        value = (pair.forward)(&value)?;
    }
    Ok(value)
}
