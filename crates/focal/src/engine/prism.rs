//! Prism matching and reassembly, shared by select and transform.

use focal_core::{Atom, Value};

use crate::error::{Error, Result};
use crate::optic::{Pattern, Prism};

/// A successful match: trailing elements and the named extractions.
pub(crate) struct Extraction<'v> {
    pub args: &'v [Value],
    /// Name → trailing-element position, in pattern order. Empty for `Rest`
    /// and filter-only patterns.
    pub named: Vec<(&'v Atom, usize)>,
}

/// Match a prism against a value.
///
/// Non-tuples, wrong tags, and wrong arities are all non-matches, never
/// errors.
pub(crate) fn prism_match<'v>(prism: &'v Prism, value: &'v Value) -> Option<Extraction<'v>> {
    let (tag, args) = value.as_tagged()?;
    if *tag != prism.tag {
        return None;
    }
    match &prism.pattern {
        Pattern::Rest => Some(Extraction { args, named: Vec::new() }),
        Pattern::Fields(fields) => {
            if fields.len() != args.len() {
                return None;
            }
            let named = fields
                .iter()
                .enumerate()
                .filter_map(|(pos, field)| field.as_ref().map(|name| (name, pos)))
                .collect();
            Some(Extraction { args, named })
        }
    }
}

/// Select through a prism: `None` on non-match, else the extracted (and
/// possibly retagged/reshaped) value.
pub(crate) fn prism_select_value(prism: &Prism, value: &Value) -> Result<Option<Value>> {
    let Some(extraction) = prism_match(prism, value) else {
        return Ok(None);
    };
    let args = extraction.args;
    let named_values: Vec<&Value> = extraction.named.iter().map(|(_, pos)| &args[*pos]).collect();

    let out = if let Some(output) = &prism.output_pattern {
        let tag = prism.output_tag.as_ref().unwrap_or(&prism.tag);
        let mut items = vec![Value::Atom(tag.clone())];
        for name in output {
            let pos = find_named(&extraction, name)?;
            items.push(args[pos].clone());
        }
        Value::Tuple(items)
    } else if let Some(tag) = &prism.output_tag {
        let mut items = vec![Value::Atom(tag.clone())];
        if extraction.named.is_empty() {
            items.extend(args.iter().cloned());
        } else {
            items.extend(named_values.iter().map(|v| (*v).clone()));
        }
        Value::Tuple(items)
    } else {
        match &prism.pattern {
            Pattern::Rest => Value::Tuple(args.to_vec()),
            Pattern::Fields(_) => match named_values.as_slice() {
                [] => value.clone(),
                [single] => (*single).clone(),
                many => Value::Tuple(many.iter().map(|v| (*v).clone()).collect()),
            },
        }
    };
    Ok(Some(out))
}

pub(crate) fn find_named(extraction: &Extraction<'_>, name: &Atom) -> Result<usize> {
    extraction
        .named
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, pos)| *pos)
        .ok_or_else(|| Error::InvalidOutputPattern {
            name: name.as_str().to_owned(),
        })
}
