//! Built-in converter catalogue.
//!
//! Converters referenced as `::name` in paths and filters resolve here when
//! neither the call options nor the path's parse-time bindings cover them.
//! Wrong structural kinds raise `bad-target`; unparseable content raises
//! `conversion`.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use focal_core::{Atom, Value};

use crate::error::{Error, Result};
use crate::options::IsoPair;

/// Names the catalogue answers for, sorted; listed in resolution errors.
pub const BUILTIN_NAMES: &[&str] = &["atom", "base64", "float", "integer", "json", "string"];

/// Look up a built-in converter pair by name.
pub fn builtin(name: &str) -> Option<IsoPair> {
    match name {
        "atom" => Some(atom()),
        "base64" => Some(base64_text()),
        "float" => Some(float()),
        "integer" => Some(integer()),
        "json" => Some(json()),
        "string" => Some(string()),
        _ => None,
    }
}

fn bad_target(name: &'static str, value: &Value) -> Error {
    Error::BadTarget {
        optic: name.to_owned(),
        kind: value.kind_name(),
    }
}

fn conversion(name: &'static str, message: impl Into<String>) -> Error {
    Error::Conversion {
        name: name.to_owned(),
        message: message.into(),
    }
}

/// `"42"` ↔ `42`. Integers pass through forward.
fn integer() -> IsoPair {
    IsoPair::new(
        |v| match v {
            Value::Str(s) => s
                .trim()
                .parse()
                .map(Value::Int)
                .map_err(|_| conversion("integer", format!("{s:?} is not an integer"))),
            Value::Int(_) => Ok(v.clone()),
            other => Err(bad_target("integer", other)),
        },
        |v| match v {
            Value::Int(i) => Ok(Value::Str(i.to_string())),
            Value::Str(_) => Ok(v.clone()),
            other => Err(bad_target("integer", other)),
        },
    )
}

/// `"4.5"` ↔ `4.5`. Numbers pass through forward; integers widen.
fn float() -> IsoPair {
    IsoPair::new(
        |v| match v {
            Value::Str(s) => s
                .trim()
                .parse()
                .map(Value::Float)
                .map_err(|_| conversion("float", format!("{s:?} is not a number"))),
            Value::Float(_) => Ok(v.clone()),
            Value::Int(i) => Ok(Value::Float(*i as f64)),
            other => Err(bad_target("float", other)),
        },
        |v| match v {
            Value::Float(x) => Ok(Value::Str(format!("{x:?}"))),
            Value::Int(i) => Ok(Value::Str(i.to_string())),
            Value::Str(_) => Ok(v.clone()),
            other => Err(bad_target("float", other)),
        },
    )
}

/// Anything → its display text. Backward is the identity: the original
/// rendering cannot be recovered, so `string` is only round-trippable for
/// string inputs.
fn string() -> IsoPair {
    IsoPair::new(
        |v| Ok(Value::Str(v.to_text())),
        |v| Ok(v.clone()),
    )
}

/// `"ok"` ↔ `:ok`.
fn atom() -> IsoPair {
    IsoPair::new(
        |v| match v {
            Value::Str(s) => Ok(Value::Atom(Atom::new(s.clone()))),
            Value::Atom(_) => Ok(v.clone()),
            other => Err(bad_target("atom", other)),
        },
        |v| match v {
            Value::Atom(a) => Ok(Value::Str(a.as_str().to_owned())),
            Value::Str(_) => Ok(v.clone()),
            other => Err(bad_target("atom", other)),
        },
    )
}

/// JSON text ↔ value tree.
fn json() -> IsoPair {
    IsoPair::new(
        |v| match v {
            Value::Str(s) => serde_json::from_str(s)
                .map(Value::from_json)
                .map_err(|e| conversion("json", e.to_string())),
            other => Err(bad_target("json", other)),
        },
        |v| {
            serde_json::to_string(&v.to_json())
                .map(Value::Str)
                .map_err(|e| conversion("json", e.to_string()))
        },
    )
}

/// Base64 text ↔ the UTF-8 string it encodes.
fn base64_text() -> IsoPair {
    IsoPair::new(
        |v| match v {
            Value::Str(s) => {
                let bytes = STANDARD
                    .decode(s.trim())
                    .map_err(|e| conversion("base64", e.to_string()))?;
                String::from_utf8(bytes)
                    .map(Value::Str)
                    .map_err(|e| conversion("base64", e.to_string()))
            }
            other => Err(bad_target("base64", other)),
        },
        |v| match v {
            Value::Str(s) => Ok(Value::Str(STANDARD.encode(s.as_bytes()))),
            other => Err(bad_target("base64", other)),
        },
    )
}
