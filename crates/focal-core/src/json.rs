//! Lossless interop with `serde_json::Value`.
//!
//! Tuples and atoms have no JSON counterpart, so they round-trip through
//! tagged single-key objects: `{"$tuple": [...]}` and `{"$atom": "name"}`.
//! Atom map keys are spelled with a leading colon (`":name"`).

use serde_json::{Number, Value as Json};

use crate::{Atom, MapKey, Value};

impl Value {
    /// Build a value tree from parsed JSON.
    ///
    /// Objects become string-keyed mappings in document order, except for the
    /// tagged `$tuple`/`$atom` shapes produced by [`Value::to_json`]. Object
    /// keys starting with `:` become atom keys.
    pub fn from_json(json: Json) -> Value {
        match json {
            Json::Null => Value::Nil,
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => number_to_value(&n),
            Json::String(s) => Value::Str(s),
            Json::Array(items) => Value::Seq(items.into_iter().map(Value::from_json).collect()),
            Json::Object(mut entries) => {
                if entries.len() == 1 {
                    if let Some(Json::String(name)) = entries.get("$atom") {
                        return Value::Atom(Atom::new(name.clone()));
                    }
                    if let Some(Json::Array(_)) = entries.get("$tuple") {
                        let Some(Json::Array(items)) = entries.remove("$tuple") else {
                            unreachable!("checked above");
                        };
                        return Value::Tuple(items.into_iter().map(Value::from_json).collect());
                    }
                }
                Value::Map(
                    entries
                        .into_iter()
                        .map(|(k, v)| (json_key(k), Value::from_json(v)))
                        .collect(),
                )
            }
        }
    }

    /// Render this value as JSON, inverse of [`Value::from_json`].
    ///
    /// Non-finite floats have no JSON number form and become `null`.
    pub fn to_json(&self) -> Json {
        match self {
            Value::Nil => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            Value::Int(i) => Json::Number(Number::from(*i)),
            Value::Float(x) => Number::from_f64(*x).map_or(Json::Null, Json::Number),
            Value::Str(s) => Json::String(s.clone()),
            Value::Atom(a) => serde_json::json!({ "$atom": a.as_str() }),
            Value::Seq(items) => Json::Array(items.iter().map(Value::to_json).collect()),
            Value::Tuple(items) => {
                serde_json::json!({ "$tuple": items.iter().map(Value::to_json).collect::<Vec<_>>() })
            }
            Value::Map(entries) => Json::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.as_text(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

fn json_key(key: String) -> MapKey {
    match key.strip_prefix(':') {
        Some(name) => MapKey::Atom(Atom::new(name)),
        None => MapKey::Str(key),
    }
}

fn number_to_value(n: &Number) -> Value {
    if let Some(i) = n.as_i64() {
        Value::Int(i)
    } else {
        Value::Float(n.as_f64().unwrap_or(f64::NAN))
    }
}
