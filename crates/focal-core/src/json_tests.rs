use serde_json::json;

use crate::{MapKey, Value};

#[test]
fn from_json_basic_shapes() {
    let v = Value::from_json(json!({
        "users": [{"name": "a", "age": 3}, {"name": "b", "age": 5}]
    }));
    let users = match &v {
        Value::Map(m) => &m[&MapKey::str("users")],
        other => panic!("expected mapping, got {other}"),
    };
    match users {
        Value::Seq(items) => assert_eq!(items.len(), 2),
        other => panic!("expected sequence, got {other}"),
    }
}

#[test]
fn tagged_shapes_round_trip() {
    let original = Value::seq([
        Value::tagged("ok", [Value::Int(1)]),
        Value::atom("pending"),
        Value::map([("k", Value::Nil)]),
    ]);
    let back = Value::from_json(original.to_json());
    assert_eq!(back, original);
}

#[test]
fn atom_keys_round_trip_with_colon_spelling() {
    let original = Value::Map(
        [
            (MapKey::atom("mode"), Value::str("fast")),
            (MapKey::str("plain"), Value::Int(1)),
        ]
        .into_iter()
        .collect(),
    );
    let json = original.to_json();
    assert_eq!(json[":mode"], json!("fast"));
    assert_eq!(Value::from_json(json), original);
}

#[test]
fn numbers_split_into_int_and_float() {
    assert_eq!(Value::from_json(json!(3)), Value::Int(3));
    assert_eq!(Value::from_json(json!(3.5)), Value::Float(3.5));
}

#[test]
fn serialize_matches_to_json() {
    let v = Value::map([("xs", Value::tuple([Value::Int(1), Value::atom("a")]))]);
    let direct = serde_json::to_value(&v).expect("serializable");
    assert_eq!(direct, v.to_json());
}
