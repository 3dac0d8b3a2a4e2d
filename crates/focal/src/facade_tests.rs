//! End-to-end scenarios through the public surface.

use serde_json::json;

use crate::{Options, Path, Value, select, select_with, transform, transform_with};

fn users() -> Value {
    Value::from_json(json!({
        "users": [{"name": "a", "age": 3}, {"name": "b", "age": 5}]
    }))
}

fn results() -> Value {
    Value::seq([
        Value::tagged("ok", [Value::Int(1)]),
        Value::tagged("error", [Value::str("x")]),
        Value::tagged("ok", [Value::Int(2)]),
    ])
}

#[test]
fn select_names_of_all_users() {
    assert_eq!(
        select(&users(), "users[*].name").unwrap(),
        Value::seq([Value::str("a"), Value::str("b")])
    );
}

#[test]
fn select_names_of_filtered_users() {
    assert_eq!(
        select(&users(), "users[?age>4].name").unwrap(),
        Value::seq([Value::str("b")])
    );
}

#[test]
fn transform_ages_of_all_users() {
    let out = transform(&users(), "users[*].age", |v| match v {
        Value::Int(n) => Value::Int(n + 1),
        other => other,
    })
    .unwrap();
    assert_eq!(
        out,
        Value::from_json(json!({
            "users": [{"name": "a", "age": 4}, {"name": "b", "age": 6}]
        }))
    );
}

#[test]
fn select_through_converter() {
    let data = Value::from_json(json!({"price": "42"}));
    assert_eq!(select(&data, "price::integer").unwrap(), Value::Int(42));
}

#[test]
fn select_values_of_matching_variants() {
    assert_eq!(
        select(&results(), "[*]:{:ok,v}").unwrap(),
        Value::seq([Value::Int(1), Value::Int(2)])
    );
}

#[test]
fn select_retagged_variants() {
    assert_eq!(
        select(&results(), "[*]:{:ok,v} -> :success").unwrap(),
        Value::seq([
            Value::tagged("success", [Value::Int(1)]),
            Value::tagged("success", [Value::Int(2)]),
        ])
    );
}

#[test]
fn transform_deep_scalar() {
    let data = Value::from_json(json!({"a": {"b": {"c": 10}}}));
    let out = transform(&data, "a.b.c", |v| match v {
        Value::Int(n) => Value::Int(n * 10),
        other => other,
    })
    .unwrap();
    assert_eq!(out, Value::from_json(json!({"a": {"b": {"c": 100}}})));
}

#[test]
fn slice_select_and_transform() {
    let data = Value::seq([Value::Int(1), Value::Int(2), Value::Int(3), Value::Int(4)]);
    assert_eq!(
        select(&data, "[0,2]").unwrap(),
        Value::seq([Value::Int(1), Value::Int(3)])
    );
    let out = transform(&data, "[0,2]", |v| match v {
        Value::Int(n) => Value::Int(-n),
        other => other,
    })
    .unwrap();
    assert_eq!(
        out,
        Value::seq([Value::Int(-1), Value::Int(2), Value::Int(-3), Value::Int(4)])
    );
}

#[test]
fn missing_focus_selects_nil() {
    assert_eq!(select(&users(), "users[9].name").unwrap(), Value::Nil);
}

#[test]
fn parse_error_scenarios() {
    assert_eq!(select(&users(), "users[").unwrap_err().kind(), "parse-error");
    assert_eq!(
        select(&results(), ":{:ok,v} -> :{:tag, z}").unwrap_err().kind(),
        "invalid-output-pattern"
    );
}

#[test]
fn evaluation_error_scenarios() {
    let data = Value::from_json(json!({"foo": 1}));
    assert_eq!(
        select(&data, "foo::unknown").unwrap_err().kind(),
        "unresolved-converter"
    );
    let seq = Value::seq([Value::Int(1)]);
    assert_eq!(
        select(&seq, "[?f(@) == 1]").unwrap_err().kind(),
        "unknown-function"
    );
}

#[test]
fn options_bind_converters_and_functions() {
    let options = Options::new()
        .iso(
            "doubled",
            |v| match v {
                Value::Int(n) => Ok(Value::Int(n * 2)),
                other => Ok(other.clone()),
            },
            |v| match v {
                Value::Int(n) => Ok(Value::Int(n / 2)),
                other => Ok(other.clone()),
            },
        )
        .function("len", |args| match args {
            [Value::Str(s)] => Ok(Value::Int(s.len() as i64)),
            _ => Ok(Value::Nil),
        });

    let data = Value::from_json(json!({"n": 21, "names": ["ab", "abcd"]}));
    assert_eq!(
        select_with(&data, "n::doubled", &options).unwrap(),
        Value::Int(42)
    );
    assert_eq!(
        select_with(&data, "names[?len(@) > 2]", &options).unwrap(),
        Value::seq([Value::str("abcd")])
    );

    let out = transform_with(&data, "n::doubled", &options, |v| match v {
        Value::Int(n) => Value::Int(n + 8),
        other => other,
    })
    .unwrap();
    // 21 -> 42 -> 50 -> 25
    assert_eq!(select(&out, "n").unwrap(), Value::Int(25));
}

#[test]
fn parse_time_bindings_travel_with_the_path() {
    let options = Options::new().iso(
        "shout",
        |v| match v {
            Value::Str(s) => Ok(Value::Str(s.to_uppercase())),
            other => Ok(other.clone()),
        },
        |v| match v {
            Value::Str(s) => Ok(Value::Str(s.to_lowercase())),
            other => Ok(other.clone()),
        },
    );
    let path = Path::parse_with("users[*].name::shout", options).unwrap();
    assert_eq!(
        path.select(&users()).unwrap(),
        Value::seq([Value::str("A"), Value::str("B")])
    );
}

#[test]
fn a_path_parses_once_and_runs_many_times() {
    let path = Path::parse("users[?age>4].name").unwrap();
    assert_eq!(path.select(&users()).unwrap(), Value::seq([Value::str("b")]));

    let other = Value::from_json(json!({
        "users": [{"name": "z", "age": 80}]
    }));
    assert_eq!(path.select(&other).unwrap(), Value::seq([Value::str("z")]));
}

#[test]
fn paths_display_their_optics() {
    let path = Path::parse("users[*].name").unwrap();
    assert_eq!(path.to_string(), r#"seq(one("users") . all . one("name"))"#);
}

#[test]
fn identity_transform_round_trips_every_scenario_path() {
    let data = users();
    for path in ["users", "users[*].age", "users[?age>4]", "users[0,1]", "users[*]"] {
        assert_eq!(transform(&data, path, |v| v).unwrap(), data, "path {path}");
    }
}

#[test]
fn transform_select_round_trip() {
    let data = users();
    let double = |v: Value| match v {
        Value::Int(n) => Value::Int(n * 2),
        other => other,
    };
    let transformed = transform(&data, "users[*].age", double).unwrap();
    let after = select(&transformed, "users[*].age").unwrap();

    let Value::Seq(before) = select(&data, "users[*].age").unwrap() else {
        panic!("sequence");
    };
    let expected = Value::Seq(before.into_iter().map(double).collect());
    assert_eq!(after, expected);
}

#[test]
fn paths_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Path>();
    assert_send_sync::<crate::Optic>();
    assert_send_sync::<Options>();
}
