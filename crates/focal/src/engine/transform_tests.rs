use focal_core::{MapKey, Value};

use crate::engine::NoopTracer;
use crate::engine::select::select_root;
use crate::engine::transform::transform_root;
use crate::options::Options;
use crate::parser::parse_path;

fn transform(data: &Value, path: &str, f: impl FnMut(Value) -> Value) -> Value {
    try_transform(data, path, f).expect("transform succeeds")
}

fn try_transform(
    data: &Value,
    path: &str,
    mut f: impl FnMut(Value) -> Value,
) -> crate::error::Result<Value> {
    let optic = parse_path(path)?;
    transform_root(&optic, data, None, &mut NoopTracer, &mut |v| Ok(f(v)))
}

fn select(data: &Value, path: &str) -> Value {
    let optic = parse_path(path).expect("valid path");
    select_root(&optic, data, None, &mut NoopTracer)
        .expect("select succeeds")
        .into_value()
}

fn users() -> Value {
    Value::from_json(serde_json::json!({
        "users": [{"name": "a", "age": 3}, {"name": "b", "age": 5}]
    }))
}

fn bump_int(v: Value) -> Value {
    match v {
        Value::Int(n) => Value::Int(n + 1),
        other => other,
    }
}

#[test]
fn updates_every_focus_and_nothing_else() {
    let out = transform(&users(), "users[*].age", bump_int);
    assert_eq!(
        out,
        Value::from_json(serde_json::json!({
            "users": [{"name": "a", "age": 4}, {"name": "b", "age": 6}]
        }))
    );
}

#[test]
fn deep_one_chain() {
    let data = Value::from_json(serde_json::json!({"a": {"b": {"c": 10}}}));
    let out = transform(&data, "a.b.c", |v| match v {
        Value::Int(n) => Value::Int(n * 10),
        other => other,
    });
    assert_eq!(
        out,
        Value::from_json(serde_json::json!({"a": {"b": {"c": 100}}}))
    );
}

#[test]
fn missing_key_leaves_tree_unchanged() {
    let data = users();
    assert_eq!(transform(&data, "users[*].height", bump_int), data);
    assert_eq!(transform(&data, "missing.deeper", bump_int), data);
}

#[test]
fn out_of_range_position_leaves_tree_unchanged() {
    let data = Value::seq([Value::Int(1)]);
    assert_eq!(transform(&data, "[5]", bump_int), data);
    assert_eq!(transform(&data, "[-5]", bump_int), data);
}

#[test]
fn negative_position_updates_from_the_end() {
    let data = Value::seq([Value::Int(1), Value::Int(2), Value::Int(3)]);
    assert_eq!(
        transform(&data, "[-1]", bump_int),
        Value::seq([Value::Int(1), Value::Int(2), Value::Int(4)])
    );
}

#[test]
fn slice_updates_only_listed_positions() {
    let data = Value::seq([Value::Int(1), Value::Int(2), Value::Int(3), Value::Int(4)]);
    let out = transform(&data, "[0,2]", |v| match v {
        Value::Int(n) => Value::Int(-n),
        other => other,
    });
    assert_eq!(
        out,
        Value::seq([Value::Int(-1), Value::Int(2), Value::Int(-3), Value::Int(4)])
    );
}

#[test]
fn all_preserves_container_kind_and_keys() {
    let tuple = Value::tuple([Value::Int(1), Value::Int(2)]);
    assert_eq!(
        transform(&tuple, "[*]", bump_int),
        Value::tuple([Value::Int(2), Value::Int(3)])
    );

    let map = Value::map([("x", Value::Int(1)), ("y", Value::Int(2))]);
    let out = transform(&map, "[*]", bump_int);
    assert_eq!(
        out,
        Value::map([("x", Value::Int(2)), ("y", Value::Int(3))])
    );
}

#[test]
fn filter_transform_preserves_length() {
    let data = Value::seq([Value::Int(1), Value::Int(5), Value::Int(2), Value::Int(7)]);
    let out = transform(&data, "[?@ > 4]", |v| match v {
        Value::Int(n) => Value::Int(n * 100),
        other => other,
    });
    assert_eq!(
        out,
        Value::seq([Value::Int(1), Value::Int(500), Value::Int(2), Value::Int(700)])
    );
    let Value::Seq(items) = &out else { panic!("sequence") };
    assert_eq!(items.len(), 4);
}

#[test]
fn keyed_access_across_a_sequence_keeps_ineligible_elements() {
    let data = Value::seq([
        Value::map([("n", Value::Int(1))]),
        Value::Int(9),
        Value::map([("n", Value::Int(2))]),
    ]);
    let out = transform(&data, "n", bump_int);
    assert_eq!(
        out,
        Value::seq([
            Value::map([("n", Value::Int(2))]),
            Value::Int(9),
            Value::map([("n", Value::Int(3))]),
        ])
    );
}

#[test]
fn identity_transform_returns_equal_tree() {
    let data = users();
    assert_eq!(transform(&data, "users[*].age", |v| v), data);
    assert_eq!(transform(&data, "users[?age>4]", |v| v), data);
    assert_eq!(transform(&data, "users[0,1]", |v| v), data);
}

#[test]
fn transform_then_select_sees_new_values() {
    let out = transform(&users(), "users[*].age", bump_int);
    assert_eq!(
        select(&out, "users[*].age"),
        Value::seq([Value::Int(4), Value::Int(6)])
    );
}

#[test]
fn iso_round_trip_through_converter() {
    let data = Value::map([("price", Value::str("42"))]);
    // Identity through forward/backward leaves the encoding intact.
    assert_eq!(transform(&data, "price::integer", |v| v), data);

    let out = transform(&data, "price::integer", bump_int);
    assert_eq!(out, Value::map([("price", Value::str("43"))]));
}

#[test]
fn prism_transform_sees_extracted_shape() {
    let data = Value::seq([
        Value::tagged("ok", [Value::Int(1)]),
        Value::tagged("error", [Value::str("x")]),
    ]);
    let out = transform(&data, "[*]:{:ok,v}", bump_int);
    assert_eq!(
        out,
        Value::seq([
            Value::tagged("ok", [Value::Int(2)]),
            Value::tagged("error", [Value::str("x")]),
        ])
    );
}

#[test]
fn prism_non_match_is_identity() {
    let data = Value::tagged("error", [Value::str("x")]);
    assert_eq!(transform(&data, ":{:ok,v}", bump_int), data);

    let wrong_arity = Value::tagged("ok", [Value::Int(1), Value::Int(2)]);
    assert_eq!(transform(&wrong_arity, ":{:ok,v}", bump_int), wrong_arity);
}

#[test]
fn prism_multi_name_substitutes_in_place() {
    let data = Value::tagged("pair", [Value::Int(1), Value::str("keep"), Value::Int(2)]);
    let out = transform(&data, ":{:pair,a,_,b}", |v| {
        let Value::Tuple(items) = v else { panic!("tuple shape") };
        // Swap the two extracted values.
        Value::tuple([items[1].clone(), items[0].clone()])
    });
    assert_eq!(
        out,
        Value::tagged("pair", [Value::Int(2), Value::str("keep"), Value::Int(1)])
    );
}

#[test]
fn prism_transform_with_retag() {
    let data = Value::tagged("ok", [Value::Int(1)]);
    let out = transform(&data, ":{:ok,v} -> :success", bump_int);
    assert_eq!(out, Value::tagged("success", [Value::Int(2)]));
}

#[test]
fn prism_rest_transform_may_change_arity() {
    let data = Value::tagged("ok", [Value::Int(1), Value::Int(2)]);
    let out = transform(&data, ":{:ok}", |v| {
        let Value::Tuple(mut items) = v else { panic!("tuple shape") };
        items.push(Value::Int(3));
        Value::Tuple(items)
    });
    assert_eq!(
        out,
        Value::tagged("ok", [Value::Int(1), Value::Int(2), Value::Int(3)])
    );
}

#[test]
fn prism_transform_shape_violation_is_arity_mismatch() {
    let data = Value::tagged("pair", [Value::Int(1), Value::Int(2)]);
    let err = try_transform(&data, ":{:pair,a,b}", |_| Value::Int(0)).expect_err("must fail");
    assert_eq!(err.kind(), "arity-mismatch");

    let err = try_transform(&data, ":{:pair,a,b}", |_| {
        Value::tuple([Value::Int(0)])
    })
    .expect_err("must fail");
    assert_eq!(err.kind(), "arity-mismatch");
}

#[test]
fn filter_only_prism_passes_whole_tuple() {
    let data = Value::tagged("ok", [Value::Int(1), Value::Int(2)]);
    let out = transform(&data, ":{:ok,_,_}", |v| {
        let Value::Tuple(items) = v else { panic!("tuple shape") };
        Value::tuple(items.into_iter().rev().collect::<Vec<_>>())
    });
    assert_eq!(
        out,
        Value::tuple([Value::Int(2), Value::Int(1), Value::atom("ok")])
    );
}

#[test]
fn transform_on_scalar_all_is_identity() {
    assert_eq!(transform(&Value::Int(3), "[*]", bump_int), Value::Int(3));
}

#[test]
fn bad_target_aborts_with_no_partial_result() {
    let err = try_transform(&Value::Int(3), "key", bump_int).expect_err("must fail");
    assert_eq!(err.kind(), "bad-target");
}

#[test]
fn atom_keyed_update() {
    let data = Value::Map(
        [(MapKey::atom("count"), Value::Int(1))].into_iter().collect(),
    );
    let out = transform(&data, ":count", bump_int);
    assert_eq!(
        out,
        Value::Map([(MapKey::atom("count"), Value::Int(2))].into_iter().collect())
    );
}

#[test]
fn options_bound_converter_applies_around_the_leaf() {
    let options = Options::new().iso(
        "celsius",
        |v| match v {
            Value::Int(f) => Ok(Value::Int((f - 32) * 5 / 9)),
            other => Ok(other.clone()),
        },
        |v| match v {
            Value::Int(c) => Ok(Value::Int(c * 9 / 5 + 32)),
            other => Ok(other.clone()),
        },
    );
    let data = Value::map([("temp", Value::Int(212))]);
    let optic = parse_path("temp::celsius").unwrap();
    let out = transform_root(&optic, &data, Some(&options), &mut NoopTracer, &mut |v| {
        Ok(match v {
            Value::Int(c) => Value::Int(c - 100),
            other => other,
        })
    })
    .unwrap();
    // 212F -> 100C -> 0C -> 32F
    assert_eq!(out, Value::map([("temp", Value::Int(32))]));
}
