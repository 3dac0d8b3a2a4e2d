use focal_core::Value;

use super::wrapped::Wrapped;

#[test]
fn into_value_collapses() {
    assert_eq!(Wrapped::None.into_value(), Value::Nil);
    assert_eq!(Wrapped::Single(Value::Int(1)).into_value(), Value::Int(1));

    let many = Wrapped::many([
        Wrapped::Single(Value::Int(1)),
        Wrapped::many([Wrapped::Single(Value::Int(2))]),
    ]);
    assert_eq!(
        many.into_value(),
        Value::seq([Value::Int(1), Value::seq([Value::Int(2)])])
    );
}

#[test]
fn select_propagates_none() {
    let out = Wrapped::None
        .select_with(&mut |v| Ok(Wrapped::Single(v)))
        .unwrap();
    assert!(out.is_none());
}

#[test]
fn select_drops_none_results_from_many() {
    let many = Wrapped::many([
        Wrapped::Single(Value::Int(1)),
        Wrapped::Single(Value::Int(2)),
        Wrapped::Single(Value::Int(3)),
    ]);
    let out = many
        .select_with(&mut |v| {
            Ok(match v {
                Value::Int(n) if n % 2 == 1 => Wrapped::Single(Value::Int(n)),
                _ => Wrapped::None,
            })
        })
        .unwrap();
    assert_eq!(
        out,
        Wrapped::many([Wrapped::Single(Value::Int(1)), Wrapped::Single(Value::Int(3))])
    );
}

#[test]
fn select_splices_nested_many() {
    let many = Wrapped::many([
        Wrapped::Single(Value::seq([Value::Int(1), Value::Int(2)])),
        Wrapped::Single(Value::seq([Value::Int(3)])),
    ]);
    // Fan each sequence out into a Many: results splice flat.
    let out = many
        .select_with(&mut |v| {
            let Value::Seq(items) = v else {
                return Ok(Wrapped::None);
            };
            Ok(Wrapped::many(items.into_iter().map(Wrapped::Single)))
        })
        .unwrap();
    assert_eq!(
        out.into_value(),
        Value::seq([Value::Int(1), Value::Int(2), Value::Int(3)])
    );
}

#[test]
fn select_skips_none_elements_inside_many() {
    let many = Wrapped::many([Wrapped::None, Wrapped::Single(Value::Int(7))]);
    let out = many.select_with(&mut |v| Ok(Wrapped::Single(v))).unwrap();
    assert_eq!(out, Wrapped::many([Wrapped::Single(Value::Int(7))]));
}

#[test]
fn transform_applies_elementwise() {
    let many = Wrapped::many([
        Wrapped::Single(Value::Int(1)),
        Wrapped::many([Wrapped::Single(Value::Int(2))]),
        Wrapped::None,
    ]);
    let out = many
        .transform_with(&mut |v| {
            Ok(match v {
                Value::Int(n) => Value::Int(n * 10),
                other => other,
            })
        })
        .unwrap();
    assert_eq!(
        out,
        Wrapped::many([
            Wrapped::Single(Value::Int(10)),
            Wrapped::many([Wrapped::Single(Value::Int(20))]),
            Wrapped::None,
        ])
    );
}

#[test]
fn transform_propagates_none() {
    let out = Wrapped::None.transform_with(&mut |v| Ok(v)).unwrap();
    assert!(out.is_none());
}
