use insta::assert_snapshot;

use super::parse_path;

fn dump(source: &str) -> String {
    parse_path(source).expect("valid path").to_string()
}

fn fail(source: &str) -> crate::Error {
    parse_path(source).expect_err("must fail")
}

#[test]
fn keys_and_chains() {
    assert_snapshot!(dump("users"), @r#"one("users")"#);
    assert_snapshot!(dump("a.b.c"), @r#"seq(one("a") . one("b") . one("c"))"#);
    assert_snapshot!(dump(":meta.name"), @r#"seq(one(:meta) . one("name"))"#);
    assert_snapshot!(dump("'weird key'.x"), @r#"seq(one("weird key") . one("x"))"#);
}

#[test]
fn keywords_are_ordinary_keys() {
    assert_snapshot!(dump("not.true"), @r#"seq(one("not") . one("true"))"#);
}

#[test]
fn brackets() {
    assert_snapshot!(dump("users[*].name"), @r#"seq(one("users") . all . one("name"))"#);
    assert_snapshot!(dump("[0]"), @"one(0)");
    assert_snapshot!(dump("[-1]"), @"one(-1)");
    assert_snapshot!(dump("[0,2]"), @"slice(0, 2)");
    assert_snapshot!(dump("[name,age]"), @r#"slice("name", "age")"#);
    assert_snapshot!(dump("['a b','c']"), @r#"slice("a b", "c")"#);
    assert_snapshot!(dump("[:a,:b]"), @"slice(:a, :b)");
}

#[test]
fn dot_is_optional_before_brackets_and_colons() {
    assert_eq!(dump("users[0]"), dump("users.[0]"));
    assert_eq!(dump("point:x"), dump("point.:x"));
}

#[test]
fn filters() {
    assert_snapshot!(dump("users[?age>4].name"),
        @r#"seq(one("users") . filter(@.age > 4) . one("name"))"#);
    assert_snapshot!(dump("[?not disabled and age >= 18]"),
        @"filter(not @.disabled and @.age >= 18)");
}

#[test]
fn converters() {
    assert_snapshot!(dump("price::integer"), @r#"seq(one("price") . iso(:integer))"#);
    assert_snapshot!(dump("blob::base64::json"),
        @r#"seq(one("blob") . iso(:base64) . iso(:json))"#);
}

#[test]
fn prisms() {
    assert_snapshot!(dump("[*]:{:ok,v}"), @"seq(all . prism(:ok, [v]))");
    assert_snapshot!(dump(":{:ok}"), @"prism(:ok, ...)");
    assert_snapshot!(dump(":{:ok, ...}"), @"prism(:ok, ...)");
    assert_snapshot!(dump(":{:pair,_,snd}"), @"prism(:pair, [_, snd])");
    assert_snapshot!(dump(":{:ok,v} -> :success"), @"prism(:ok, [v] -> :success)");
    assert_snapshot!(dump(":{:err,code,msg} -> :{:fail, msg, code}"),
        @"prism(:err, [code, msg] -> :fail [msg, code])");
    assert_snapshot!(dump(":{:ok,v} -> :{:done, ...}"), @"prism(:ok, [v] -> :done)");
}

#[test]
fn single_component_paths_stay_bare() {
    assert_snapshot!(dump("[*]"), @"all");
    assert_snapshot!(dump("[?age>4]"), @"filter(@.age > 4)");
}

#[test]
fn unterminated_bracket() {
    let err = fail("users[");
    assert_eq!(err.kind(), "parse-error");
}

#[test]
fn empty_brackets() {
    let err = fail("users[]");
    assert_eq!(err.kind(), "parse-error");
    assert!(err.to_string().contains("empty brackets"));
}

#[test]
fn trailing_garbage() {
    assert_eq!(fail("users]").kind(), "parse-error");
    assert_eq!(fail("a.b)").kind(), "parse-error");
}

#[test]
fn empty_path() {
    assert_eq!(fail("").kind(), "parse-error");
    assert_eq!(fail("   ").kind(), "parse-error");
}

#[test]
fn dangling_dot() {
    assert_eq!(fail("users.").kind(), "parse-error");
}

#[test]
fn bad_prism_bodies() {
    assert_eq!(fail(":{ok}").kind(), "parse-error");
    assert_eq!(fail(":{:ok,}").kind(), "parse-error");
    assert_eq!(fail(":{:ok,v} ->").kind(), "parse-error");
}

#[test]
fn output_pattern_must_use_extracted_names() {
    let err = fail(":{:ok,v} -> :{:tag, z}");
    assert_eq!(err.kind(), "invalid-output-pattern");

    // Rest patterns extract no names, so any output name is invalid.
    let err = fail(":{:ok} -> :{:tag, v}");
    assert_eq!(err.kind(), "invalid-output-pattern");
}

#[test]
fn parse_errors_render_with_a_snippet() {
    let source = "users[";
    let err = fail(source);
    let rendered = err.render(source);
    assert!(rendered.contains("users["));
    assert!(rendered.contains('^'));
}
