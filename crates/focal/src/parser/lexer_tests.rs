use super::lexer::{TokenKind, lex, token_text, unescape};

fn kinds(source: &str) -> Vec<TokenKind> {
    lex(source).expect("lexes").iter().map(|t| t.kind).collect()
}

#[test]
fn path_tokens() {
    use TokenKind::*;
    assert_eq!(
        kinds("users[*].name"),
        vec![Ident, LBracket, Star, RBracket, Dot, Ident]
    );
    assert_eq!(kinds("price::integer"), vec![Ident, ColonColon, Ident]);
    assert_eq!(
        kinds(":{:ok,v} -> :success"),
        vec![ColonBrace, Colon, Ident, Comma, Ident, RBrace, Arrow, Colon, Ident]
    );
}

#[test]
fn comparison_tokens_prefer_longest_match() {
    use TokenKind::*;
    assert_eq!(kinds("<= < >= > == != ~~ !~"), vec![
        LtEq, Lt, GtEq, Gt, EqEq, BangEq, TildeTilde, BangTilde
    ]);
    assert_eq!(kinds("::"), vec![ColonColon]);
    assert_eq!(kinds(":{"), vec![ColonBrace]);
    assert_eq!(kinds("..."), vec![Ellipsis]);
}

#[test]
fn keywords_lose_to_longer_identifiers() {
    use TokenKind::*;
    assert_eq!(kinds("and android or ore not note"), vec![
        KwAnd, Ident, KwOr, Ident, KwNot, Ident
    ]);
    assert_eq!(kinds("nil nilly true truthy"), vec![KwNil, Ident, KwTrue, Ident]);
}

#[test]
fn numbers() {
    use TokenKind::*;
    assert_eq!(kinds("42 -7 4.5 -0.5"), vec![Int, Int, Float, Float]);
    // A trailing dot is a separator, not part of the number.
    assert_eq!(kinds("1.name"), vec![Int, Dot, Ident]);
}

#[test]
fn strings_and_spans() {
    let tokens = lex(r#"a['k 1']"#).expect("lexes");
    assert_eq!(tokens[2].kind, TokenKind::Str);
    assert_eq!(token_text(r#"a['k 1']"#, &tokens[2]), "'k 1'");
}

#[test]
fn unterminated_string_is_a_parse_error() {
    let err = lex("name == 'oops").expect_err("must fail");
    assert_eq!(err.kind(), "parse-error");
    assert!(err.to_string().contains("unterminated"));
}

#[test]
fn unrecognized_character_is_a_parse_error() {
    let err = lex("a § b").expect_err("must fail");
    assert_eq!(err.kind(), "parse-error");
}

#[test]
fn unescape_handles_quotes_and_controls() {
    assert_eq!(unescape(r#""a\"b""#), "a\"b");
    assert_eq!(unescape(r"'a\'b'"), "a'b");
    assert_eq!(unescape(r#""line\nbreak""#), "line\nbreak");
    assert_eq!(unescape(r#""back\\slash""#), "back\\slash");
}

#[test]
fn whitespace_is_insignificant() {
    assert_eq!(kinds("a . b"), kinds("a.b"));
    assert_eq!(kinds("age  >  4"), kinds("age>4"));
}
