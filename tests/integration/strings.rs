use robolang::compile;

fn out(source: &str) -> String {
    compile(source).unwrap()
}

#[test]
fn plain_strings_use_raw_delimiters() {
    assert_eq!(out("x = 'hi there'"), "♥x=‴hi there‴");
    assert_eq!(out("x = \"hi there\""), "♥x=‴hi there‴");
    assert_eq!(out("x = ''"), "♥x=‴‴");
}

#[test]
fn strings_needing_escapes_fall_back_to_native() {
    assert_eq!(out(r#"x = "a\"b""#), "♥x=⊂\"a\\\"b\"⊃");
    assert_eq!(out(r"x = 'a\nb'"), "♥x=⊂\"a\\nb\"⊃");
    assert_eq!(out(r"x = 'a\tb'"), "♥x=⊂\"a\\tb\"⊃");
    assert_eq!(out(r"x = 'back\\slash'"), "♥x=⊂\"back\\\\slash\"⊃");
}

#[test]
fn single_quoted_strings_may_hold_double_quotes() {
    // the literal contains a double quote, so it renders natively escaped
    assert_eq!(out("x = 'say \"hi\"'"), "♥x=⊂\"say \\\"hi\\\"\"⊃");
}

#[test]
fn concatenation_renders_as_a_native_snippet() {
    assert_eq!(out("x = 'a' + 'b'"), "♥x=⊂\"a\"+\"b\"⊃");
    assert_eq!(out("s = 'a' t = s + 'b'"), "♥s=‴a‴\n♥t=⊂♥s+\"b\"⊃");
}

#[test]
fn string_comparison_is_native_and_yields_bool() {
    assert_eq!(out("b = 'a' == 'b'"), "♥b=⊂\"a\"==\"b\"⊃");
    assert_eq!(out("b = 'a' != 'b'"), "♥b=⊂\"a\"!=\"b\"⊃");
    // the result really is a bool
    assert_eq!(
        out("b = 'a' == 'b' c = true c = b"),
        "♥b=⊂\"a\"==\"b\"⊃\n♥c=true\n♥c=♥b"
    );
}

#[test]
fn string_arithmetic_beyond_concat_is_rejected() {
    assert_eq!(compile("x = 'a' - 'b'").unwrap_err().kind(), "invalid-operation");
    assert_eq!(compile("x = 'a' + 1").unwrap_err().kind(), "invalid-operation");
    assert_eq!(compile("b = 'a' < 'b'").unwrap_err().kind(), "invalid-operation");
}

#[test]
fn instance_members_on_string_values() {
    assert_eq!(out("s = 'abc' n = s.Length"), "♥s=‴abc‴\n♥n=⊂♥s.Length⊃");
    assert_eq!(out("s = 'abc' u = s.ToUpper()"), "♥s=‴abc‴\n♥u=⊂♥s.ToUpper()⊃");
}

#[test]
fn unterminated_literals_fail_in_the_lexer() {
    assert_eq!(compile("x = 'oops").unwrap_err().kind(), "unterminated-string");
    assert_eq!(compile("x = \"oops\ny = 1").unwrap_err().kind(), "unterminated-string");
}
