use robolang::compile;

fn kind(source: &str) -> &'static str {
    compile(source).unwrap_err().kind()
}

#[test]
fn lexer_errors() {
    assert_eq!(kind("x = 'oops"), "unterminated-string");
    assert_eq!(kind("/* left open"), "unterminated-comment");
    assert_eq!(kind("123abc = 1"), "invalid-identifier-start");
    assert_eq!(kind("x = 1.2.3"), "invalid-number");
    assert_eq!(kind("x = 99999999999999999999"), "invalid-number");
    assert_eq!(kind("x = #"), "unrecognized-character");
}

#[test]
fn parser_errors() {
    assert_eq!(kind("x = * 2"), "missing-left-operand");
    assert_eq!(kind("x = 2 +"), "missing-right-operand");
    assert_eq!(kind("x = ()"), "paren-group-count");
    assert_eq!(kind("print('a',)"), "dangling-separator");
    assert_eq!(kind("print(text: 'a', 'b')"), "positional-after-named");
    assert_eq!(kind("x = 1 }"), "unexpected-token");
    assert_eq!(kind("1 = 2"), "unexpected-token");
}

#[test]
fn scope_errors() {
    assert_eq!(kind("x = y"), "unassigned-variable");
    assert_eq!(kind("x = null"), "null-inference");
    assert_eq!(kind("int = 5"), "read-only-assignment");
}

#[test]
fn command_errors() {
    assert_eq!(kind("foo.bar()"), "unknown-command-family");
    assert_eq!(kind("mouse.jiggle()"), "unknown-command");
    assert_eq!(kind("mouse.move(x: 1, y: 2, z: 3)"), "unknown-argument");
    assert_eq!(kind("mouse.move(1)"), "missing-argument");
    assert_eq!(kind("delay(seconds: 1, millis: 2)"), "conflicting-arguments");
    assert_eq!(kind("print('a', 'b')"), "too-many-arguments");
    assert_eq!(kind("a.b.c()"), "multi-level-family");
}

#[test]
fn type_errors() {
    assert_eq!(kind("x = 1 x = 'a'"), "implicit-conversion");
    assert_eq!(kind("x = true + 1"), "invalid-operation");
    assert_eq!(kind("x = Rectangle.Lorem"), "missing-member");
    assert_eq!(kind("Rectangle.Empty = 1"), "member-not-writable");
    assert_eq!(kind("x = int.Parse(true)"), "no-matching-overload");
    assert_eq!(kind("x = string.IsNullOrEmpty(1)"), "parameter-conversion");
    assert_eq!(kind("x = mouse.click()"), "value-of-void");
    assert_eq!(kind("y = (a.b = 1)"), "cannot-assign-to");
}

#[test]
fn catalog_errors_carry_no_source_span() {
    use robolang::catalog::CommandCatalog;
    let mut cat = CommandCatalog::builtin();
    let err = cat
        .merge_toml("broken = [", std::path::Path::new("cmd.toml"))
        .unwrap_err();
    assert_eq!(err.kind(), "catalog");
    assert!(err.span().is_none());
}

#[test]
fn messages_name_the_offender() {
    let err = compile("x = y").unwrap_err();
    assert!(err.to_string().contains('y'));
    let err = compile("mouse.jiggle()").unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("jiggle") && msg.contains("mouse"));
}

#[test]
fn spans_point_into_the_source() {
    let source = "x = 1\ny = z";
    let err = compile(source).unwrap_err();
    let span = err.span().unwrap();
    assert_eq!(&source[span.start..span.end], "z");
}
