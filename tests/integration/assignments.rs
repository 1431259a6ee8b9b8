use robolang::compile;

fn lines(source: &str) -> Vec<String> {
    compile(source)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

fn err_kind(source: &str) -> &'static str {
    compile(source).unwrap_err().kind()
}

#[test]
fn integer_assignment() {
    assert_eq!(compile("x=1").unwrap(), "♥x=1");
    assert_eq!(compile("x = 1").unwrap(), "♥x=1");
    assert_eq!(compile("\tx   =\t\t  1   ").unwrap(), "♥x=1");
}

#[test]
fn float_forms_normalize_in_output() {
    assert_eq!(compile("x = 1.0").unwrap(), "♥x=1.0");
    assert_eq!(compile("x = 1.").unwrap(), "♥x=1.0");
    assert_eq!(compile("x = .0").unwrap(), "♥x=0.0");
    assert_eq!(compile("x = 1F").unwrap(), "♥x=1.0");
    assert_eq!(compile("x = 1.0f").unwrap(), "♥x=1.0");
    assert_eq!(compile("x = .5").unwrap(), "♥x=0.5");
}

#[test]
fn string_assignment_uses_raw_quoting() {
    assert_eq!(compile("x = \"foo\"").unwrap(), "♥x=‴foo‴");
    assert_eq!(compile("x = 'foo'").unwrap(), "♥x=‴foo‴");
}

#[test]
fn boolean_assignment() {
    assert_eq!(compile("x = true").unwrap(), "♥x=true");
    assert_eq!(compile("x = false").unwrap(), "♥x=false");
}

#[test]
fn null_needs_an_established_type() {
    assert_eq!(err_kind("x = null"), "null-inference");
    assert_eq!(lines("s = 'a' s = null"), vec!["♥s=‴a‴", "♥s=null"]);
}

#[test]
fn compound_assignment_expands_to_read_modify_write() {
    assert_eq!(
        lines("x = 4 y = 0.0 y += .5 * x"),
        vec!["♥x=4", "♥y=0.0", "♥y=♥y+0.5*♥x"]
    );
    assert_eq!(lines("x = 6 x /= 2"), vec!["♥x=6", "♥x=♥x/2"]);
}

#[test]
fn chained_assignment_runs_inner_first() {
    assert_eq!(lines("a = b = 1"), vec!["♥b=1", "♥a=♥b"]);
}

#[test]
fn steps_desugar_to_assignments() {
    assert_eq!(lines("x = 1 x++"), vec!["♥x=1", "♥x=♥x+1"]);
    assert_eq!(lines("x = 1 --x"), vec!["♥x=1", "♥x=♥x-1"]);
}

#[test]
fn postfix_step_in_value_runs_after() {
    assert_eq!(lines("x = 1 y = x++"), vec!["♥x=1", "♥y=♥x", "♥x=♥x+1"]);
    assert_eq!(lines("x = 1 y = ++x"), vec!["♥x=1", "♥x=♥x+1", "♥y=♥x"]);
}

#[test]
fn reassignment_must_keep_the_type() {
    assert_eq!(err_kind("x = 1 x = 'a'"), "implicit-conversion");
    assert_eq!(err_kind("x = 1 x = 1.5"), "implicit-conversion");
    assert_eq!(lines("x = 1.5 x = 2"), vec!["♥x=1.5", "♥x=2"]);
}

#[test]
fn reading_before_writing_fails() {
    assert_eq!(err_kind("x = x + 1"), "unassigned-variable");
    assert_eq!(err_kind("x = y"), "unassigned-variable");
    assert_eq!(err_kind("x++"), "unassigned-variable");
    assert_eq!(err_kind("a.X = 1"), "unassigned-variable");
}

#[test]
fn type_names_cannot_be_rebound() {
    assert_eq!(err_kind("int = 5"), "read-only-assignment");
}

#[test]
fn statement_without_effect_is_rejected() {
    assert_eq!(err_kind("x = 1 x"), "unexpected-token");
    assert_eq!(err_kind("1 + 2"), "unexpected-token");
}
