use robolang::compile;

fn lines(source: &str) -> Vec<String> {
    compile(source)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn if_with_empty_body_emits_jump_and_label() {
    assert_eq!(
        compile("if string.IsNullOrEmpty('b') {}").unwrap(),
        "jump label ➜ifend if ⊂System.String.IsNullOrEmpty(\"b\")⊃\n➜ifend"
    );
    assert_eq!(
        compile("if string.Empty == '' {}").unwrap(),
        "jump label ➜ifend if ⊂System.String.Empty==\"\"⊃\n➜ifend"
    );
}

#[test]
fn if_body_sits_between_jump_and_label() {
    assert_eq!(
        lines("x = 1 if x < 2 { x = 3 }"),
        vec!["♥x=1", "jump label ➜ifend if ♥x<2", "♥x=3", "➜ifend"]
    );
}

#[test]
fn if_else_adds_an_unconditional_jump() {
    assert_eq!(
        lines("x = 1 if x < 2 { x = 3 } else { x = 4 }"),
        vec![
            "♥x=1",
            "jump label ➜ifelse if ♥x<2",
            "♥x=3",
            "jump label ➜ifend",
            "➜ifelse",
            "♥x=4",
            "➜ifend",
        ]
    );
}

#[test]
fn else_if_chains_without_extra_blocks() {
    assert_eq!(
        lines("x = 1 if x < 0 { x = 0 } else if x < 10 { x = 10 }"),
        vec![
            "♥x=1",
            "jump label ➜ifelse if ♥x<0",
            "♥x=0",
            "jump label ➜ifend",
            "➜ifelse",
            "jump label ➜ifend2 if ♥x<10",
            "♥x=10",
            "➜ifend2",
            "➜ifend",
        ]
    );
}

#[test]
fn sibling_ifs_get_distinct_labels() {
    assert_eq!(
        lines("x = 1 if x < 2 {} if x < 3 {}"),
        vec![
            "♥x=1",
            "jump label ➜ifend if ♥x<2",
            "➜ifend",
            "jump label ➜ifend2 if ♥x<3",
            "➜ifend2",
        ]
    );
}

#[test]
fn while_loops_between_entry_and_exit_labels() {
    assert_eq!(
        lines("x = 0 while x < 3 { x += 1 }"),
        vec![
            "♥x=0",
            "➜while",
            "jump label ➜whileend if ♥x<3",
            "♥x=♥x+1",
            "jump label ➜while",
            "➜whileend",
        ]
    );
}

#[test]
fn while_condition_commands_rerun_each_pass() {
    assert_eq!(
        lines("while dialog.ask('go?') == 'y' { mouse.click() }"),
        vec![
            "➜while",
            "dialog.ask message ‴go?‴ result ♥tmp1",
            "jump label ➜whileend if ⊂♥tmp1==\"y\"⊃",
            "mouse.click",
            "jump label ➜while",
            "➜whileend",
        ]
    );
}

#[test]
fn nested_loops_and_ifs_compose() {
    assert_eq!(
        lines("x = 0 while x < 2 { if x == 0 { x = 1 } x += 1 }"),
        vec![
            "♥x=0",
            "➜while",
            "jump label ➜whileend if ♥x<2",
            "jump label ➜ifend if ♥x==0",
            "♥x=1",
            "➜ifend",
            "♥x=♥x+1",
            "jump label ➜while",
            "➜whileend",
        ]
    );
}

#[test]
fn condition_must_be_bool() {
    assert_eq!(compile("if 1 {}").unwrap_err().kind(), "implicit-conversion");
    assert_eq!(
        compile("if int.Parse('1') {}").unwrap_err().kind(),
        "implicit-conversion"
    );
    assert_eq!(
        compile("while 'x' {}").unwrap_err().kind(),
        "implicit-conversion"
    );
}

#[test]
fn assignments_inside_conditions_run_before_the_jump() {
    assert_eq!(
        lines("x = 0 if (x = 1) == 1 { x = 2 }"),
        vec![
            "♥x=0",
            "♥x=1",
            "jump label ➜ifend if ♥x==1",
            "♥x=2",
            "➜ifend",
        ]
    );
}
