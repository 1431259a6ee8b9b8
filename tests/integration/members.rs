use robolang::catalog::{host, CommandCatalog, HostCatalog, HostType, Property};
use robolang::{compile, compile_with};

fn out(source: &str) -> String {
    compile(source).unwrap()
}

fn err_kind(source: &str) -> &'static str {
    compile(source).unwrap_err().kind()
}

#[test]
fn static_property_read_expands_the_type_name() {
    assert_eq!(
        out("x = Rectangle.Empty"),
        "♥x=⊂System.Drawing.Rectangle.Empty⊃"
    );
    assert_eq!(out("s = string.Empty"), "♥s=⊂System.String.Empty⊃");
}

#[test]
fn static_method_call_renders_inline() {
    assert_eq!(out("x = int.Parse('1')"), "♥x=⊂System.Int32.Parse(\"1\")⊃");
    assert_eq!(
        out("x = int.Parse('ff', 16)"),
        "♥x=⊂System.Int32.Parse(\"ff\", 16)⊃"
    );
    assert_eq!(
        out("b = string.IsNullOrEmpty('b')"),
        "♥b=⊂System.String.IsNullOrEmpty(\"b\")⊃"
    );
}

#[test]
fn instance_property_read_goes_through_the_variable() {
    assert_eq!(
        out("screen = Rectangle.Empty w = screen.Width"),
        "♥screen=⊂System.Drawing.Rectangle.Empty⊃\n♥w=⊂♥screen.Width⊃"
    );
}

#[test]
fn instance_property_write_rebuilds_the_value() {
    assert_eq!(
        out("screen = Rectangle.Empty screen.X = 1"),
        "♥screen=⊂System.Drawing.Rectangle.Empty⊃\n\
         ♥screen=⊂new Func<System.Drawing.Rectangle, System.Drawing.Rectangle>\
         ((System.Drawing.Rectangle _)=>{_.X=1;return _;})(♥screen)⊃"
    );
}

#[test]
fn void_instance_call_writes_the_receiver_back() {
    assert_eq!(
        out("screen = Rectangle.Empty screen.Inflate(screen.Size)"),
        "♥screen=⊂System.Drawing.Rectangle.Empty⊃\n\
         ♥screen=⊂new Func<System.Drawing.Rectangle, System.Drawing.Size, System.Drawing.Rectangle>\
         ((System.Drawing.Rectangle _, System.Drawing.Size a1)=>\
         {_.Inflate(a1);return _;})(♥screen, ♥screen.Size)⊃"
    );
}

#[test]
fn void_call_through_a_property_chain() {
    assert_eq!(
        out("screen = Rectangle.Empty screen.Location.Offset(screen.Location)"),
        "♥screen=⊂System.Drawing.Rectangle.Empty⊃\n\
         ♥screen=⊂new Func<System.Drawing.Rectangle, System.Drawing.Point, System.Drawing.Rectangle>\
         ((System.Drawing.Rectangle _, System.Drawing.Point a1)=>\
         {_.Location.Offset(a1);return _;})(♥screen, ♥screen.Location)⊃"
    );
}

#[test]
fn void_overload_picks_by_argument_types() {
    assert_eq!(
        out("screen = Rectangle.Empty screen.Inflate(2, 3)"),
        "♥screen=⊂System.Drawing.Rectangle.Empty⊃\n\
         ♥screen=⊂new Func<System.Drawing.Rectangle, System.Int32, System.Int32, System.Drawing.Rectangle>\
         ((System.Drawing.Rectangle _, System.Int32 a1, System.Int32 a2)=>\
         {_.Inflate(a1, a2);return _;})(♥screen, 2, 3)⊃"
    );
}

#[test]
fn void_result_cannot_be_assigned() {
    assert_eq!(
        err_kind("screen = Rectangle.Empty x = screen.Inflate(screen.Size)"),
        "value-of-void"
    );
}

#[test]
fn unknown_member_is_reported() {
    assert_eq!(err_kind("x = Rectangle.Lorem"), "missing-member");
    assert_eq!(err_kind("x = string.LoremIpsum()"), "missing-member");
    assert_eq!(err_kind("n = 1 x = n.Lorem"), "missing-member");
}

#[test]
fn instance_member_through_a_type_name_is_missing() {
    assert_eq!(err_kind("x = Rectangle.Width"), "missing-member");
    assert_eq!(err_kind("x = string.Length"), "missing-member");
}

#[test]
fn static_member_through_a_value_is_missing() {
    assert_eq!(err_kind("s = 'a' x = s.Empty"), "missing-member");
}

#[test]
fn overload_resolution_errors() {
    // one candidate with the right arity but a bad parameter type
    assert_eq!(err_kind("x = string.IsNullOrEmpty(1)"), "parameter-conversion");
    // several candidates, none fits
    assert_eq!(err_kind("x = int.Parse(true)"), "no-matching-overload");
}

#[test]
fn member_write_checks_the_value_type() {
    assert_eq!(
        err_kind("screen = Rectangle.Empty screen.X = 'a'"),
        "implicit-conversion"
    );
}

#[test]
fn static_properties_are_not_writable() {
    assert_eq!(err_kind("Rectangle.Empty = 1"), "member-not-writable");
}

#[test]
fn write_only_members_reject_reads() {
    let mut catalog = HostCatalog::builtin();
    catalog.add(HostType {
        name: "Clipboard".into(),
        full_name: "App.Clipboard".into(),
        allows_null: false,
        properties: vec![Property {
            name: "Contents".into(),
            ty: host::STRING,
            is_static: false,
            readable: false,
            writable: true,
        }],
        methods: vec![],
    });
    let mut commands = CommandCatalog::builtin();
    commands
        .merge_toml(
            r#"
            [[family.clipboard.command]]
            name = "get"
            result = "Clipboard"
            "#,
            std::path::Path::new("clipboard.toml"),
        )
        .unwrap();

    assert_eq!(
        compile_with("c = clipboard.get() x = c.Contents", &catalog, &commands)
            .unwrap_err()
            .kind(),
        "member-not-readable"
    );
    // writing through the same member stays legal
    assert_eq!(
        compile_with("c = clipboard.get() c.Contents = 'x'", &catalog, &commands).unwrap(),
        "clipboard.get result ♥c\n\
         ♥c=⊂new Func<App.Clipboard, App.Clipboard>\
         ((App.Clipboard _)=>{_.Contents=\"x\";return _;})(♥c)⊃"
    );
}

#[test]
fn bare_type_name_is_not_a_value() {
    assert_eq!(err_kind("x = Rectangle"), "unexpected-token");
}

#[test]
fn int_promotes_into_float_parameters() {
    assert_eq!(out("x = float.Parse('1.5')"), "♥x=⊂System.Double.Parse(\"1.5\")⊃");
}
