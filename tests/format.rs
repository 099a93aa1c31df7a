use rex::{compile, compile_format};

#[test]
fn scenario_8_template_with_two_groups() {
    let p = compile(r"(\w+) (\w+)", false).unwrap();
    let m = p.find(b"x y", 0).unwrap();
    let rendered = compile_format("<1>-<2>").unwrap().render(&m);
    assert_eq!(rendered, "x-y");
}

#[test]
fn whole_match_round_trip() {
    let p = compile(r"\d+", false).unwrap();
    let m = p.find(b"abc42", 0).unwrap();
    assert_eq!(compile_format("<0>").unwrap().render(&m), m.value());
}

#[test]
fn group_one_round_trip() {
    let p = compile(r"(\d+)", false).unwrap();
    let m = p.find(b"abc42", 0).unwrap();
    assert_eq!(compile_format("<1>").unwrap().render(&m), m.group_value(1));
}

#[test]
fn doubled_angle_bracket_round_trip() {
    let p = compile("a", false).unwrap();
    let m = p.find(b"a", 0).unwrap();
    assert_eq!(compile_format("<<").unwrap().render(&m), "<");
}

#[test]
fn unterminated_group_reference_is_format_error_at_expected_position() {
    let err = compile_format("<1").unwrap_err();
    assert_eq!(err.position, 2);
}
