use rex::compile;

#[test]
fn scenario_1_plus_quantifier_and_find_all() {
    let p = compile(r"\d+", false).unwrap();
    let m = p.find(b"abc123def45", 0).unwrap();
    assert_eq!(m.value(), "123");
    assert_eq!(m.start(), 3);
    assert_eq!(m.length(), 3);

    let all: Vec<String> = p.find_all(b"abc123def45").iter().map(|m| m.value()).collect();
    assert_eq!(all, vec!["123", "45"]);
}

#[test]
fn scenario_2_alternation_with_capture() {
    let p = compile(r"(foo|bar)baz", false).unwrap();
    let m = p.find(b"xxfoobazyy", 0).unwrap();
    assert_eq!(m.value(), "foobaz");
    assert_eq!(m.start(), 2);
    assert_eq!(m.group_value(1), "foo");
}

#[test]
fn scenario_3_lazy_quantifier_stops_early() {
    let p = compile("a.*?b", false).unwrap();
    let m = p.find(b"aXXbYYb", 0).unwrap();
    assert_eq!(m.value(), "aXXb");
    assert_eq!(m.length(), 4);
}

#[test]
fn scenario_4_greedy_quantifier_takes_all() {
    let p = compile("a.*b", false).unwrap();
    let m = p.find(b"aXXbYYb", 0).unwrap();
    assert_eq!(m.value(), "aXXbYYb");
    assert_eq!(m.length(), 7);
}

#[test]
fn scenario_5_anchored_word_class() {
    let p = compile(r"^\w+$", false).unwrap();
    let m = p.match_at(b"hello_42", 0).unwrap();
    assert_eq!(m.value(), "hello_42");
    assert!(p.find(b"hi there", 0).is_none());
}

#[test]
fn scenario_6_case_insensitive_class() {
    let p = compile("[A-C]+", true).unwrap();
    let m = p.find(b"aaBBcc", 0).unwrap();
    assert_eq!(m.value(), "aaBBcc");
    assert_eq!(m.length(), 6);
}

#[test]
fn scenario_7_greedy_group_repeats_multiple_captures() {
    let p = compile("(ab){2,3}", false).unwrap();
    let m = p.find(b"ababab", 0).unwrap();
    let group = m.group(1).unwrap();
    let values: Vec<&str> = group.captures.iter().map(|c| c.value.as_str()).collect();
    assert_eq!(values, vec!["ab", "ab", "ab"]);
}

#[test]
fn greedy_length_is_at_least_lazy_length_same_bounds() {
    let greedy = compile("a.*b", false).unwrap().find(b"aXXbYYb", 0).unwrap();
    let lazy = compile("a.*?b", false).unwrap().find(b"aXXbYYb", 0).unwrap();
    assert!(greedy.length() >= lazy.length());
    assert_eq!(greedy.start(), lazy.start());
}

#[test]
fn quantifier_bound_law() {
    let p = compile("x{2,4}", false).unwrap();
    assert!(p.match_at(b"x", 0).is_none());
    assert_eq!(p.match_at(b"xx", 0).unwrap().length(), 2);
    assert_eq!(p.match_at(b"xxxx", 0).unwrap().length(), 4);
    assert_eq!(p.match_at(b"xxxxxx", 0).unwrap().length(), 4);
}

#[test]
fn find_all_terminates_on_pattern_that_can_match_empty_width() {
    // `^` only matches at position 0 so this still terminates, exercising
    // the zero-length-match-advance guard in `FindIter`.
    let p = compile("^", false).unwrap();
    let all = p.find_all(b"abc");
    assert!(all.is_empty());
}

#[test]
fn find_is_pure() {
    let p = compile("a+", false).unwrap();
    let a = p.find(b"xaaay", 0).unwrap();
    let b = p.find(b"xaaay", 0).unwrap();
    assert_eq!(a.value(), b.value());
    assert_eq!(a.start(), b.start());
}
