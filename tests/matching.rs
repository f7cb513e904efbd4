mod common;

use common::{compile, compile_with, syntax_error, TestHost};
use pegc::ast::ClassPart;
use pegc::compiler::CompilerOptions;
use pegc::runtime::{Expectation, NoHost, ParseError, ParseOptions, Value, DEFAULT_MAX_DEPTH};
use rstest::rstest;

fn strs<T>(items: &[&str]) -> Value<T> {
    Value::List(items.iter().map(|&item| item.into()).collect())
}

#[test]
fn repetition_matches_a_prefix_but_not_the_whole_input() {
    let parser = compile("Digits = [0-9]+");

    let prefix = parser
        .parse_prefix("42a", &mut NoHost, ParseOptions::new())
        .unwrap();

    assert_eq!(prefix.end, 2);
    assert_eq!(prefix.value, strs(&["4", "2"]));

    let err = syntax_error(parser.parse("42a", &mut NoHost));

    assert_eq!(err.found(), Some("a"));
    assert_eq!(err.location().start.offset, 2);
    assert_eq!(err.location().end.offset, 3);
    assert_eq!(
        err.expected(),
        [
            Expectation::Class {
                parts: vec![ClassPart::Range('0', '9')],
                inverted: false,
                ignore_case: false,
            },
            Expectation::End,
        ]
    );
    assert_eq!(
        err.message(),
        "Expected [0-9] or end of input but \"a\" found."
    );
}

#[test]
fn ordered_choice_commits_to_the_first_success() {
    let parser = compile("A = \"foo\" / \"foobar\"");

    let prefix = parser
        .parse_prefix("foobar", &mut NoHost, ParseOptions::new())
        .unwrap();

    assert_eq!(prefix.value, Value::Str("foo".to_string()));
    assert_eq!(prefix.end, 3);

    let err = syntax_error(parser.parse("foobar", &mut NoHost));
    assert_eq!(err.message(), "Expected end of input but \"b\" found.");
}

#[test]
fn zero_width_operators_never_move_the_cursor() {
    let parser = compile(
        "start = p:pos &\"a\" !\"b\" &{ true } !{ false } \"x\"? q:pos \"a\"\npos = \"\" { pos }",
    );

    let mut host = TestHost::default();
    let value = parser.parse("a", &mut host).unwrap();

    assert_eq!(host.calls, ["pos@0", "pos@0"]);
    assert_eq!(
        value,
        Value::List(vec![
            Value::Host(String::new()),
            Value::Null,
            Value::Null,
            Value::Null,
            Value::Null,
            Value::Null,
            Value::Host(String::new()),
            "a".into(),
        ])
    );
}

#[test]
fn one_or_more_needs_a_match_unlike_zero_or_more() {
    let options = CompilerOptions::new().with_start_rules(["one", "zero"]);
    let parser = compile_with("one = \"a\"+\nzero = \"a\"*", options);

    let zero = parser
        .parse_prefix("b", &mut NoHost, ParseOptions::new().start_rule("zero"))
        .unwrap();

    assert_eq!(zero.value, Value::List(vec![]));
    assert_eq!(zero.end, 0);

    let err = syntax_error(parser.parse_prefix(
        "b",
        &mut NoHost,
        ParseOptions::new().start_rule("one"),
    ));

    assert_eq!(err.message(), "Expected \"a\" but \"b\" found.");
}

#[rstest]
#[case::text("start = $(\"a\" \"b\"+)", "abbb", Value::Str("abbb".into()))]
#[case::literal_ignoring_case("start = \"select\"i", "SeLeCt", Value::Str("SeLeCt".into()))]
#[case::literal("start = \"select\"", "select", Value::Str("select".into()))]
#[case::class_ignoring_case("start = [a-c]i+", "AbC", strs(&["A", "b", "C"]))]
#[case::inverted_class("start = [^0-9]+", "ab", strs(&["a", "b"]))]
#[case::unicode("start = . [é-ü] \"z\"", "€éz", strs(&["€", "é", "z"]))]
#[case::optional("start = \"a\"? \"b\"", "b", Value::List(vec![Value::Null, "b".into()]))]
#[case::rule_ref("start = inner\ninner = \"a\" \"b\"", "ab", strs(&["a", "b"]))]
#[case::group("start = (\"a\" / \"b\") \"c\"", "bc", strs(&["b", "c"]))]
fn produces_values(#[case] grammar: &str, #[case] input: &str, #[case] expected: Value<String>) {
    let parser = compile(grammar);

    assert_eq!(parser.parse(input, &mut TestHost::default()).unwrap(), expected);
}

#[rstest]
#[case::furthest_failure("start = \"a\" \"b\" / \"a\" \"c\" / \"x\"", "ad", "Expected \"b\" or \"c\" but \"d\" found.")]
#[case::named_rule("start = number \"+\" number\nnumber \"number\" = [0-9]+", "1+x", "Expected number but \"x\" found.")]
#[case::inside_named_rule("start = number \"+\" number\nnumber \"number\" = [0-9]+", "1-", "Expected \"+\" but \"-\" found.")]
#[case::partial_literal("start = \"ab\"", "a", "Expected \"ab\" but \"a\" found.")]
#[case::end_of_input("start = \"ab\"", "", "Expected \"ab\" but end of input found.")]
#[case::duplicate_expectations("start = \"a\" \"b\" / \"a\" \"b\" \"c\"", "ax", "Expected \"b\" but \"x\" found.")]
#[case::any("start = \"a\" .", "a", "Expected any character but end of input found.")]
fn reports_syntax_errors(#[case] grammar: &str, #[case] input: &str, #[case] message: &str) {
    let parser = compile(grammar);
    let err = syntax_error(parser.parse(input, &mut NoHost));

    assert_eq!(err.message(), message);
}

#[test]
fn error_positions_count_characters() {
    let parser = compile("start = \"é\"* \"a\"");
    let err = syntax_error(parser.parse("éé\nx", &mut NoHost));

    assert_eq!(err.location().start.offset, 4);
    assert_eq!(err.location().start.line, 1);
    assert_eq!(err.location().start.column, 3);
    assert_eq!(err.found(), Some("\n"));
    assert!(err.pretty("éé\nx").starts_with("ERROR: At line 1, column 3:"));
}

#[test]
fn actions_see_labels_of_their_sequence() {
    let parser = compile("start = a:\"x\" b:(\"y\" c:\"z\") { labels }");
    let value = parser.parse("xyz", &mut TestHost::default()).unwrap();

    assert_eq!(value, Value::Host("a=x,b=yz".to_string()));
}

#[test]
fn rules_do_not_see_labels_of_their_callers() {
    let parser = compile("start = a:\"x\" inner\ninner = &{ a } \"y\" / \"y\" { labels }");
    let value = parser.parse("xy", &mut TestHost::default()).unwrap();

    assert_eq!(value, Value::List(vec!["x".into(), Value::Host(String::new())]));
}

#[test]
fn predicates_see_labels_in_scope() {
    let parser = compile("start = a:\"x\" &{ a } \"y\"");
    assert!(parser.parse("xy", &mut TestHost::default()).is_ok());

    // Groups drop the labels bound inside of them
    let parser = compile("start = (a:\"x\") &{ a } \"y\"");
    assert!(parser.parse("xy", &mut TestHost::default()).is_err());
}

#[rstest]
#[case::action("start = \"a\" { fail } / \"a\"")]
#[case::predicate("start = &{ fail } \"a\" / \"a\"")]
fn host_errors_abort_the_parse(#[case] grammar: &str) {
    let parser = compile(grammar);

    match parser.parse("a", &mut TestHost::default()) {
        Err(ParseError::Host(err)) => assert_eq!(err, "boom"),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn host_syntax_errors_abort_the_parse() {
    let parser = compile("start = [0-9]+ { message } / .+");
    let err = syntax_error(parser.parse("12", &mut TestHost::default()));

    assert_eq!(err.message(), "custom failure");
    assert!(err.expected().is_empty());
    assert_eq!(err.location().end.offset, 2);

    let parser = compile("start = [0-9]+ { expected } / .+");
    let err = syntax_error(parser.parse("12", &mut TestHost::default()));

    assert_eq!(err.message(), "Expected a number but \"12\" found.");
    assert_eq!(err.found(), Some("12"));
}

#[test]
fn runs_the_initializer_once_per_parse() {
    let parser = compile("{ init }\nstart = \"a\"");

    let mut host = TestHost::default();
    parser.parse("a", &mut host).unwrap();
    parser.parse("b", &mut host).unwrap_err();

    assert_eq!(host.initialized, 2);

    match parser.parse("a", &mut NoHost) {
        Err(ParseError::Host(err)) => assert_eq!(err.code, "init"),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn selects_start_rules() {
    let options = CompilerOptions::new().with_start_rules(["b", "a"]);
    let parser = compile_with("a = \"a\"\nb = \"b\"\nc = \"c\"", options);

    assert!(parser.parse("b", &mut NoHost).is_ok());
    assert!(parser
        .parse_with("a", &mut NoHost, ParseOptions::new().start_rule("a"))
        .is_ok());

    match parser.parse_with("c", &mut NoHost, ParseOptions::new().start_rule("c")) {
        Err(ParseError::InvalidStartRule(rule)) => assert_eq!(rule, "c"),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn limits_nested_rules() {
    let parser = compile("start = \"(\" start \")\" / \"x\"");
    let input = format!("{}x{}", "(".repeat(12), ")".repeat(12));

    assert!(parser.parse(&input, &mut NoHost).is_ok());

    match parser.parse_with(&input, &mut NoHost, ParseOptions::new().max_depth(10)) {
        Err(ParseError::RecursionLimit { limit, offset }) => {
            assert_eq!(limit, 10);
            assert_eq!(offset, 10);
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn reaches_the_default_nesting_limit() {
    // Every character nests one more rule invocation
    let parser = compile("list = 'x' list / 'x'");

    assert!(parser
        .parse(&"x".repeat(DEFAULT_MAX_DEPTH - 1), &mut NoHost)
        .is_ok());

    match parser.parse(&"x".repeat(DEFAULT_MAX_DEPTH + 1), &mut NoHost) {
        Err(ParseError::RecursionLimit { limit, offset }) => {
            assert_eq!(limit, DEFAULT_MAX_DEPTH);
            assert_eq!(offset, DEFAULT_MAX_DEPTH);
        }
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
}

#[test]
fn raised_nesting_limits_are_reachable() {
    let parser = compile("start = \"(\" start \")\" / \"x\"");
    let depth = DEFAULT_MAX_DEPTH * 2;
    let input = format!("{}x{}", "(".repeat(depth), ")".repeat(depth));

    assert!(parser
        .parse_with(&input, &mut NoHost, ParseOptions::new().max_depth(depth + 1))
        .is_ok());
}
