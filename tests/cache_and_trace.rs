mod common;

use common::{compile_with, TestHost};
use pegc::compiler::CompilerOptions;
use pegc::runtime::{NoHost, ParseOptions, TraceEvent, TraceKind, Value};

const SHARED: &str = "start = shared \"x\" / shared \"y\"\nshared = \"a\" { count }";

#[test]
fn cache_does_not_run_actions_twice() {
    let parser = compile_with(SHARED, CompilerOptions::new().with_cache(true));
    let mut host = TestHost::default();

    let value = parser.parse("ay", &mut host).unwrap();

    assert_eq!(host.calls, ["count@0"]);
    assert_eq!(
        value,
        Value::List(vec![Value::Host("a".to_string()), "y".into()])
    );
}

#[test]
fn without_cache_actions_run_on_every_attempt() {
    let parser = compile_with(SHARED, CompilerOptions::new());
    let mut host = TestHost::default();

    parser.parse("ay", &mut host).unwrap();

    assert_eq!(host.calls, ["count@0", "count@0"]);
}

#[test]
fn cache_is_local_to_each_parse() {
    let parser = compile_with(SHARED, CompilerOptions::new().with_cache(true));
    let mut host = TestHost::default();

    parser.parse("ay", &mut host).unwrap();
    parser.parse("ax", &mut host).unwrap();

    assert_eq!(host.calls, ["count@0", "count@0"]);
}

type Recorded = (TraceKind, String, usize, usize);

fn record(parser: &pegc::runtime::Parser, input: &str) -> Vec<Recorded> {
    let mut events = vec![];
    let mut tracer = |event: &TraceEvent<'_>| {
        events.push((
            event.kind,
            event.rule.to_string(),
            event.location.start.offset,
            event.location.end.offset,
        ))
    };

    let _ = parser.parse_with(input, &mut TestHost::default(), ParseOptions::new().tracer(&mut tracer));

    events
}

fn event(kind: TraceKind, rule: &str, start: usize, end: usize) -> Recorded {
    (kind, rule.to_string(), start, end)
}

#[test]
fn traces_rules_in_nested_order() {
    let options = CompilerOptions::new().with_trace(true);
    let parser = compile_with("start = a b\na = \"a\"\nb = \"b\"", options);

    assert_eq!(
        record(&parser, "ab"),
        [
            event(TraceKind::Enter, "start", 0, 0),
            event(TraceKind::Enter, "a", 0, 0),
            event(TraceKind::Match, "a", 0, 1),
            event(TraceKind::Enter, "b", 1, 1),
            event(TraceKind::Match, "b", 1, 2),
            event(TraceKind::Match, "start", 0, 2),
        ]
    );

    assert_eq!(
        record(&parser, "ax"),
        [
            event(TraceKind::Enter, "start", 0, 0),
            event(TraceKind::Enter, "a", 0, 0),
            event(TraceKind::Match, "a", 0, 1),
            event(TraceKind::Enter, "b", 1, 1),
            event(TraceKind::Fail, "b", 1, 1),
            event(TraceKind::Fail, "start", 0, 0),
        ]
    );
}

#[test]
fn traces_cache_hits() {
    let options = CompilerOptions::new().with_trace(true).with_cache(true);
    let parser = compile_with(SHARED, options);

    let shared: Vec<_> = record(&parser, "ay")
        .into_iter()
        .filter(|(_, rule, _, _)| rule == "shared")
        .collect();

    assert_eq!(
        shared,
        [
            event(TraceKind::Enter, "shared", 0, 0),
            event(TraceKind::Match, "shared", 0, 1),
            event(TraceKind::Enter, "shared", 0, 0),
            event(TraceKind::Match, "shared", 0, 1),
        ]
    );
}

#[test]
fn tracers_are_ignored_without_tracing() {
    let parser = compile_with("start = a\na = \"a\"", CompilerOptions::new());

    assert!(record(&parser, "a").is_empty());
}

#[test]
fn tracing_never_changes_results() {
    let grammar = "start = (a / b)+\na = \"a\" \"b\"\nb = \"a\"";

    for input in ["aab", "ab", "b", ""] {
        let traced = compile_with(grammar, CompilerOptions::new().with_trace(true));
        let plain = compile_with(grammar, CompilerOptions::new());

        assert_eq!(
            traced.parse(input, &mut NoHost).map_err(|err| err.to_string()),
            plain.parse(input, &mut NoHost).map_err(|err| err.to_string()),
        );
    }
}
