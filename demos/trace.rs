//! This file demonstrates tracing: rule entries and exits are logged while matching an input
//!
//! Run it with `RUST_LOG=trace` (the default) to see every event, or `RUST_LOG=debug` to only
//! see the compiler's logs.

use pegc::compiler::CompilerOptions;
use pegc::runtime::{NoHost, ParseOptions, TraceEvent, TraceKind};
use std::str::FromStr;

static GRAMMAR: &str = r#"
list  = "[" _ items? _ "]"
items = item (_ "," _ item)*
item  = list / word
word "word" = $[a-z]+
_     = " "*
"#;

fn main() {
    let level = std::env::var("RUST_LOG").unwrap_or_else(|_| "TRACE".to_owned());
    let level = log::LevelFilter::from_str(&level).unwrap();

    simplelog::TermLogger::init(
        level,
        simplelog::ConfigBuilder::new()
            .set_time_level(log::LevelFilter::Off)
            .build(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Never,
    )
    .unwrap();

    let parser = pegc::generate_parser(GRAMMAR, CompilerOptions::new().with_trace(true))
        .unwrap_or_else(|err| panic!("{}", err.pretty(GRAMMAR)));

    // Without a tracer, events go to the logger
    let input = "[a, [b, c], d]";
    println!("{}: {:?}", input, parser.parse(input, &mut NoHost).is_ok());

    // A custom tracer can collect them instead
    let mut failures = vec![];
    let mut tracer = |event: &TraceEvent<'_>| {
        if event.kind == TraceKind::Fail {
            failures.push(format!("{} at {}", event.rule, event.location.start));
        }
    };

    let input = "[a, [b, 1]]";
    let result = parser.parse_with(input, &mut NoHost, ParseOptions::new().tracer(&mut tracer));

    match result {
        Ok(_) => println!("{}: matched", input),
        Err(err) => println!("{}: {}", input, err),
    }

    for failure in failures {
        println!("  failed: {}", failure);
    }
}
