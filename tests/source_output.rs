mod common;

use common::compile;
use pegc::compiler::{CompilerOptions, Format, Output, SourceArtifact};
use pegc::runtime::{NoHost, Parser};
use rstest::rstest;
use std::collections::BTreeMap;

fn source(grammar: &str, options: CompilerOptions) -> SourceArtifact {
    pegc::generate(grammar, options.with_output(Output::Source))
        .unwrap_or_else(|err| panic!("{}", err.pretty(grammar)))
        .into_source()
        .expect("source artifact")
}

#[rstest]
#[case::literals("start = \"a\" \"b\"i / 'c'", &["ab", "aB", "c"], &["", "a", "d"])]
#[case::classes("start = [a-c\\]]+ [^0-9]", &["a]x", "cc-"], &["a1", "x"])]
#[case::operators("start = $(\"x\" &\"y\" !\"z\" \"y\")? n:[0-9]*", &["xy12", "", "3"], &["xz", "xy1a"])]
#[case::rules("start = item (\",\" item)*\nitem \"item\" = word / [0-9]\nword = [a-z]+", &["a,1,bc"], &["a,", ",a"])]
#[case::proxy("start = proxy\nproxy = target\ntarget = \"t\"+", &["ttt"], &["", "tx"])]
fn source_accepts_the_same_inputs(
    #[case] grammar: &str,
    #[case] accepted: &[&str],
    #[case] rejected: &[&str],
) {
    let original = compile(grammar);
    let regenerated = compile(&source(grammar, CompilerOptions::new()).text);

    for input in accepted {
        assert!(original.parse(input, &mut NoHost).is_ok(), "{:?}", input);
        assert!(regenerated.parse(input, &mut NoHost).is_ok(), "{:?}", input);
    }

    for input in rejected {
        assert_eq!(
            original.parse(input, &mut NoHost).unwrap_err().to_string(),
            regenerated.parse(input, &mut NoHost).unwrap_err().to_string(),
            "{:?}",
            input
        );
    }
}

#[test]
fn source_keeps_code_blocks() {
    let text = source("{ setup }\nstart = a:\"a\" &{ ok } { use(a) }", CompilerOptions::new()).text;

    assert!(text.starts_with("{ setup }\n"));
    assert!(text.contains("{ use(a) }"));
    assert!(text.contains("&{ ok }"));
}

#[test]
fn source_passes_packaging_options_through() {
    let options = CompilerOptions::from_json(
        r#"{ "format": "commonjs", "exportVar": "Calc", "dependencies": { "math": "./math" } }"#,
    )
    .unwrap();

    let artifact = source("start = 'a'", options);

    assert_eq!(artifact.format, Format::Commonjs);
    assert_eq!(artifact.export_var.as_deref(), Some("Calc"));
    assert_eq!(
        artifact.dependencies,
        BTreeMap::from([("math".to_string(), "./math".to_string())])
    );
}

#[test]
fn parsers_are_shared_between_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Parser>();

    let parser = compile("start = [0-9]+ (\"+\" [0-9]+)*");

    std::thread::scope(|scope| {
        for input in ["1+2", "12+3+45", "7"] {
            let parser = &parser;
            scope.spawn(move || assert!(parser.parse(input, &mut NoHost).is_ok()));
        }
    });
}
