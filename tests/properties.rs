mod common;

use common::{compile, compile_with, TestHost};
use pegc::compiler::{CompilerOptions, Optimize};
use pegc::runtime::{NoHost, ParseOptions, Value};
use proptest::prelude::*;

const WORDS: &str = "start = (word \" \"?)*\nword = $[a-z]+";

proptest! {
    #[test]
    fn matched_prefixes_match_in_full(input in "[a-z ]{0,12}[0-9]?[a-z ]{0,4}") {
        let parser = compile(WORDS);
        let prefix = parser.parse_prefix(&input, &mut NoHost, ParseOptions::new()).unwrap();

        prop_assert!(input.is_char_boundary(prefix.end));
        prop_assert_eq!(parser.parse(&input[..prefix.end], &mut NoHost).unwrap(), prefix.value);
    }

    #[test]
    fn first_successful_alternative_wins(input in "[a-c]{1,8}") {
        let parser = compile("start = $\"a\"+ / $[a-z]+");
        let prefix = parser.parse_prefix(&input, &mut NoHost, ParseOptions::new()).unwrap();

        let leading = input.chars().take_while(|&c| c == 'a').count();

        if leading > 0 {
            prop_assert_eq!(prefix.end, leading);
        } else {
            prop_assert_eq!(prefix.end, input.len());
        }
    }

    #[test]
    fn lookaheads_never_consume(input in "[ab]{0,6}") {
        let parser = compile("start = p:pos (&\"a\" / !\"a\") q:pos .*\npos = \"\" { pos }");
        let mut host = TestHost::default();

        parser.parse(&input, &mut host).unwrap();

        prop_assert_eq!(host.calls, ["pos@0", "pos@0"]);
    }

    #[test]
    fn repetitions_collect_every_match(count in 0usize..20, tail in "[b-z]?") {
        let parser = compile("start = $\"a\"* .?");
        let input = format!("{}{}", "a".repeat(count), tail);

        let value = parser.parse(&input, &mut NoHost).unwrap();
        let expected_tail = if tail.is_empty() { Value::Null } else { Value::from(tail.as_str()) };

        prop_assert_eq!(value, Value::List(vec!["a".repeat(count).into(), expected_tail]));
    }

    #[test]
    fn options_never_change_results(input in "[a-c(), ]{0,12}") {
        let grammar = "start = list\nlist = \"(\" items? \")\" / atom\nitems = list (\",\" \" \"? list)*\natom = $[a-c]+ / $\"a\" \"b\"";

        let results: Vec<_> = [
            CompilerOptions::new(),
            CompilerOptions::new().with_cache(true),
            CompilerOptions::new().with_optimize(Optimize::Size),
            CompilerOptions::new().with_cache(true).with_optimize(Optimize::Size),
        ]
        .into_iter()
        .map(|options| {
            compile_with(grammar, options)
                .parse(&input, &mut NoHost)
                .map_err(|err| err.to_string())
        })
        .collect();

        for result in &results[1..] {
            prop_assert_eq!(result, &results[0]);
        }
    }
}
