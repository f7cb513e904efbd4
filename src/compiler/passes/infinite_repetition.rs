use crate::ast::{ExpressionKind, Grammar};
use crate::compiler::analysis::RuleTable;
use crate::compiler::{CompilerOptions, GrammarError, GrammarErrorKind, Pass};

/// Report repetitions of expressions which may succeed without consuming input
pub struct ReportInfiniteRepetition;

impl Pass for ReportInfiniteRepetition {
    fn name(&self) -> &str {
        "report_infinite_repetition"
    }

    fn run(&self, grammar: Grammar, _: &CompilerOptions) -> Result<Grammar, GrammarError> {
        match find_infinite_repetition(&grammar) {
            Some(err) => Err(err),
            None => Ok(grammar),
        }
    }
}

fn find_infinite_repetition(grammar: &Grammar) -> Option<GrammarError> {
    let table = RuleTable::new(grammar);
    let mut error = None;

    grammar.walk(&mut |node| {
        if error.is_some() {
            return;
        }

        if let ExpressionKind::ZeroOrMore { expression } | ExpressionKind::OneOrMore { expression } =
            &node.kind
        {
            if !table.always_consumes_on_success(expression) {
                error = Some(GrammarError::new(
                    GrammarErrorKind::InfiniteRepetition,
                    "Possible infinite loop when parsing (repetition used with an expression that may not consume any input).",
                    node.location,
                ));
            }
        }
    });

    error
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::passes::testing::run;

    #[test]
    fn reports_repeated_empty_expressions() {
        for grammar in ["start = ('a'?)*", "start = (!'a')+", "start = e*\ne = ''"] {
            let err = run(ReportInfiniteRepetition, grammar).unwrap_err();
            assert_eq!(err.kind(), GrammarErrorKind::InfiniteRepetition, "{}", grammar);
        }
    }

    #[test]
    fn accepts_consuming_repetitions() {
        assert!(run(ReportInfiniteRepetition, "start = ('a' 'b'?)* [0-9]+").is_ok());
    }
}
