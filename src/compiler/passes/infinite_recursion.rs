use crate::ast::{Expression, ExpressionKind, Grammar};
use crate::compiler::analysis::RuleTable;
use crate::compiler::{CompilerOptions, GrammarError, GrammarErrorKind, Pass};

/// Report left recursion, which would make parsers loop forever
///
/// A rule is left-recursive when it can reach itself without consuming any input.
/// Only the part of a sequence up to its first element which always consumes input is inspected.
pub struct ReportInfiniteRecursion;

impl Pass for ReportInfiniteRecursion {
    fn name(&self) -> &str {
        "report_infinite_recursion"
    }

    fn run(&self, grammar: Grammar, _: &CompilerOptions) -> Result<Grammar, GrammarError> {
        check_grammar(&grammar)?;
        Ok(grammar)
    }
}

fn check_grammar(grammar: &Grammar) -> Result<(), GrammarError> {
    let table = RuleTable::new(grammar);

    for rule in &grammar.rules {
        let mut visited = vec![rule.name.as_str()];
        check(&table, &rule.expression, &mut visited)?;
    }

    Ok(())
}

fn check<'g>(
    table: &RuleTable<'g>,
    expression: &'g Expression,
    visited: &mut Vec<&'g str>,
) -> Result<(), GrammarError> {
    match &expression.kind {
        ExpressionKind::Sequence { elements } => {
            for element in elements {
                check(table, element, visited)?;

                if table.always_consumes_on_success(element) {
                    break;
                }
            }

            Ok(())
        }

        ExpressionKind::RuleRef { name } => {
            if visited.contains(&name.as_str()) {
                visited.push(name);

                return Err(GrammarError::new(
                    GrammarErrorKind::LeftRecursion,
                    format!(
                        "Possible infinite loop when parsing (left recursion: {}).",
                        visited.join(" -> ")
                    ),
                    expression.location,
                ));
            }

            // Undefined rules are reported by another pass
            if let Some(target) = table.get(name) {
                visited.push(name);
                check(table, target, visited)?;
                visited.pop();
            }

            Ok(())
        }

        other => {
            for child in other.children() {
                check(table, child, visited)?;
            }

            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::passes::testing::run;

    #[test]
    fn reports_direct_left_recursion() {
        let err = run(ReportInfiniteRecursion, "start = start 'a' / 'a'").unwrap_err();

        assert_eq!(err.kind(), GrammarErrorKind::LeftRecursion);
        assert_eq!(
            err.message(),
            "Possible infinite loop when parsing (left recursion: start -> start)."
        );
    }

    #[test]
    fn reports_indirect_left_recursion_through_empty_prefixes() {
        let err = run(ReportInfiniteRecursion, "a = 'x'? b\nb = c\nc = &'y' a").unwrap_err();

        assert_eq!(
            err.message(),
            "Possible infinite loop when parsing (left recursion: a -> b -> c -> a)."
        );
    }

    #[test]
    fn accepts_right_recursion() {
        assert!(run(ReportInfiniteRecursion, "list = 'x' ',' list / 'x'").is_ok());
        assert!(run(ReportInfiniteRecursion, "a = '(' a ')' / ''").is_ok());
    }
}
