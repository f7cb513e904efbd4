use crate::ast::Grammar;
use crate::compiler::{CompilerOptions, GrammarError, GrammarErrorKind, Pass};
use crate::location::Location;
use std::collections::HashMap;

/// Report rules declared more than once
pub struct ReportDuplicateRules;

impl Pass for ReportDuplicateRules {
    fn name(&self) -> &str {
        "report_duplicate_rules"
    }

    fn run(&self, grammar: Grammar, _: &CompilerOptions) -> Result<Grammar, GrammarError> {
        let mut declared: HashMap<&str, Location> = HashMap::new();

        for rule in &grammar.rules {
            if let Some(first) = declared.get(rule.name.as_str()) {
                return Err(GrammarError::new(
                    GrammarErrorKind::DuplicateRule,
                    format!(
                        "Rule \"{}\" is already defined at {}.",
                        rule.name, first.start
                    ),
                    rule.location,
                ));
            }

            declared.insert(&rule.name, rule.location);
        }

        Ok(grammar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::passes::testing::run;

    #[test]
    fn reports_the_second_declaration() {
        let err = run(ReportDuplicateRules, "start = a\na = 'a'\na = 'b'").unwrap_err();

        assert_eq!(err.kind(), GrammarErrorKind::DuplicateRule);
        assert_eq!(
            err.message(),
            "Rule \"a\" is already defined at line 2, column 1."
        );
        assert_eq!(err.location().start.line, 3);
    }

    #[test]
    fn accepts_unique_names() {
        assert!(run(ReportDuplicateRules, "start = a\na = 'a'").is_ok());
    }
}
