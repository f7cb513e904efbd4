use crate::ast::Grammar;
use crate::compiler::{CompilerOptions, GrammarError, GrammarErrorKind, Pass};

/// Report allowed start rules which are not declared in the grammar
pub struct ReportStartRules;

impl Pass for ReportStartRules {
    fn name(&self) -> &str {
        "report_start_rules"
    }

    fn run(&self, grammar: Grammar, options: &CompilerOptions) -> Result<Grammar, GrammarError> {
        let first_rule = grammar.rules.first().map(|rule| rule.name.as_str());
        let start_rules = options.start_rules(first_rule);

        if start_rules.is_empty() {
            return Err(GrammarError::new(
                GrammarErrorKind::UnknownStartRule,
                "Grammar has no rule to start parsing from.",
                grammar.location,
            ));
        }

        if let Some(unknown) = start_rules
            .iter()
            .find(|name| grammar.rule(name).is_none())
        {
            return Err(GrammarError::new(
                GrammarErrorKind::UnknownStartRule,
                format!("Unknown start rule \"{}\".", unknown),
                grammar.location,
            ));
        }

        Ok(grammar)
    }
}
