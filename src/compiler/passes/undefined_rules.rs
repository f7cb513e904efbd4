use crate::ast::{ExpressionKind, Grammar};
use crate::compiler::analysis::RuleTable;
use crate::compiler::{CompilerOptions, GrammarError, GrammarErrorKind, Pass};

/// Report references to rules which are not declared
pub struct ReportUndefinedRules;

impl Pass for ReportUndefinedRules {
    fn name(&self) -> &str {
        "report_undefined_rules"
    }

    fn run(&self, grammar: Grammar, _: &CompilerOptions) -> Result<Grammar, GrammarError> {
        match find_undefined_rule(&grammar) {
            Some(err) => Err(err),
            None => Ok(grammar),
        }
    }
}

fn find_undefined_rule(grammar: &Grammar) -> Option<GrammarError> {
    let table = RuleTable::new(grammar);
    let mut error = None;

    grammar.walk(&mut |expression| {
        if error.is_some() {
            return;
        }

        if let ExpressionKind::RuleRef { name } = &expression.kind {
            if table.get(name).is_none() {
                error = Some(GrammarError::new(
                    GrammarErrorKind::UndefinedRule,
                    format!("Rule \"{}\" is not defined.", name),
                    expression.location,
                ));
            }
        }
    });

    error
}
