use crate::ast::{Expression, ExpressionKind, Grammar};
use crate::compiler::{CompilerOptions, GrammarError, GrammarErrorKind, Pass};
use crate::location::Location;

/// Report labels which shadow another label visible at the same place
///
/// Labels of a sequence are visible to the following elements of that sequence,
/// as well as to everything nested inside of them.
pub struct ReportDuplicateLabels;

impl Pass for ReportDuplicateLabels {
    fn name(&self) -> &str {
        "report_duplicate_labels"
    }

    fn run(&self, grammar: Grammar, _: &CompilerOptions) -> Result<Grammar, GrammarError> {
        for rule in &grammar.rules {
            check(&rule.expression, &mut vec![])?;
        }

        Ok(grammar)
    }
}

/// Check an expression, `env` containing the labels in scope
///
/// Labels added to `env` by a node are removed before it returns, except for [`ExpressionKind::Labeled`]
/// which leaves its own label for the enclosing node to discard.
fn check<'a>(
    expression: &'a Expression,
    env: &mut Vec<(&'a str, Location)>,
) -> Result<(), GrammarError> {
    let mark = env.len();

    match &expression.kind {
        ExpressionKind::Labeled {
            label,
            expression: inner,
        } => {
            if let Some((_, previous)) = env.iter().find(|(name, _)| name == label) {
                return Err(GrammarError::new(
                    GrammarErrorKind::DuplicateLabel,
                    format!(
                        "Label \"{}\" is already defined at {}.",
                        label, previous.start
                    ),
                    expression.location,
                ));
            }

            check(inner, env)?;
            env.truncate(mark);
            env.push((label.as_str(), expression.location));

            return Ok(());
        }

        // Elements share the same environment
        ExpressionKind::Sequence { elements } => {
            for element in elements {
                check(element, env)?;
            }
        }

        // Every other node gets its own copy of the environment
        other => {
            for child in other.children() {
                check(child, env)?;
                env.truncate(mark);
            }
        }
    }

    env.truncate(mark);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::passes::testing::run;

    #[test]
    fn reports_labels_reused_in_a_sequence() {
        let err = run(ReportDuplicateLabels, "start = a:'a' a:'b'").unwrap_err();

        assert_eq!(err.kind(), GrammarErrorKind::DuplicateLabel);
        assert_eq!(
            err.message(),
            "Label \"a\" is already defined at line 1, column 9."
        );
    }

    #[test]
    fn reports_labels_shadowing_outer_ones() {
        assert!(run(ReportDuplicateLabels, "start = a:'a' ('b' a:'c')").is_err());
        assert!(run(ReportDuplicateLabels, "start = a:'a' (b:'b' (a:'c')*)?").is_err());
    }

    #[test]
    fn accepts_labels_in_separate_scopes() {
        assert!(run(ReportDuplicateLabels, "start = a:'a' / a:'b'").is_ok());
        assert!(run(ReportDuplicateLabels, "start = (a:'a') a:'b'").is_ok());
        assert!(run(ReportDuplicateLabels, "start = a:(a:'a')").is_ok());
        assert!(run(ReportDuplicateLabels, "start = a:'a'\nother = a:'a'").is_ok());
    }
}
