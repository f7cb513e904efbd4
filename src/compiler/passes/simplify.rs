use crate::ast::{Expression, ExpressionKind, Grammar};
use crate::compiler::{CompilerOptions, GrammarError, Optimize, Pass};

/// Remove wrappers which do not change what an expression matches nor what it produces
///
/// * groups are unwrapped, unless their content could leak labels to the enclosing sequence
/// * nested display names are reduced to the outermost one, as it silences the inner one anyway
/// * with [`Optimize::Speed`], choices nested as alternatives of another choice are flattened
pub struct Simplify;

impl Pass for Simplify {
    fn name(&self) -> &str {
        "simplify"
    }

    fn run(&self, grammar: Grammar, options: &CompilerOptions) -> Result<Grammar, GrammarError> {
        let flatten_choices = options.optimize == Optimize::Speed;

        Ok(grammar.rewrite_expressions(&mut |expression| simplify(expression, flatten_choices)))
    }
}

fn simplify(expression: Expression, flatten_choices: bool) -> Expression {
    let Expression { kind, location } = expression;

    let kind = match kind {
        ExpressionKind::Group { expression } if !leaks_labels(&expression) => return *expression,

        ExpressionKind::Named { name, expression } => match expression.kind {
            ExpressionKind::Named {
                expression: inner, ..
            } => ExpressionKind::Named {
                name,
                expression: inner,
            },
            _ => ExpressionKind::Named { name, expression },
        },

        ExpressionKind::Choice { alternatives } if flatten_choices => ExpressionKind::Choice {
            alternatives: alternatives
                .into_iter()
                .flat_map(|alternative| match alternative.kind {
                    ExpressionKind::Choice { alternatives } => alternatives,
                    _ => vec![alternative],
                })
                .collect(),
        },

        other => other,
    };

    Expression { kind, location }
}

/// Check if an expression binds labels in the scope it is evaluated in
fn leaks_labels(expression: &Expression) -> bool {
    matches!(
        expression.kind,
        ExpressionKind::Labeled { .. } | ExpressionKind::Sequence { .. }
    )
}
