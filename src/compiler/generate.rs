use super::{CompilerOptions, GrammarError, GrammarErrorKind, Optimize};
use crate::ast::{Expression, ExpressionKind, Grammar};
use crate::runtime::{
    ClassMatcher, CompiledGrammar, CompiledRule, Expectation, LiteralMatcher, Node,
};
use log::debug;

/// Build the runtime form of a checked grammar
///
/// Rule references are resolved and every matcher is precomputed. This step runs after all passes,
/// but still reports references and start rules which can't be resolved, in case the passes
/// checking them were removed.
pub fn generate_compiled(
    grammar: &Grammar,
    options: &CompilerOptions,
) -> Result<CompiledGrammar, GrammarError> {
    let mut builder = Builder {
        grammar,
        expectations: vec![],
        bitmaps: options.optimize == Optimize::Speed,
    };

    let rules = grammar
        .rules
        .iter()
        .map(|rule| {
            Ok(CompiledRule {
                name: rule.name.clone(),
                node: builder.node(&rule.expression)?,
            })
        })
        .collect::<Result<Vec<_>, GrammarError>>()?;

    let start_rules = options
        .start_rules(grammar.rules.first().map(|rule| rule.name.as_str()))
        .into_iter()
        .map(|name| {
            grammar.rule_index(name).ok_or_else(|| {
                GrammarError::new(
                    GrammarErrorKind::UnknownStartRule,
                    format!("Unknown start rule \"{}\".", name),
                    grammar.location,
                )
            })
        })
        .collect::<Result<Vec<_>, GrammarError>>()?;

    if start_rules.is_empty() {
        return Err(GrammarError::new(
            GrammarErrorKind::UnknownStartRule,
            "Grammar has no rule to start parsing from.",
            grammar.location,
        ));
    }

    let end_expectation = builder.intern(Expectation::End);

    debug!(
        "Generated parser with {} rule(s), {} start rule(s) and {} expectation(s)",
        rules.len(),
        start_rules.len(),
        builder.expectations.len()
    );

    Ok(CompiledGrammar {
        rules,
        expectations: builder.expectations,
        end_expectation,
        initializer: grammar
            .initializer
            .as_ref()
            .map(|initializer| initializer.code.clone()),
        start_rules,
        cache: options.cache,
        trace: options.trace,
    })
}

struct Builder<'g> {
    grammar: &'g Grammar,

    /// Interned expectations, equal descriptors sharing the same index
    expectations: Vec<Expectation>,

    /// Add ASCII bitmaps to class matchers
    bitmaps: bool,
}

impl<'g> Builder<'g> {
    fn intern(&mut self, expectation: Expectation) -> usize {
        match self.expectations.iter().position(|e| *e == expectation) {
            Some(id) => id,
            None => {
                self.expectations.push(expectation);
                self.expectations.len() - 1
            }
        }
    }

    fn boxed(&mut self, expression: &Expression) -> Result<Box<Node>, GrammarError> {
        self.node(expression).map(Box::new)
    }

    fn node(&mut self, expression: &Expression) -> Result<Node, GrammarError> {
        Ok(match &expression.kind {
            ExpressionKind::Literal { value, ignore_case } => Node::Literal {
                matcher: LiteralMatcher::new(value, *ignore_case),
                expectation: self.intern(Expectation::Literal {
                    text: value.clone(),
                    ignore_case: *ignore_case,
                }),
            },

            ExpressionKind::Class {
                parts,
                inverted,
                ignore_case,
            } => Node::Class {
                matcher: ClassMatcher::new(parts, *inverted, *ignore_case, self.bitmaps),
                expectation: self.intern(Expectation::Class {
                    parts: parts.clone(),
                    inverted: *inverted,
                    ignore_case: *ignore_case,
                }),
            },

            ExpressionKind::Any => Node::Any {
                expectation: self.intern(Expectation::Any),
            },

            ExpressionKind::RuleRef { name } => Node::RuleRef {
                rule: self.grammar.rule_index(name).ok_or_else(|| {
                    GrammarError::new(
                        GrammarErrorKind::UndefinedRule,
                        format!("Rule \"{}\" is not defined.", name),
                        expression.location,
                    )
                })?,
            },

            ExpressionKind::Sequence { elements } => Node::Sequence(
                elements
                    .iter()
                    .map(|element| self.node(element))
                    .collect::<Result<_, _>>()?,
            ),

            ExpressionKind::Choice { alternatives } => Node::Choice(
                alternatives
                    .iter()
                    .map(|alternative| self.node(alternative))
                    .collect::<Result<_, _>>()?,
            ),

            ExpressionKind::Labeled { label, expression } => Node::Labeled {
                label: label.clone(),
                node: self.boxed(expression)?,
            },

            ExpressionKind::Named { name, expression } => Node::Named {
                expectation: self.intern(Expectation::Other {
                    description: name.clone(),
                }),
                node: self.boxed(expression)?,
            },

            ExpressionKind::Action { expression, code } => Node::Action {
                node: self.boxed(expression)?,
                code: code.clone(),
            },

            ExpressionKind::Text { expression } => Node::Text(self.boxed(expression)?),
            ExpressionKind::Optional { expression } => Node::Optional(self.boxed(expression)?),
            ExpressionKind::ZeroOrMore { expression } => Node::ZeroOrMore(self.boxed(expression)?),
            ExpressionKind::OneOrMore { expression } => Node::OneOrMore(self.boxed(expression)?),
            ExpressionKind::Group { expression } => Node::Group(self.boxed(expression)?),
            ExpressionKind::SimpleAnd { expression } => Node::SimpleAnd(self.boxed(expression)?),
            ExpressionKind::SimpleNot { expression } => Node::SimpleNot(self.boxed(expression)?),
            ExpressionKind::SemanticAnd { code } => Node::SemanticAnd(code.clone()),
            ExpressionKind::SemanticNot { code } => Node::SemanticNot(code.clone()),
        })
    }
}
