use crate::ast::{Expression, ExpressionKind, Grammar};
use std::collections::HashMap;

/// Lookups shared by the passes
pub struct RuleTable<'g> {
    rules: HashMap<&'g str, &'g Expression>,
}

impl<'g> RuleTable<'g> {
    pub fn new(grammar: &'g Grammar) -> Self {
        let mut rules = HashMap::new();

        for rule in &grammar.rules {
            rules.entry(rule.name.as_str()).or_insert(&rule.expression);
        }

        Self { rules }
    }

    pub fn get(&self, name: &str) -> Option<&'g Expression> {
        self.rules.get(name).copied()
    }

    /// Check if an expression cannot succeed without consuming input
    ///
    /// Rules being visited are considered as potentially empty, as reaching one
    /// again without consuming anything means the grammar is left-recursive.
    pub fn always_consumes_on_success(&self, expression: &'g Expression) -> bool {
        self.consumes(expression, &mut vec![])
    }

    fn consumes(&self, expression: &'g Expression, visiting: &mut Vec<&'g str>) -> bool {
        match &expression.kind {
            ExpressionKind::Literal { value, .. } => !value.is_empty(),
            ExpressionKind::Class { .. } | ExpressionKind::Any => true,

            ExpressionKind::RuleRef { name } => {
                if visiting.contains(&name.as_str()) {
                    return false;
                }

                match self.rules.get_key_value(name.as_str()) {
                    Some((&name, &rule)) => {
                        visiting.push(name);
                        let consumes = self.consumes(rule, visiting);
                        visiting.pop();
                        consumes
                    }
                    None => false,
                }
            }

            ExpressionKind::Sequence { elements } => {
                elements.iter().any(|element| self.consumes(element, visiting))
            }

            ExpressionKind::Choice { alternatives } => alternatives
                .iter()
                .all(|alternative| self.consumes(alternative, visiting)),

            ExpressionKind::Labeled { expression, .. }
            | ExpressionKind::Named { expression, .. }
            | ExpressionKind::Action { expression, .. }
            | ExpressionKind::Text { expression }
            | ExpressionKind::OneOrMore { expression }
            | ExpressionKind::Group { expression } => self.consumes(expression, visiting),

            ExpressionKind::Optional { .. }
            | ExpressionKind::ZeroOrMore { .. }
            | ExpressionKind::SimpleAnd { .. }
            | ExpressionKind::SimpleNot { .. }
            | ExpressionKind::SemanticAnd { .. }
            | ExpressionKind::SemanticNot { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::parse_grammar;

    fn consumes(grammar: &str) -> bool {
        let grammar = parse_grammar(grammar).unwrap();
        let table = RuleTable::new(&grammar);

        table.always_consumes_on_success(&grammar.rules[0].expression)
    }

    #[test]
    fn leaves() {
        assert!(consumes("start = 'a'"));
        assert!(!consumes("start = ''"));
        assert!(consumes("start = [a-z]"));
        assert!(consumes("start = ."));
    }

    #[test]
    fn composites() {
        assert!(consumes("start = 'a'? 'b'"));
        assert!(!consumes("start = 'a'? 'b'*"));
        assert!(!consumes("start = 'a' / ''"));
        assert!(consumes("start = x:'a'+ { x }"));
        assert!(!consumes("start = &'a' !'b' &{ p } !{ q }"));
    }

    #[test]
    fn follows_rules() {
        assert!(consumes("start = a\na = 'a'"));
        assert!(!consumes("start = a\na = b?\nb = 'b'"));
    }
}
