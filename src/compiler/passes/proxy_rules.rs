use crate::ast::{ExpressionKind, Grammar};
use crate::compiler::{CompilerOptions, GrammarError, Pass};
use log::debug;

/// Remove rules which only refer to another rule (e.g. `value = number`)
///
/// References to a proxy rule are redirected to its target. Proxy rules
/// which are allowed start rules are kept, as parsers may be started from them.
pub struct RemoveProxyRules;

impl Pass for RemoveProxyRules {
    fn name(&self) -> &str {
        "remove_proxy_rules"
    }

    fn run(&self, mut grammar: Grammar, options: &CompilerOptions) -> Result<Grammar, GrammarError> {
        let start_rules: Vec<String> = options
            .start_rules(grammar.rules.first().map(|rule| rule.name.as_str()))
            .into_iter()
            .map(str::to_string)
            .collect();

        let mut removed = vec![];

        for i in 0..grammar.rules.len() {
            let (proxy, target) = match &grammar.rules[i].expression.kind {
                ExpressionKind::RuleRef { name } if *name != grammar.rules[i].name => {
                    (grammar.rules[i].name.clone(), name.clone())
                }
                _ => continue,
            };

            for rule in &mut grammar.rules {
                rule.expression.walk_mut(&mut |expression| {
                    if let ExpressionKind::RuleRef { name } = &mut expression.kind {
                        if *name == proxy {
                            *name = target.clone();
                        }
                    }
                });
            }

            if !start_rules.contains(&proxy) {
                removed.push(i);
            }
        }

        for &i in removed.iter().rev() {
            let rule = grammar.rules.remove(i);
            debug!("Removed proxy rule '{}'", rule.name);
        }

        Ok(grammar)
    }
}
