use crate::ast::{ClassPart, Expression, ExpressionKind, Grammar};
use crate::compiler::GrammarError;

/// Generate a grammar's source from its syntax tree
///
/// Parsing the generated source gives back an equivalent grammar: groups may be added where
/// the notation requires them. Comments and formatting of the original source are not restored.
///
/// The notation only has display names at the root of rules, so trees holding one anywhere
/// else (which can only be built by hand or deserialized) are rejected.
pub fn gen_grammar(grammar: &Grammar) -> Result<String, GrammarError> {
    check_display_names(grammar)?;

    let mut out = String::new();

    if let Some(initializer) = &grammar.initializer {
        out.push_str(&gen_code(&initializer.code));
        out.push_str("\n\n");
    }

    let rules: Vec<String> = grammar
        .rules
        .iter()
        .map(|rule| match &rule.expression.kind {
            ExpressionKind::Named { name, expression } => format!(
                "{} \"{}\" = {}",
                rule.name,
                escape_literal(name),
                gen_expression(expression)
            ),
            _ => format!("{} = {}", rule.name, gen_expression(&rule.expression)),
        })
        .collect();

    out.push_str(&rules.join("\n"));
    out.push('\n');
    Ok(out)
}

/// Find display names which are not at the root of their rule
fn check_display_names(grammar: &Grammar) -> Result<(), GrammarError> {
    for rule in &grammar.rules {
        let body = match &rule.expression.kind {
            ExpressionKind::Named { expression, .. } => expression,
            _ => &rule.expression,
        };

        let mut nested = None;

        body.walk(&mut |expression| {
            if let ExpressionKind::Named { name, .. } = &expression.kind {
                nested.get_or_insert((name, expression.location));
            }
        });

        if let Some((name, location)) = nested {
            return Err(GrammarError::custom(
                format!(
                    "Display name \"{}\" of rule \"{}\" is not at the root of the rule.",
                    name, rule.name
                ),
                location,
            ));
        }
    }

    Ok(())
}

/// Generate the source of a single expression
///
/// Display names have no place inside expressions in the notation: only their inner
/// expression is rendered.
pub fn gen_expression(expression: &Expression) -> String {
    match &expression.kind {
        ExpressionKind::Literal { value, ignore_case } => format!(
            "\"{}\"{}",
            escape_literal(value),
            if *ignore_case { "i" } else { "" }
        ),

        ExpressionKind::Class {
            parts,
            inverted,
            ignore_case,
        } => escape_class(parts, *inverted, *ignore_case),

        ExpressionKind::Any => ".".to_string(),
        ExpressionKind::RuleRef { name } => name.clone(),

        ExpressionKind::Sequence { elements } => elements
            .iter()
            .map(|element| gen_operand(element, Precedence::Labeled))
            .collect::<Vec<_>>()
            .join(" "),

        ExpressionKind::Choice { alternatives } => alternatives
            .iter()
            .map(|alternative| gen_operand(alternative, Precedence::Action))
            .collect::<Vec<_>>()
            .join(" / "),

        ExpressionKind::Labeled { label, expression } => {
            format!("{}:{}", label, gen_operand(expression, Precedence::Prefixed))
        }

        ExpressionKind::Named { expression, .. } => gen_expression(expression),

        ExpressionKind::Action { expression, code } => format!(
            "{} {}",
            gen_operand(expression, Precedence::Sequence),
            gen_code(code)
        ),

        ExpressionKind::Text { expression } => {
            format!("${}", gen_operand(expression, Precedence::Suffixed))
        }
        ExpressionKind::SimpleAnd { expression } => {
            format!("&{}", gen_operand(expression, Precedence::Suffixed))
        }
        ExpressionKind::SimpleNot { expression } => {
            format!("!{}", gen_operand(expression, Precedence::Suffixed))
        }

        ExpressionKind::Optional { expression } => {
            format!("{}?", gen_operand(expression, Precedence::Primary))
        }
        ExpressionKind::ZeroOrMore { expression } => {
            format!("{}*", gen_operand(expression, Precedence::Primary))
        }
        ExpressionKind::OneOrMore { expression } => {
            format!("{}+", gen_operand(expression, Precedence::Primary))
        }

        ExpressionKind::Group { expression } => format!("({})", gen_expression(expression)),

        ExpressionKind::SemanticAnd { code } => format!("&{}", gen_code(code)),
        ExpressionKind::SemanticNot { code } => format!("!{}", gen_code(code)),
    }
}

/// Levels of the notation, from the loosest to the tightest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Precedence {
    Choice,
    Action,
    Sequence,
    Labeled,
    Prefixed,
    Suffixed,
    Primary,
}

impl Precedence {
    fn of(kind: &ExpressionKind) -> Self {
        match kind {
            ExpressionKind::Choice { .. } => Self::Choice,
            ExpressionKind::Action { .. } => Self::Action,
            ExpressionKind::Sequence { .. } => Self::Sequence,
            ExpressionKind::Labeled { .. } => Self::Labeled,

            ExpressionKind::Text { .. }
            | ExpressionKind::SimpleAnd { .. }
            | ExpressionKind::SimpleNot { .. }
            | ExpressionKind::SemanticAnd { .. }
            | ExpressionKind::SemanticNot { .. } => Self::Prefixed,

            ExpressionKind::Optional { .. }
            | ExpressionKind::ZeroOrMore { .. }
            | ExpressionKind::OneOrMore { .. } => Self::Suffixed,

            ExpressionKind::Named { expression, .. } => Self::of(&expression.kind),

            ExpressionKind::Literal { .. }
            | ExpressionKind::Class { .. }
            | ExpressionKind::Any
            | ExpressionKind::RuleRef { .. }
            | ExpressionKind::Group { .. } => Self::Primary,
        }
    }
}

/// Generate an expression used where the notation expects at least the given level
fn gen_operand(expression: &Expression, min: Precedence) -> String {
    let generated = gen_expression(expression);

    if Precedence::of(&expression.kind) < min {
        format!("({})", generated)
    } else {
        generated
    }
}

fn gen_code(code: &str) -> String {
    if code.is_empty() {
        "{}".to_string()
    } else {
        format!("{{ {} }}", code)
    }
}

/// Escape a string to be put between double quotes
pub(crate) fn escape_literal(value: &str) -> String {
    value.chars().map(|c| escape_char(c, &['"'])).collect()
}

/// Generate a class in the grammar's notation (e.g. `[^a-z_]i`)
pub(crate) fn escape_class(parts: &[ClassPart], inverted: bool, ignore_case: bool) -> String {
    const SPECIAL: &[char] = &[']', '^', '-'];

    let mut out = String::from("[");

    if inverted {
        out.push('^');
    }

    for part in parts {
        match *part {
            ClassPart::Char(c) => out.push_str(&escape_char(c, SPECIAL)),
            ClassPart::Range(from, to) => {
                out.push_str(&escape_char(from, SPECIAL));
                out.push('-');
                out.push_str(&escape_char(to, SPECIAL));
            }
        }
    }

    out.push(']');

    if ignore_case {
        out.push('i');
    }

    out
}

fn escape_char(c: char, special: &[char]) -> String {
    match c {
        '\n' => "\\n".to_string(),
        '\r' => "\\r".to_string(),
        '\t' => "\\t".to_string(),
        '\\' => "\\\\".to_string(),
        c if special.contains(&c) => format!("\\{}", c),
        c if c.is_control() && u32::from(c) <= 0xFF => format!("\\x{:02X}", u32::from(c)),
        c if c.is_control() => format!("\\u{{{:X}}}", u32::from(c)),
        c => c.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::parse_grammar;

    /// Compare two grammars, ignoring locations
    fn same_tree(a: &Grammar, b: &Grammar) -> bool {
        let strip = |grammar: &Grammar| {
            let mut value = serde_json::to_value(grammar).unwrap();
            strip_locations(&mut value);
            value
        };

        strip(a) == strip(b)
    }

    fn strip_locations(value: &mut serde_json::Value) {
        match value {
            serde_json::Value::Object(map) => {
                map.remove("location");
                map.values_mut().for_each(strip_locations);
            }
            serde_json::Value::Array(items) => items.iter_mut().for_each(strip_locations),
            _ => {}
        }
    }

    #[test]
    fn regenerates_parsable_grammars() {
        let source = r#"
            { let count = 0; }

            start "entry point" = head:(a:"a" / [^\]\-x-z]i) tail:$(!"\n" .)* { return [head, tail]; }
            list = item ("," item)* ","?
            item = &{ ok } "x\"y\\"i / !{ ko } 'z' / (("a" "b") / "c")+
        "#;

        let grammar = parse_grammar(source).unwrap();
        let generated = gen_grammar(&grammar).unwrap();
        let reparsed = parse_grammar(&generated).unwrap();

        assert!(same_tree(&grammar, &reparsed), "{}", generated);
    }

    #[test]
    fn adds_groups_required_by_the_notation() {
        let grammar = parse_grammar("start = $('a' / 'b')").unwrap();

        // Unwrap the group, as simplification would
        let kind = match &grammar.rules[0].expression.kind {
            ExpressionKind::Text { expression } => match &expression.kind {
                ExpressionKind::Group { expression } => ExpressionKind::Text {
                    expression: expression.clone(),
                },
                other => panic!("unexpected node {:?}", other),
            },
            other => panic!("unexpected node {:?}", other),
        };

        let expression = Expression::new(kind, Default::default());
        assert_eq!(gen_expression(&expression), "$(\"a\" / \"b\")");
    }

    #[test]
    fn rejects_nested_display_names() {
        let mut grammar = parse_grammar("start \"entry\" = 'a' inner\ninner = 'b'").unwrap();

        // Nest a display name below the root, as only a hand-built tree can
        grammar.rules[1].expression = grammar.rules[1]
            .expression
            .clone()
            .wrap(|expression| ExpressionKind::Named {
                name: "inner name".to_string(),
                expression,
            })
            .wrap(|expression| ExpressionKind::Group { expression });

        let err = gen_grammar(&grammar).unwrap_err();

        assert_eq!(err.kind(), crate::compiler::GrammarErrorKind::Custom);
        assert_eq!(
            err.message(),
            "Display name \"inner name\" of rule \"inner\" is not at the root of the rule."
        );

        // Root display names are kept
        grammar.rules.pop();
        assert!(gen_grammar(&grammar).unwrap().starts_with("start \"entry\" = "));
    }

    #[test]
    fn escapes_special_characters() {
        assert_eq!(escape_literal("a\"b\\c\n\u{0}"), "a\\\"b\\\\c\\n\\x00");
        assert_eq!(
            escape_class(
                &[ClassPart::Char(']'), ClassPart::Range('a', 'z'), ClassPart::Char('-')],
                true,
                false
            ),
            "[^\\]a-z\\-]"
        );
    }
}
