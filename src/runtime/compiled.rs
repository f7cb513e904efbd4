use super::Expectation;
use crate::ast::ClassPart;

pub(crate) type RuleId = usize;
pub(crate) type ExpectationId = usize;

/// A grammar ready to be run, produced by the [compiler](crate::compiler::generate_compiled)
///
/// Rule references are resolved to indexes, and matchers for literals and classes are precomputed.
/// A compiled grammar is never modified once built, which allows sharing it between threads.
#[derive(Debug)]
pub struct CompiledGrammar {
    pub(crate) rules: Vec<CompiledRule>,

    /// Every descriptor failures may report, referenced by index from the nodes
    pub(crate) expectations: Vec<Expectation>,
    pub(crate) end_expectation: ExpectationId,

    pub(crate) initializer: Option<String>,

    /// Allowed start rules, the first one being the default
    pub(crate) start_rules: Vec<RuleId>,

    pub(crate) cache: bool,
    pub(crate) trace: bool,
}

impl CompiledGrammar {
    /// Names of the rules, in declaration order
    pub fn rule_names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|rule| rule.name.as_str())
    }

    /// Names of the rules parsing may start from, the first one being the default
    pub fn start_rules(&self) -> impl Iterator<Item = &str> {
        self.start_rules
            .iter()
            .map(|&id| self.rules[id].name.as_str())
    }

    /// Whether rule results are memoized during a parse
    pub fn is_cached(&self) -> bool {
        self.cache
    }

    /// Whether parsers report rule events to tracers
    pub fn is_traced(&self) -> bool {
        self.trace
    }

    /// Find an allowed start rule by its name
    pub(crate) fn start_rule(&self, name: &str) -> Option<RuleId> {
        self.start_rules
            .iter()
            .copied()
            .find(|&id| self.rules[id].name == name)
    }
}

#[derive(Debug)]
pub(crate) struct CompiledRule {
    pub(crate) name: String,
    pub(crate) node: Node,
}

/// Compiled counterpart of [`ExpressionKind`](crate::ast::ExpressionKind)
#[derive(Debug)]
pub(crate) enum Node {
    Literal {
        matcher: LiteralMatcher,
        expectation: ExpectationId,
    },
    Class {
        matcher: ClassMatcher,
        expectation: ExpectationId,
    },
    Any {
        expectation: ExpectationId,
    },
    RuleRef {
        rule: RuleId,
    },
    Sequence(Vec<Node>),
    Choice(Vec<Node>),
    Labeled {
        label: String,
        node: Box<Node>,
    },
    Named {
        expectation: ExpectationId,
        node: Box<Node>,
    },
    Action {
        node: Box<Node>,
        code: String,
    },
    Text(Box<Node>),
    Optional(Box<Node>),
    ZeroOrMore(Box<Node>),
    OneOrMore(Box<Node>),
    Group(Box<Node>),
    SimpleAnd(Box<Node>),
    SimpleNot(Box<Node>),
    SemanticAnd(String),
    SemanticNot(String),
}

/// Precomputed literal comparison
#[derive(Debug)]
pub(crate) struct LiteralMatcher {
    value: String,
    ignore_case: bool,

    /// Number of characters, as case-insensitive matches may not have the same byte length
    char_len: usize,

    /// Lowercase form of the literal
    folded: String,
}

impl LiteralMatcher {
    pub(crate) fn new(value: &str, ignore_case: bool) -> Self {
        Self {
            value: value.to_string(),
            ignore_case,
            char_len: value.chars().count(),
            folded: value.to_lowercase(),
        }
    }

    pub(crate) fn value(&self) -> &str {
        &self.value
    }

    pub(crate) fn ignores_case(&self) -> bool {
        self.ignore_case
    }

    /// Get the offset the literal ends at, if it is found at `pos`
    pub(crate) fn match_at(&self, input: &str, pos: usize) -> Option<usize> {
        let rest = &input[pos..];

        if !self.ignore_case {
            return rest
                .starts_with(self.value.as_str())
                .then(|| pos + self.value.len());
        }

        let mut chars = rest.char_indices();
        let len = match chars.nth(self.char_len) {
            Some((len, _)) => len,
            None if rest.chars().count() == self.char_len => rest.len(),
            None => return None,
        };

        rest[..len]
            .chars()
            .flat_map(char::to_lowercase)
            .eq(self.folded.chars())
            .then(|| pos + len)
    }
}

/// Precomputed class membership test
#[derive(Debug)]
pub(crate) struct ClassMatcher {
    /// Sorted, non-overlapping and non-adjacent ranges
    ranges: Vec<(char, char)>,
    inverted: bool,
    ignore_case: bool,

    /// Membership of ASCII characters, one bit per character
    ascii: Option<u128>,
}

impl ClassMatcher {
    pub(crate) fn new(parts: &[ClassPart], inverted: bool, ignore_case: bool, bitmap: bool) -> Self {
        let mut bounds: Vec<(char, char)> = parts.iter().map(|part| part.bounds()).collect();
        bounds.sort_unstable();

        let mut ranges: Vec<(char, char)> = Vec::with_capacity(bounds.len());

        for (from, to) in bounds {
            match ranges.last_mut() {
                Some((_, last)) if u32::from(from) <= u32::from(*last) + 1 => {
                    *last = (*last).max(to);
                }
                _ => ranges.push((from, to)),
            }
        }

        let ascii = bitmap.then(|| {
            ranges
                .iter()
                .filter(|(from, _)| from.is_ascii())
                .fold(0u128, |bits, &(from, to)| {
                    let to = u32::from(to).min(127);
                    (u32::from(from)..=to).fold(bits, |bits, c| bits | 1 << c)
                })
        });

        Self {
            ranges,
            inverted,
            ignore_case,
            ascii,
        }
    }

    pub(crate) fn matches(&self, c: char) -> bool {
        let found = self.contains(c)
            || (self.ignore_case
                && (c.to_lowercase().any(|c| self.contains(c))
                    || c.to_uppercase().any(|c| self.contains(c))));

        found != self.inverted
    }

    fn contains(&self, c: char) -> bool {
        match self.ascii {
            Some(bits) if c.is_ascii() => bits & (1 << u32::from(c)) != 0,
            _ => self
                .ranges
                .binary_search_by(|&(from, to)| {
                    if to < c {
                        std::cmp::Ordering::Less
                    } else if from > c {
                        std::cmp::Ordering::Greater
                    } else {
                        std::cmp::Ordering::Equal
                    }
                })
                .is_ok(),
        }
    }
}
