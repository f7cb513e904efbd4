//! # Grammar syntax tree
//!
//! This module contains the tree produced by the [grammar parser](crate::grammar::parse_grammar)
//! and consumed by the [compiler](crate::compiler::compile).
//!
//! The tree can be (de)serialized with `serde`: nodes are tagged with a `type` field using the
//! snake_case name of their variant (`rule_ref`, `zero_or_more`, ...).

mod visit;

use crate::location::Location;
use serde::{Deserialize, Serialize};

/// Root of a grammar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grammar {
    /// Host code run once before each parse
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initializer: Option<Initializer>,

    /// Rules, in declaration order
    pub rules: Vec<Rule>,

    #[serde(default)]
    pub location: Location,
}

impl Grammar {
    /// Find a rule by its name
    pub fn rule(&self, name: &str) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.name == name)
    }

    /// Get the index of a rule from its name
    pub fn rule_index(&self, name: &str) -> Option<usize> {
        self.rules.iter().position(|rule| rule.name == name)
    }
}

/// Host code evaluated before parsing starts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Initializer {
    pub code: String,

    #[serde(default)]
    pub location: Location,
}

/// A named rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub name: String,

    /// Rule's content. Rules with a display name have a [`ExpressionKind::Named`] expression.
    pub expression: Expression,

    #[serde(default)]
    pub location: Location,
}

impl Rule {
    /// Human-readable name used in error messages, if any
    pub fn display_name(&self) -> Option<&str> {
        match &self.expression.kind {
            ExpressionKind::Named { name, .. } => Some(name),
            _ => None,
        }
    }
}

/// A node of a rule's expression tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expression {
    #[serde(flatten)]
    pub kind: ExpressionKind,

    #[serde(default)]
    pub location: Location,
}

impl Expression {
    pub fn new(kind: ExpressionKind, location: Location) -> Self {
        Self { kind, location }
    }

    /// Wrap this expression into a new node of the same location
    pub fn wrap(self, build: impl FnOnce(Box<Expression>) -> ExpressionKind) -> Self {
        let location = self.location;
        Self::new(build(Box::new(self)), location)
    }
}

/// The closed set of expression shapes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExpressionKind {
    /// Match an exact string
    Literal {
        value: String,
        #[serde(default, rename = "ignoreCase")]
        ignore_case: bool,
    },

    /// Match a single character against a set
    Class {
        parts: Vec<ClassPart>,
        #[serde(default)]
        inverted: bool,
        #[serde(default, rename = "ignoreCase")]
        ignore_case: bool,
    },

    /// Match any single character
    Any,

    /// Match using another rule
    RuleRef { name: String },

    /// Match all elements, in order
    Sequence { elements: Vec<Expression> },

    /// Match the first alternative that succeeds
    Choice { alternatives: Vec<Expression> },

    /// Bind the inner value to a label, visible to enclosing actions
    Labeled {
        label: String,
        expression: Box<Expression>,
    },

    /// Report failures of the inner expression under a human-readable name
    Named {
        name: String,
        expression: Box<Expression>,
    },

    /// Run host code on success, the code's result becoming the value
    Action {
        expression: Box<Expression>,
        code: String,
    },

    /// Return the consumed input instead of the inner value
    Text { expression: Box<Expression> },

    /// `?`
    Optional { expression: Box<Expression> },

    /// `*`
    ZeroOrMore { expression: Box<Expression> },

    /// `+`
    OneOrMore { expression: Box<Expression> },

    /// Parenthesized expression, scopes labels
    Group { expression: Box<Expression> },

    /// `&expr`
    SimpleAnd { expression: Box<Expression> },

    /// `!expr`
    SimpleNot { expression: Box<Expression> },

    /// `&{ code }`
    SemanticAnd { code: String },

    /// `!{ code }`
    SemanticNot { code: String },
}

/// A member of a character class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClassPart {
    Char(char),
    Range(char, char),
}

impl ClassPart {
    /// Check if a character belongs to this part
    pub fn contains(self, c: char) -> bool {
        match self {
            Self::Char(single) => single == c,
            Self::Range(from, to) => (from..=to).contains(&c),
        }
    }

    /// Get the part as an inclusive range
    pub fn bounds(self) -> (char, char) {
        match self {
            Self::Char(c) => (c, c),
            Self::Range(from, to) => (from, to),
        }
    }
}
