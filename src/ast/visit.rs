use super::{Expression, ExpressionKind, Grammar};
use std::slice;

impl ExpressionKind {
    /// Get the direct sub-expressions of a node, in evaluation order
    pub fn children(&self) -> &[Expression] {
        match self {
            Self::Literal { .. }
            | Self::Class { .. }
            | Self::Any
            | Self::RuleRef { .. }
            | Self::SemanticAnd { .. }
            | Self::SemanticNot { .. } => &[],

            Self::Sequence { elements } => elements,
            Self::Choice { alternatives } => alternatives,

            Self::Labeled { expression, .. }
            | Self::Named { expression, .. }
            | Self::Action { expression, .. }
            | Self::Text { expression }
            | Self::Optional { expression }
            | Self::ZeroOrMore { expression }
            | Self::OneOrMore { expression }
            | Self::Group { expression }
            | Self::SimpleAnd { expression }
            | Self::SimpleNot { expression } => slice::from_ref(expression.as_ref()),
        }
    }

    /// Mutable counterpart of [`ExpressionKind::children`]
    pub fn children_mut(&mut self) -> &mut [Expression] {
        match self {
            Self::Literal { .. }
            | Self::Class { .. }
            | Self::Any
            | Self::RuleRef { .. }
            | Self::SemanticAnd { .. }
            | Self::SemanticNot { .. } => &mut [],

            Self::Sequence { elements } => elements,
            Self::Choice { alternatives } => alternatives,

            Self::Labeled { expression, .. }
            | Self::Named { expression, .. }
            | Self::Action { expression, .. }
            | Self::Text { expression }
            | Self::Optional { expression }
            | Self::ZeroOrMore { expression }
            | Self::OneOrMore { expression }
            | Self::Group { expression }
            | Self::SimpleAnd { expression }
            | Self::SimpleNot { expression } => slice::from_mut(expression.as_mut()),
        }
    }

    /// Name of the variant, as used in the serialized tree
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Literal { .. } => "literal",
            Self::Class { .. } => "class",
            Self::Any => "any",
            Self::RuleRef { .. } => "rule_ref",
            Self::Sequence { .. } => "sequence",
            Self::Choice { .. } => "choice",
            Self::Labeled { .. } => "labeled",
            Self::Named { .. } => "named",
            Self::Action { .. } => "action",
            Self::Text { .. } => "text",
            Self::Optional { .. } => "optional",
            Self::ZeroOrMore { .. } => "zero_or_more",
            Self::OneOrMore { .. } => "one_or_more",
            Self::Group { .. } => "group",
            Self::SimpleAnd { .. } => "simple_and",
            Self::SimpleNot { .. } => "simple_not",
            Self::SemanticAnd { .. } => "semantic_and",
            Self::SemanticNot { .. } => "semantic_not",
        }
    }
}

impl Expression {
    /// Visit this node and all its descendants, parents first
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Expression)) {
        visit(self);

        for child in self.kind.children() {
            child.walk(visit);
        }
    }

    /// Visit this node and all its descendants mutably, parents first
    pub fn walk_mut(&mut self, visit: &mut impl FnMut(&mut Expression)) {
        visit(self);

        for child in self.kind.children_mut() {
            child.walk_mut(visit);
        }
    }

    /// Rebuild the tree bottom-up: children are rewritten before their parent is handed to `rewrite`
    pub fn rewrite(mut self, rewrite: &mut impl FnMut(Expression) -> Expression) -> Expression {
        for child in self.kind.children_mut() {
            let taken = std::mem::replace(child, Expression::placeholder());
            *child = taken.rewrite(rewrite);
        }

        rewrite(self)
    }

    /// Cheap node used while moving children around
    fn placeholder() -> Self {
        Self::new(ExpressionKind::Any, Default::default())
    }
}

impl Grammar {
    /// Apply a bottom-up rewrite to every rule's expression
    pub fn rewrite_expressions(mut self, rewrite: &mut impl FnMut(Expression) -> Expression) -> Self {
        for rule in &mut self.rules {
            let taken = std::mem::replace(&mut rule.expression, Expression::placeholder());
            rule.expression = taken.rewrite(rewrite);
        }

        self
    }

    /// Visit every expression node of every rule
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Expression)) {
        for rule in &self.rules {
            rule.expression.walk(visit);
        }
    }
}
