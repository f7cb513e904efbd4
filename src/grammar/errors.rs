use crate::location::{Location, Position};
use crate::report::pretty_format;
use thiserror::Error;

/// Error raised when a grammar's text does not follow the grammar notation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{content} (at {})", .location.start)]
pub struct GrammarSyntaxError {
    location: Location,
    content: GrammarSyntaxErrorContent,
    tip: Option<&'static str>,
}

impl GrammarSyntaxError {
    pub(crate) fn new(
        location: Location,
        content: GrammarSyntaxErrorContent,
        tip: Option<&'static str>,
    ) -> Self {
        Self {
            location,
            content,
            tip,
        }
    }

    /// Get the location of the error
    pub fn location(&self) -> Location {
        self.location
    }

    /// Get the position the error starts at
    pub fn position(&self) -> Position {
        self.location.start
    }

    /// Get the error's content
    pub fn content(&self) -> &GrammarSyntaxErrorContent {
        &self.content
    }

    /// Get the error's message
    pub fn message(&self) -> String {
        self.content.to_string()
    }

    /// Get the optional error's tip
    pub fn tip(&self) -> Option<&'static str> {
        self.tip
    }

    /// Format the error in a human-readable way, showing the faulty line of the grammar
    pub fn pretty(&self, grammar: &str) -> String {
        pretty_format(grammar, self.location, &self.message(), self.tip)
    }
}

/// Content of a [`GrammarSyntaxError`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarSyntaxErrorContent {
    #[error("Expected a rule declaration")]
    ExpectedRuleDeclaration,

    #[error("Expected rule assignment operator (=)")]
    ExpectedRuleAssignmentOp,

    #[error("Expected an expression")]
    ExpectedExpression,

    #[error("Expected a label or an expression after '{0}'")]
    ExpectedAfterPrefix(char),

    #[error("Expected a closing parenthesis")]
    UnclosedGroup { started_at: Position },

    #[error("Unterminated string literal")]
    UnterminatedLiteral { started_at: Position },

    #[error("Unterminated character class")]
    UnterminatedClass { started_at: Position },

    #[error("Unterminated code block")]
    UnterminatedCodeBlock { started_at: Position },

    #[error("Unterminated multi-line comment")]
    UnterminatedComment { started_at: Position },

    #[error("Invalid escape sequence")]
    InvalidEscape,

    #[error("Invalid character range: {from}-{to}")]
    InvalidClassRange { from: char, to: char },

    #[error("Identifier '{0}' is a reserved word")]
    ReservedWord(String),

    #[error("Illegal symbol '{0}'")]
    IllegalSymbol(char),

    #[error("Unexpected end of grammar")]
    UnexpectedEnd,
}
