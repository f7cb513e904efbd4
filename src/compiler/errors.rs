use crate::location::Location;
use crate::report::pretty_format;
use thiserror::Error;

/// Semantic error found by a compiler pass
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct GrammarError {
    kind: GrammarErrorKind,
    message: String,
    location: Location,
}

impl GrammarError {
    pub fn new(kind: GrammarErrorKind, message: impl Into<String>, location: Location) -> Self {
        Self {
            kind,
            message: message.into(),
            location,
        }
    }

    /// Error raised by a pass which is not part of the default pipeline
    pub fn custom(message: impl Into<String>, location: Location) -> Self {
        Self::new(GrammarErrorKind::Custom, message, location)
    }

    pub fn kind(&self) -> GrammarErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn location(&self) -> Location {
        self.location
    }

    /// Format the error in a human-readable way, showing the faulty line of the grammar
    pub fn pretty(&self, grammar: &str) -> String {
        pretty_format(grammar, self.location, &self.message, None)
    }
}

/// Category of a [`GrammarError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrammarErrorKind {
    DuplicateRule,
    UndefinedRule,
    UnknownStartRule,
    DuplicateLabel,
    LeftRecursion,
    InfiniteRepetition,
    Custom,
}
