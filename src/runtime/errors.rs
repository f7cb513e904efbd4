use crate::ast::ClassPart;
use crate::generators::{escape_class, escape_literal};
use crate::location::Location;
use crate::report::pretty_format;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Something the parser would have accepted at the failure offset
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Expectation {
    Literal {
        text: String,
        #[serde(rename = "ignoreCase")]
        ignore_case: bool,
    },
    Class {
        parts: Vec<ClassPart>,
        inverted: bool,
        #[serde(rename = "ignoreCase")]
        ignore_case: bool,
    },
    Any,
    End,

    /// Display name of a rule
    Other { description: String },
}

impl Expectation {
    /// Human-readable description, as used in error messages
    pub fn description(&self) -> String {
        match self {
            Self::Literal { text, ignore_case } => format!(
                "\"{}\"{}",
                escape_literal(text),
                if *ignore_case { "i" } else { "" }
            ),
            Self::Class {
                parts,
                inverted,
                ignore_case,
            } => escape_class(parts, *inverted, *ignore_case),
            Self::Any => "any character".to_string(),
            Self::End => "end of input".to_string(),
            Self::Other { description } => description.clone(),
        }
    }
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Error raised when an input doesn't match a grammar
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{message}")]
pub struct SyntaxError {
    message: String,
    expected: Vec<Expectation>,
    found: Option<String>,
    location: Location,
}

impl SyntaxError {
    /// Build an error from what was expected at a location and what was found there instead
    pub(crate) fn new(expected: Vec<Expectation>, found: Option<String>, location: Location) -> Self {
        Self {
            message: build_message(&expected, found.as_deref()),
            expected,
            found,
            location,
        }
    }

    /// Error with a message of its own, raised by host code
    pub(crate) fn custom(message: String, location: Location) -> Self {
        Self {
            message,
            expected: vec![],
            found: None,
            location,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// What would have matched, without duplicates, in the order failures were met
    pub fn expected(&self) -> &[Expectation] {
        &self.expected
    }

    /// The character found at the failure offset, `None` at end of input
    pub fn found(&self) -> Option<&str> {
        self.found.as_deref()
    }

    pub fn location(&self) -> Location {
        self.location
    }

    /// Format the error in a human-readable way, showing the faulty line of the input
    pub fn pretty(&self, input: &str) -> String {
        pretty_format(input, self.location, &self.message, None)
    }
}

fn build_message(expected: &[Expectation], found: Option<&str>) -> String {
    let found = match found {
        Some(found) => format!("\"{}\"", escape_literal(found)),
        None => "end of input".to_string(),
    };

    let descriptions: Vec<String> = expected.iter().map(Expectation::description).collect();

    let expected = match descriptions.as_slice() {
        [] => return format!("Unexpected {}.", found),
        [single] => single.clone(),
        [first, second] => format!("{} or {}", first, second),
        [init @ .., last] => format!("{}, or {}", init.join(", "), last),
    };

    format!("Expected {} but {} found.", expected, found)
}

/// Error raised by [`Parser`](super::Parser) methods
///
/// `E` is the error type of the [host](super::Host) running the grammar's code.
#[derive(Debug, Error)]
pub enum ParseError<E> {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error("\"{0}\" is not an allowed start rule")]
    InvalidStartRule(String),

    /// Error returned by host code, untouched
    #[error("host code failed: {0}")]
    Host(E),

    #[error("more than {limit} nested rules at offset {offset}")]
    RecursionLimit { limit: usize, offset: usize },
}

impl<E> ParseError<E> {
    /// Get the syntax error, if this is one
    pub fn as_syntax(&self) -> Option<&SyntaxError> {
        match self {
            Self::Syntax(err) => Some(err),
            _ => None,
        }
    }

    /// Get the host's error, if this is one
    pub fn into_host(self) -> Option<E> {
        match self {
            Self::Host(err) => Some(err),
            _ => None,
        }
    }
}
