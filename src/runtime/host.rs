use super::Value;
use crate::location::{LineIndex, Location};
use std::cell::OnceCell;
use std::convert::Infallible;
use std::ops::Range;
use thiserror::Error;

/// Runs the code embedded in a grammar (initializer, actions and semantic predicates)
///
/// The runtime never interprets code itself: it hands each code block to the host, along
/// with its [context](CodeContext). Returning an error aborts the parse immediately, even
/// when a later alternative could have matched.
pub trait Host {
    /// Values produced by actions
    type Value: Clone;

    /// Errors raised by the host's own code, see [`CodeError::Host`]
    type Error;

    /// Run the grammar's initializer, once per parse, before matching starts
    fn initialize(
        &mut self,
        code: &str,
        ctx: &CodeContext<'_, Self::Value>,
    ) -> Result<(), CodeError<Self::Error>> {
        let _ = (code, ctx);
        Ok(())
    }

    /// Run an action, its result becoming the value of the enclosing expression
    fn action(
        &mut self,
        code: &str,
        ctx: &CodeContext<'_, Self::Value>,
    ) -> Result<Value<Self::Value>, CodeError<Self::Error>>;

    /// Evaluate a semantic predicate
    fn predicate(
        &mut self,
        code: &str,
        ctx: &CodeContext<'_, Self::Value>,
    ) -> Result<bool, CodeError<Self::Error>>;
}

/// Ways for host code to abort a parse
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeError<E> {
    /// Propagated as [`ParseError::Host`](super::ParseError::Host)
    Host(E),

    /// Propagated as a syntax error with the provided message
    Message(String),

    /// Propagated as a syntax error expecting the provided description instead of the matched text
    Expected(String),
}

/// What host code can see of a match
pub struct CodeContext<'a, T> {
    input: &'a str,
    range: Range<usize>,
    labels: &'a [(&'a str, Value<T>)],
    value: Option<&'a Value<T>>,
    lines: &'a OnceCell<LineIndex>,
}

impl<'a, T> CodeContext<'a, T> {
    pub(crate) fn new(
        input: &'a str,
        range: Range<usize>,
        labels: &'a [(&'a str, Value<T>)],
        value: Option<&'a Value<T>>,
        lines: &'a OnceCell<LineIndex>,
    ) -> Self {
        Self {
            input,
            range,
            labels,
            value,
            lines,
        }
    }

    /// The whole input being parsed
    pub fn input(&self) -> &'a str {
        self.input
    }

    /// Input consumed by the expression the code is attached to (empty for predicates)
    pub fn text(&self) -> &'a str {
        &self.input[self.range.clone()]
    }

    /// Byte offset the expression started at
    pub fn offset(&self) -> usize {
        self.range.start
    }

    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }

    pub fn location(&self) -> Location {
        self.lines
            .get_or_init(|| LineIndex::new(self.input))
            .location(self.input, self.range.start, self.range.end)
    }

    /// Value of the expression an action is attached to
    pub fn value(&self) -> Option<&'a Value<T>> {
        self.value
    }

    /// Get the value bound to a label, the innermost binding winning
    pub fn label(&self, name: &str) -> Option<&'a Value<T>> {
        self.labels
            .iter()
            .rev()
            .find(|(label, _)| *label == name)
            .map(|(_, value)| value)
    }

    /// Every label in scope, outermost first
    pub fn labels(&self) -> impl Iterator<Item = (&'a str, &'a Value<T>)> + 'a {
        self.labels.iter().map(|(label, value)| (*label, value))
    }

    /// Build an error aborting the parse with a custom message
    pub fn error<E>(&self, message: impl Into<String>) -> CodeError<E> {
        CodeError::Message(message.into())
    }

    /// Build an error aborting the parse as if `description` was expected instead of the matched text
    pub fn expected<E>(&self, description: impl Into<String>) -> CodeError<E> {
        CodeError::Expected(description.into())
    }
}

/// Host for grammars without any code, rejecting every code block
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHost;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("grammar code is not supported without a host: {{{code}}}")]
pub struct UnsupportedCode {
    pub code: String,
}

impl NoHost {
    fn reject<T>(code: &str) -> Result<T, CodeError<UnsupportedCode>> {
        Err(CodeError::Host(UnsupportedCode {
            code: code.to_string(),
        }))
    }
}

impl Host for NoHost {
    type Value = Infallible;
    type Error = UnsupportedCode;

    fn initialize(
        &mut self,
        code: &str,
        _: &CodeContext<'_, Self::Value>,
    ) -> Result<(), CodeError<Self::Error>> {
        Self::reject(code)
    }

    fn action(
        &mut self,
        code: &str,
        _: &CodeContext<'_, Self::Value>,
    ) -> Result<Value<Self::Value>, CodeError<Self::Error>> {
        Self::reject(code)
    }

    fn predicate(
        &mut self,
        code: &str,
        _: &CodeContext<'_, Self::Value>,
    ) -> Result<bool, CodeError<Self::Error>> {
        Self::reject(code)
    }
}
