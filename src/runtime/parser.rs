use super::executor::{Executor, TraceSink};
use super::tracer::LogTracer;
use super::{CompiledGrammar, Host, ParseError, Tracer, Value};
use std::sync::Arc;

/// Default maximum number of nested rule invocations
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// A compiled grammar, ready to parse inputs
///
/// Parsers are cheap to clone and can be shared between threads: every parse owns its state.
#[derive(Debug, Clone)]
pub struct Parser {
    grammar: Arc<CompiledGrammar>,
}

impl Parser {
    pub fn new(grammar: CompiledGrammar) -> Self {
        Self {
            grammar: Arc::new(grammar),
        }
    }

    pub fn grammar(&self) -> &CompiledGrammar {
        &self.grammar
    }

    /// Parse a whole input from the default start rule
    pub fn parse<H: Host>(
        &self,
        input: &str,
        host: &mut H,
    ) -> Result<Value<H::Value>, ParseError<H::Error>> {
        self.parse_with(input, host, ParseOptions::default())
    }

    /// Parse a whole input
    pub fn parse_with<H: Host>(
        &self,
        input: &str,
        host: &mut H,
        options: ParseOptions<'_>,
    ) -> Result<Value<H::Value>, ParseError<H::Error>> {
        self.run(input, host, options, true).map(|(value, _)| value)
    }

    /// Match the start of an input, leaving the remaining input unconsumed
    pub fn parse_prefix<H: Host>(
        &self,
        input: &str,
        host: &mut H,
        options: ParseOptions<'_>,
    ) -> Result<PrefixMatch<H::Value>, ParseError<H::Error>> {
        self.run(input, host, options, false)
            .map(|(value, end)| PrefixMatch { value, end })
    }

    fn run<H: Host>(
        &self,
        input: &str,
        host: &mut H,
        options: ParseOptions<'_>,
        require_end: bool,
    ) -> Result<(Value<H::Value>, usize), ParseError<H::Error>> {
        let grammar = self.grammar.as_ref();

        let rule = match options.start_rule {
            Some(name) => grammar
                .start_rule(name)
                .ok_or_else(|| ParseError::InvalidStartRule(name.to_string()))?,
            None => match grammar.start_rules.first() {
                Some(&rule) => rule,
                None => return Err(ParseError::InvalidStartRule(String::new())),
            },
        };

        let tracer = match options.tracer {
            _ if !grammar.trace => TraceSink::Off,
            Some(tracer) => TraceSink::Custom(tracer),
            None => TraceSink::Log(LogTracer::new()),
        };

        Executor::new(grammar, input, host, tracer, options.max_depth).run(rule, require_end)
    }
}

/// Options of a single parse
pub struct ParseOptions<'a> {
    /// Rule to start from, must be one of the allowed start rules
    pub start_rule: Option<&'a str>,

    /// Receives rule events, if the grammar was compiled with tracing enabled
    pub tracer: Option<&'a mut dyn Tracer>,

    /// Maximum number of nested rule invocations
    pub max_depth: usize,
}

impl<'a> ParseOptions<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_rule(mut self, rule: &'a str) -> Self {
        self.start_rule = Some(rule);
        self
    }

    pub fn tracer(mut self, tracer: &'a mut dyn Tracer) -> Self {
        self.tracer = Some(tracer);
        self
    }

    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl<'a> Default for ParseOptions<'a> {
    fn default() -> Self {
        Self {
            start_rule: None,
            tracer: None,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Result of [`Parser::parse_prefix`]
#[derive(Debug, Clone, PartialEq)]
pub struct PrefixMatch<T> {
    pub value: Value<T>,

    /// Offset the match ended at
    pub end: usize,
}
