use super::compiled::{CompiledGrammar, CompiledRule, ExpectationId, Node, RuleId};
use super::host::{CodeContext, CodeError, Host};
use super::tracer::{LogTracer, TraceEvent, TraceKind, Tracer};
use super::{Expectation, ParseError, SyntaxError, Value};
use crate::location::LineIndex;
use std::cell::OnceCell;
use std::collections::HashMap;

/// Remaining stack below which a rule invocation first grows the stack
const STACK_RED_ZONE: usize = 128 * 1024;

/// Size of each stack segment allocated when growing
const STACK_GROWTH: usize = 2 * 1024 * 1024;

/// Outcome of matching a node: `None` is an ordinary match failure
type Step<H> = Result<Option<Value<<H as Host>::Value>>, ParseError<<H as Host>::Error>>;

/// Destination of trace events for one parse
pub(super) enum TraceSink<'a> {
    Off,
    Log(LogTracer),
    Custom(&'a mut dyn Tracer),
}

impl<'a> TraceSink<'a> {
    fn is_off(&self) -> bool {
        matches!(self, Self::Off)
    }

    fn emit(&mut self, event: &TraceEvent<'_>) {
        match self {
            Self::Off => {}
            Self::Log(tracer) => tracer.trace(event),
            Self::Custom(tracer) => tracer.trace(event),
        }
    }
}

/// A memoized rule result
struct Memo<T> {
    end: usize,
    value: Option<Value<T>>,
}

/// State of a single parse
///
/// Every node leaves the cursor where it started when it fails, so alternatives and
/// repetitions can resume from their own starting offset.
pub(super) struct Executor<'g, 'a, H: Host> {
    grammar: &'g CompiledGrammar,
    input: &'a str,
    host: &'a mut H,
    tracer: TraceSink<'a>,
    max_depth: usize,

    /// Cursor, as a byte offset in the input
    pos: usize,

    /// Number of nested rule invocations
    depth: usize,

    /// Labels bound so far, innermost last
    scope: Vec<(&'g str, Value<H::Value>)>,

    memo: HashMap<(RuleId, usize), Memo<H::Value>>,

    /// Furthest offset a failure was recorded at, along with what was expected there
    max_fail_pos: usize,
    max_fail_expected: Vec<ExpectationId>,

    /// When non-zero, failures are not recorded
    silent: usize,

    lines: OnceCell<LineIndex>,
}

impl<'g, 'a, H: Host> Executor<'g, 'a, H> {
    pub(super) fn new(
        grammar: &'g CompiledGrammar,
        input: &'a str,
        host: &'a mut H,
        tracer: TraceSink<'a>,
        max_depth: usize,
    ) -> Self {
        Self {
            grammar,
            input,
            host,
            tracer,
            max_depth,
            pos: 0,
            depth: 0,
            scope: vec![],
            memo: HashMap::new(),
            max_fail_pos: 0,
            max_fail_expected: vec![],
            silent: 0,
            lines: OnceCell::new(),
        }
    }

    /// Match a rule at the start of the input
    ///
    /// Returns the value and the offset the match ended at. When `require_end` is set,
    /// matches which don't consume the whole input are failures.
    pub(super) fn run(
        mut self,
        rule: RuleId,
        require_end: bool,
    ) -> Result<(Value<H::Value>, usize), ParseError<H::Error>> {
        if let Some(code) = &self.grammar.initializer {
            let ctx = CodeContext::new(self.input, 0..0, &[], None, &self.lines);
            let result = self.host.initialize(code, &ctx);

            if let Err(err) = result {
                return Err(self.code_error(err, 0, 0));
            }
        }

        match self.call_rule(rule)? {
            Some(value) if !require_end || self.pos == self.input.len() => Ok((value, self.pos)),
            result => {
                if result.is_some() {
                    self.record_failure(self.grammar.end_expectation);
                }

                Err(self.syntax_error().into())
            }
        }
    }

    fn call_rule(&mut self, id: RuleId) -> Step<H> {
        let grammar = self.grammar;
        let rule = &grammar.rules[id];
        let start = self.pos;

        self.trace(TraceKind::Enter, rule, start, start);

        if grammar.cache {
            if let Some(memo) = self.memo.get(&(id, start)) {
                let (end, value) = (memo.end, memo.value.clone());
                self.pos = end;
                self.trace_exit(rule, start, value.is_some());
                return Ok(value);
            }
        }

        if self.depth >= self.max_depth {
            return Err(ParseError::RecursionLimit {
                limit: self.max_depth,
                offset: start,
            });
        }

        // Rule bodies don't see the labels of their callers
        let outer_scope = std::mem::take(&mut self.scope);
        self.depth += 1;

        // Nesting is bounded by `max_depth` rather than by the caller's stack size
        let result = stacker::maybe_grow(STACK_RED_ZONE, STACK_GROWTH, || self.eval(&rule.node));

        self.depth -= 1;
        self.scope = outer_scope;

        let value = result?;

        if grammar.cache {
            self.memo.insert(
                (id, start),
                Memo {
                    end: self.pos,
                    value: value.clone(),
                },
            );
        }

        self.trace_exit(rule, start, value.is_some());

        Ok(value)
    }

    fn eval(&mut self, node: &'g Node) -> Step<H> {
        match node {
            Node::Literal {
                matcher,
                expectation,
            } => match matcher.match_at(self.input, self.pos) {
                Some(end) => {
                    let value = if matcher.ignores_case() {
                        &self.input[self.pos..end]
                    } else {
                        matcher.value()
                    };

                    self.pos = end;
                    Ok(Some(value.into()))
                }
                None => self.fail(*expectation),
            },

            Node::Class {
                matcher,
                expectation,
            } => match self.next_char() {
                Some(c) if matcher.matches(c) => Ok(Some(self.consume_char(c))),
                _ => self.fail(*expectation),
            },

            Node::Any { expectation } => match self.next_char() {
                Some(c) => Ok(Some(self.consume_char(c))),
                None => self.fail(*expectation),
            },

            Node::RuleRef { rule } => self.call_rule(*rule),

            Node::Sequence(elements) => {
                let start = self.pos;
                let mark = self.scope.len();
                let mut values = Vec::with_capacity(elements.len());

                for element in elements {
                    match self.eval(element)? {
                        Some(value) => values.push(value),
                        None => {
                            self.pos = start;
                            self.scope.truncate(mark);
                            return Ok(None);
                        }
                    }
                }

                Ok(Some(Value::List(values)))
            }

            Node::Choice(alternatives) => {
                for alternative in alternatives {
                    if let Some(value) = self.scoped(alternative)? {
                        return Ok(Some(value));
                    }
                }

                Ok(None)
            }

            Node::Labeled { label, node } => {
                let value = self.scoped(node)?;

                if let Some(value) = &value {
                    self.scope.push((label.as_str(), value.clone()));
                }

                Ok(value)
            }

            Node::Named { expectation, node } => {
                self.silent += 1;
                let value = self.scoped(node)?;
                self.silent -= 1;

                match value {
                    Some(value) => Ok(Some(value)),
                    None => self.fail(*expectation),
                }
            }

            Node::Action { node, code } => {
                let start = self.pos;
                let mark = self.scope.len();

                let value = match self.eval(node)? {
                    Some(value) => value,
                    None => {
                        self.scope.truncate(mark);
                        return Ok(None);
                    }
                };

                let ctx = CodeContext::new(
                    self.input,
                    start..self.pos,
                    &self.scope,
                    Some(&value),
                    &self.lines,
                );
                let result = self.host.action(code, &ctx);

                self.scope.truncate(mark);

                match result {
                    Ok(value) => Ok(Some(value)),
                    Err(err) => Err(self.code_error(err, start, self.pos)),
                }
            }

            Node::Text(node) => {
                let start = self.pos;

                Ok(self
                    .scoped(node)?
                    .map(|_| Value::from(&self.input[start..self.pos])))
            }

            Node::Optional(node) => Ok(Some(self.scoped(node)?.unwrap_or(Value::Null))),

            Node::ZeroOrMore(node) => self.repeat(node, 0),
            Node::OneOrMore(node) => self.repeat(node, 1),

            Node::Group(node) => self.scoped(node),

            Node::SimpleAnd(node) => self
                .lookahead(node)
                .map(|matched| matched.then_some(Value::Null)),

            Node::SimpleNot(node) => self
                .lookahead(node)
                .map(|matched| (!matched).then_some(Value::Null)),

            Node::SemanticAnd(code) => self
                .predicate(code)
                .map(|result| result.then_some(Value::Null)),

            Node::SemanticNot(code) => self
                .predicate(code)
                .map(|result| (!result).then_some(Value::Null)),
        }
    }

    /// Evaluate a node, dropping the labels it binds once it is done
    fn scoped(&mut self, node: &'g Node) -> Step<H> {
        let mark = self.scope.len();
        let result = self.eval(node);
        self.scope.truncate(mark);
        result
    }

    fn repeat(&mut self, node: &'g Node, min: usize) -> Step<H> {
        let mut values = vec![];

        loop {
            let before = self.pos;

            match self.scoped(node)? {
                Some(value) => values.push(value),
                None => break,
            }

            // Matches that consume nothing would repeat forever
            if self.pos == before {
                break;
            }
        }

        Ok((values.len() >= min).then_some(Value::List(values)))
    }

    /// Check if a node matches at the current offset, without consuming anything
    fn lookahead(&mut self, node: &'g Node) -> Result<bool, ParseError<H::Error>> {
        let start = self.pos;

        self.silent += 1;
        let matched = self.scoped(node)?.is_some();
        self.silent -= 1;

        self.pos = start;

        Ok(matched)
    }

    fn predicate(&mut self, code: &str) -> Result<bool, ParseError<H::Error>> {
        let pos = self.pos;
        let ctx = CodeContext::new(self.input, pos..pos, &self.scope, None, &self.lines);
        let result = self.host.predicate(code, &ctx);

        result.map_err(|err| self.code_error(err, pos, pos))
    }

    fn next_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn consume_char(&mut self, c: char) -> Value<H::Value> {
        self.pos += c.len_utf8();
        Value::Str(c.to_string())
    }

    fn fail(&mut self, expectation: ExpectationId) -> Step<H> {
        self.record_failure(expectation);
        Ok(None)
    }

    /// Record a failure at the current offset
    fn record_failure(&mut self, expectation: ExpectationId) {
        if self.silent == 0 && self.pos >= self.max_fail_pos {
            if self.pos > self.max_fail_pos {
                self.max_fail_pos = self.pos;
                self.max_fail_expected.clear();
            }

            self.max_fail_expected.push(expectation);
        }
    }

    fn syntax_error(&self) -> SyntaxError {
        let pos = self.max_fail_pos;
        let found = self.input[pos..].chars().next();
        let end = found.map_or(pos, |c| pos + c.len_utf8());

        let mut expected = vec![];

        for &id in &self.max_fail_expected {
            let expectation = &self.grammar.expectations[id];

            if !expected.contains(expectation) {
                expected.push(expectation.clone());
            }
        }

        SyntaxError::new(
            expected,
            found.map(String::from),
            self.line_index().location(self.input, pos, end),
        )
    }

    fn code_error(&self, err: CodeError<H::Error>, start: usize, end: usize) -> ParseError<H::Error> {
        let location = self.line_index().location(self.input, start, end);

        match err {
            CodeError::Host(err) => ParseError::Host(err),
            CodeError::Message(message) => SyntaxError::custom(message, location).into(),
            CodeError::Expected(description) => SyntaxError::new(
                vec![Expectation::Other { description }],
                Some(self.input[start..end].to_string()),
                location,
            )
            .into(),
        }
    }

    fn line_index(&self) -> &LineIndex {
        self.lines.get_or_init(|| LineIndex::new(self.input))
    }

    fn trace(&mut self, kind: TraceKind, rule: &CompiledRule, start: usize, end: usize) {
        if self.tracer.is_off() {
            return;
        }

        let location = self.line_index().location(self.input, start, end);

        self.tracer.emit(&TraceEvent {
            kind,
            rule: &rule.name,
            location,
        });
    }

    fn trace_exit(&mut self, rule: &CompiledRule, start: usize, matched: bool) {
        if matched {
            self.trace(TraceKind::Match, rule, start, self.pos);
        } else {
            self.trace(TraceKind::Fail, rule, start, start);
        }
    }
}
