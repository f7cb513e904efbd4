use crate::location::Location;
use log::trace;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceKind {
    Enter,
    Match,
    Fail,
}

impl fmt::Display for TraceKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(match self {
            Self::Enter => "rule.enter",
            Self::Match => "rule.match",
            Self::Fail => "rule.fail",
        })
    }
}

/// A rule being entered or left
///
/// `location` spans the consumed input for [`TraceKind::Match`], and is empty otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceEvent<'a> {
    pub kind: TraceKind,
    pub rule: &'a str,
    pub location: Location,
}

/// Receives rule events from parsers compiled with tracing enabled
///
/// Events come in nested order: every `Enter` is followed, once the rule is done,
/// by exactly one `Match` or `Fail` for the same rule.
pub trait Tracer {
    fn trace(&mut self, event: &TraceEvent<'_>);
}

impl<F> Tracer for F
where
    F: FnMut(&TraceEvent<'_>),
{
    fn trace(&mut self, event: &TraceEvent<'_>) {
        self(event)
    }
}

/// Tracer writing an indented trace to the logger, used when none is provided
#[derive(Debug, Default)]
pub struct LogTracer {
    depth: usize,
}

impl LogTracer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Tracer for LogTracer {
    fn trace(&mut self, event: &TraceEvent<'_>) {
        if event.kind != TraceKind::Enter {
            self.depth = self.depth.saturating_sub(1);
        }

        trace!(
            "{}:{}-{}:{} {:<10} {}{}",
            event.location.start.line,
            event.location.start.column,
            event.location.end.line,
            event.location.end.column,
            event.kind,
            "  ".repeat(self.depth),
            event.rule
        );

        if event.kind == TraceKind::Enter {
            self.depth += 1;
        }
    }
}
