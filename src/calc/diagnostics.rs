//! Trace channel and syntax error reporting
//!
//! The parser reports everything it does as [`TraceEvent`]s handed to a
//! [`TraceSink`]: which production it predicted, which token it matched, and
//! every syntax error it recovered from. The rendered lines are
//!
//! ```text
//! predict stmt --> id gets expr
//! matched id: x
//! syntax error found in: factor_tail
//! ```
//!
//! Errors are never returned as `Err`; a parse that emitted any
//! [`SyntaxError`] completed but is not well formed.

use crate::calc::grammar::Production;
use crate::calc::lexer::{Token, TokenKind};
use serde::Serialize;
use std::fmt;
use std::io;
use std::ops::Range;

/// How a syntax error was detected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyntaxErrorKind {
    /// A recovery check found a lookahead that cannot continue the current symbol
    Recovery,
    /// `expect` saw a different terminal than the production requires
    Match,
    /// No production of a nonterminal is selected by the lookahead
    Predict,
    /// A group or block opened past the nesting limit
    Nesting,
}

/// One reported syntax error
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyntaxError {
    pub kind: SyntaxErrorKind,
    /// Name of the nonterminal whose routine detected the error
    pub symbol: &'static str,
    /// The terminal `expect` wanted, for match and inline recovery errors
    pub expected: Option<TokenKind>,
    pub found: TokenKind,
    pub lexeme: String,
    pub span: Range<usize>,
}

impl SyntaxError {
    pub fn new(
        kind: SyntaxErrorKind,
        symbol: &'static str,
        expected: Option<TokenKind>,
        found: &Token,
    ) -> Self {
        Self {
            kind,
            symbol,
            expected,
            found: found.kind,
            lexeme: found.lexeme.clone(),
            span: found.span.clone(),
        }
    }

    /// A longer description than the trace line, for tooling
    pub fn describe(&self) -> String {
        let found = if self.found.carries_lexeme() || self.found == TokenKind::Invalid {
            format!("{} '{}'", self.found, self.lexeme)
        } else {
            self.found.to_string()
        };
        match (self.kind, self.expected) {
            (_, Some(expected)) => format!(
                "{}: expected {}, found {} at {}..{}",
                self.symbol, expected, found, self.span.start, self.span.end
            ),
            (SyntaxErrorKind::Nesting, None) => format!(
                "{}: nested too deeply at {} ({}..{})",
                self.symbol, found, self.span.start, self.span.end
            ),
            (SyntaxErrorKind::Predict, None) => format!(
                "{}: no production predicted by {} at {}..{}",
                self.symbol, found, self.span.start, self.span.end
            ),
            (_, None) => format!(
                "{}: unexpected {} at {}..{}",
                self.symbol, found, self.span.start, self.span.end
            ),
        }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "syntax error found in: {}", self.symbol)
    }
}

impl std::error::Error for SyntaxError {}

/// One line of the trace channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceEvent {
    Predict(Production),
    Match { kind: TokenKind, lexeme: String },
    SyntaxError(SyntaxError),
}

impl TraceEvent {
    pub fn is_error(&self) -> bool {
        matches!(self, TraceEvent::SyntaxError(_))
    }
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceEvent::Predict(production) => write!(f, "predict {}", production),
            TraceEvent::Match { kind, lexeme } if kind.carries_lexeme() => {
                write!(f, "matched {}: {}", kind, lexeme)
            }
            TraceEvent::Match { kind, .. } => write!(f, "matched {}", kind),
            TraceEvent::SyntaxError(error) => fmt::Display::fmt(error, f),
        }
    }
}

/// Receives trace events in the order the parser produces them
pub trait TraceSink {
    fn record(&mut self, event: TraceEvent);
}

impl<T: TraceSink + ?Sized> TraceSink for &mut T {
    fn record(&mut self, event: TraceEvent) {
        (**self).record(event)
    }
}

/// Collects every event in memory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraceLog {
    events: Vec<TraceEvent>,
}

impl TraceLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rendered lines, one per event
    pub fn lines(&self) -> Vec<String> {
        self.events.iter().map(ToString::to_string).collect()
    }

    /// All lines joined with trailing newlines, as printed on the trace channel
    pub fn render(&self) -> String {
        let mut out = String::new();
        for event in &self.events {
            out.push_str(&event.to_string());
            out.push('\n');
        }
        out
    }

    pub fn error_lines(&self) -> usize {
        self.events.iter().filter(|e| e.is_error()).count()
    }
}

impl TraceSink for TraceLog {
    fn record(&mut self, event: TraceEvent) {
        self.events.push(event);
    }
}

/// Streams each event as a line to a writer.
///
/// Write failures do not interrupt parsing; the first one is kept and can be
/// inspected with [`WriteSink::finish`].
pub struct WriteSink<W: io::Write> {
    writer: W,
    error: Option<io::Error>,
}

impl<W: io::Write> WriteSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            error: None,
        }
    }

    /// Flush and return the writer, or the first write error
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(error) = self.error.take() {
            return Err(error);
        }
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W: io::Write> TraceSink for WriteSink<W> {
    fn record(&mut self, event: TraceEvent) {
        if self.error.is_some() {
            return;
        }
        if let Err(error) = writeln!(self.writer, "{}", event) {
            self.error = Some(error);
        }
    }
}

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl TraceSink for NullSink {
    fn record(&mut self, _event: TraceEvent) {}
}
