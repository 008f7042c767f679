//! Public API for the parser.

use serde::Serialize;

use crate::calc::diagnostics::{NullSink, SyntaxError, TraceLog, TraceSink};
use crate::calc::grammar::Nonterminal;
use crate::calc::lexer::{Lexer, TokenKind, TokenSource};
use crate::calc::parser::ast::{Expr, Program};
use crate::calc::parser::ast_sexpr::serialize_program;
use crate::calc::parser::engine::Parser;

/// Result of parsing one complete program.
///
/// A parse always completes. If `errors` is not empty the tree is a best
/// effort and must not be treated as well formed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseOutcome {
    pub program: Program,
    pub errors: Vec<SyntaxError>,
    /// Tokens matched or discarded, end-of-input included
    pub tokens_consumed: usize,
}

impl ParseOutcome {
    pub fn is_well_formed(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// The bracketed tree, as printed on the tree channel
    pub fn to_sexpr(&self) -> String {
        serialize_program(&self.program)
    }
}

/// Parse a program from any token source, reporting to `sink`
pub fn parse_tokens<S: TokenSource, K: TraceSink>(source: S, sink: K) -> (ParseOutcome, K) {
    let mut parser = Parser::new(source, sink);
    let program = parser.program();
    let (errors, tokens_consumed, sink) = parser.into_parts();

    tracing::info!(
        statements = program.statements.len(),
        errors = errors.len(),
        tokens_consumed,
        "parse finished"
    );

    let outcome = ParseOutcome {
        program,
        errors,
        tokens_consumed,
    };
    (outcome, sink)
}

/// Parse source text, collecting the full trace
pub fn parse_source(source: &str) -> (ParseOutcome, TraceLog) {
    parse_tokens(Lexer::new(source), TraceLog::new())
}

/// Parse source text without tracing
pub fn parse_str(source: &str) -> ParseOutcome {
    parse_tokens(Lexer::new(source), NullSink).0
}

/// Parse a lone expression. Anything left before end-of-input is reported.
pub fn parse_expression(source: &str) -> (Expr, Vec<SyntaxError>) {
    let mut parser = Parser::new(Lexer::new(source), NullSink);
    let expr = parser.expr();
    if !parser.lookahead().is_eof() {
        parser.expect(TokenKind::Eof, Nonterminal::Expr);
    }
    let (errors, _, _) = parser.into_parts();
    (expr, errors)
}
