//! Panic-mode error recovery
//!
//! Three checks share one discipline: report the error once, then discard
//! tokens until one appears that can resume or end the current symbol.
//! End-of-input is always a stopping point and is never discarded, so every
//! loop here is bounded by the remaining input.
//!
//! - [`Parser::recover`] guards the entry of every routine.
//! - [`Parser::recover_before`] runs before each terminal `expect`.
//! - [`Parser::predict_error`] runs when no production matches.
//! - [`Parser::descend`] refuses to open a group or block past
//!   [`MAX_NESTING`].

use crate::calc::diagnostics::{SyntaxError, SyntaxErrorKind, TraceEvent, TraceSink};
use crate::calc::grammar::Nonterminal;
use crate::calc::lexer::{TokenKind, TokenSource};
use crate::calc::parser::engine::{Parser, MAX_NESTING};

impl<S: TokenSource, K: TraceSink> Parser<'_, S, K> {
    /// Record a syntax error against `nonterminal` at the current lookahead
    pub(crate) fn report(
        &mut self,
        kind: SyntaxErrorKind,
        nonterminal: Nonterminal,
        expected: Option<TokenKind>,
    ) {
        let error = SyntaxError::new(kind, nonterminal.name(), expected, self.cursor.peek());
        tracing::debug!(error = %error.describe(), "syntax error");
        self.sink.record(TraceEvent::SyntaxError(error.clone()));
        self.errors.push(error);
    }

    /// Entry guard: nothing happens if the lookahead can start `nonterminal`
    /// or `nonterminal` is nullable. Otherwise report and discard at least one
    /// token, stopping at FIRST, FOLLOW or end-of-input.
    pub(crate) fn recover(&mut self, nonterminal: Nonterminal) {
        let entry = *self.tables.entry(nonterminal);
        if entry.first.contains(self.cursor.kind()) || entry.nullable {
            return;
        }

        self.report(SyntaxErrorKind::Recovery, nonterminal, None);
        loop {
            let kind = self.cursor.advance_raw();
            if entry.first.contains(kind) || entry.follow.contains(kind) || kind == TokenKind::Eof
            {
                break;
            }
        }
    }

    /// Inline check before matching `expected` inside a production of
    /// `nonterminal`. Discards tokens until `expected`, a FOLLOW token or
    /// end-of-input is the lookahead; a token that can follow `nonterminal`
    /// is kept for the caller.
    pub(crate) fn recover_before(&mut self, expected: TokenKind, nonterminal: Nonterminal) {
        if self.cursor.kind() == expected {
            return;
        }

        self.report(SyntaxErrorKind::Recovery, nonterminal, Some(expected));
        let follow = self.tables.follow(nonterminal);
        loop {
            let kind = self.cursor.kind();
            if kind == expected || follow.contains(kind) || kind == TokenKind::Eof {
                break;
            }
            self.cursor.advance_raw();
        }
    }

    /// No production of `nonterminal` is selected by the lookahead. Report it
    /// and resynchronize on FIRST, FOLLOW or end-of-input.
    pub(crate) fn predict_error(&mut self, nonterminal: Nonterminal) {
        self.report(SyntaxErrorKind::Predict, nonterminal, None);
        let sync = self.tables.entry(nonterminal).sync_set();
        while !sync.contains(self.cursor.kind()) {
            self.cursor.advance_raw();
        }
    }

    /// Open one more level of nesting. At the limit the error is reported,
    /// the opening token is discarded and the caller builds a degenerate node.
    pub(crate) fn descend(&mut self, nonterminal: Nonterminal) -> bool {
        if self.depth >= MAX_NESTING {
            self.report(SyntaxErrorKind::Nesting, nonterminal, None);
            self.cursor.advance_raw();
            return false;
        }
        self.depth += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use crate::calc::diagnostics::{SyntaxErrorKind, TraceLog};
    use crate::calc::grammar::Nonterminal;
    use crate::calc::lexer::{Lexer, TokenKind};
    use crate::calc::parser::engine::{Parser, MAX_NESTING};

    fn parser(source: &str) -> Parser<'static, Lexer<'_>, TraceLog> {
        Parser::new(Lexer::new(source), TraceLog::new())
    }

    #[test]
    fn test_guard_is_silent_on_first_token() {
        let mut p = parser("x + 1");
        p.recover(Nonterminal::Expr);
        assert!(p.errors().is_empty());
        assert_eq!(p.cursor.kind(), TokenKind::Identifier);
    }

    #[test]
    fn test_guard_is_silent_for_nullable() {
        let mut p = parser("@ @");
        p.recover(Nonterminal::TermTail);
        assert!(p.errors().is_empty());
        assert_eq!(p.cursor.kind(), TokenKind::Invalid);
    }

    #[test]
    fn test_guard_skips_to_first() {
        let mut p = parser("@ := 3");
        p.recover(Nonterminal::Expr);
        assert_eq!(p.errors().len(), 1);
        assert_eq!(p.errors()[0].kind, SyntaxErrorKind::Recovery);
        assert_eq!(p.errors()[0].symbol, "expr");
        assert_eq!(p.cursor.kind(), TokenKind::Literal);
        assert_eq!(p.cursor.consumed(), 2);
    }

    #[test]
    fn test_guard_always_discards_the_offending_token() {
        // `)` can follow expr, but the guard discards before checking
        let mut p = parser(") write");
        p.recover(Nonterminal::Expr);
        assert_eq!(p.cursor.kind(), TokenKind::Write);
    }

    #[test]
    fn test_guard_stops_at_eof() {
        let mut p = parser(":= := :=");
        p.recover(Nonterminal::Factor);
        assert!(p.cursor.at_eof());
        assert_eq!(p.cursor.consumed(), 3);
    }

    #[test]
    fn test_recover_before_keeps_follow_token() {
        let mut p = parser("< b");
        p.recover_before(TokenKind::RightParen, Nonterminal::Factor);
        assert_eq!(p.errors().len(), 1);
        assert_eq!(p.errors()[0].expected, Some(TokenKind::RightParen));
        assert_eq!(p.cursor.kind(), TokenKind::Rule);
        assert_eq!(p.cursor.consumed(), 0);
    }

    #[test]
    fn test_recover_before_skips_to_expected() {
        let mut p = parser("@ @ := 1");
        p.recover_before(TokenKind::Gets, Nonterminal::Stmt);
        assert_eq!(p.cursor.kind(), TokenKind::Gets);
        assert_eq!(p.cursor.consumed(), 2);
    }

    #[test]
    fn test_predict_error_skips_to_sync_set() {
        let mut p = parser("@ write x");
        p.predict_error(Nonterminal::FactorTail);
        assert_eq!(p.errors()[0].kind, SyntaxErrorKind::Predict);
        assert_eq!(p.errors()[0].found, TokenKind::Invalid);
        assert_eq!(p.cursor.kind(), TokenKind::Write);
    }

    #[test]
    fn test_descend_stops_at_limit() {
        let mut p = parser("( x");
        p.depth = MAX_NESTING;
        assert!(!p.descend(Nonterminal::Factor));
        assert_eq!(p.errors()[0].kind, SyntaxErrorKind::Nesting);
        assert_eq!(p.errors()[0].symbol, "factor");
        assert_eq!(p.cursor.kind(), TokenKind::Identifier);
        assert_eq!(p.depth, MAX_NESTING);
    }

    #[test]
    fn test_descend_below_limit() {
        let mut p = parser("( x");
        assert!(p.descend(Nonterminal::Factor));
        assert!(p.errors().is_empty());
        assert_eq!(p.depth, 1);
        assert_eq!(p.cursor.kind(), TokenKind::LeftParen);
    }

    #[test]
    fn test_errors_are_traced_in_order() {
        let mut p = parser("@ 1");
        p.recover(Nonterminal::Expr);
        let (_, _, log) = p.into_parts();
        assert_eq!(log.lines(), vec!["syntax error found in: expr"]);
    }
}
