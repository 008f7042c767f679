//! Token cursor
//!
//! Holds the single lookahead token. The parser reads it to decide control
//! flow; only [`Cursor::advance`] and [`Cursor::advance_raw`] replace it.

use crate::calc::lexer::{Token, TokenKind, TokenSource};

pub struct Cursor<S: TokenSource> {
    source: S,
    lookahead: Token,
    consumed: usize,
}

impl<S: TokenSource> Cursor<S> {
    /// Pull the first token from `source`
    pub fn new(mut source: S) -> Self {
        let lookahead = source.next_token();
        Self {
            source,
            lookahead,
            consumed: 0,
        }
    }

    pub fn peek(&self) -> &Token {
        &self.lookahead
    }

    pub fn kind(&self) -> TokenKind {
        self.lookahead.kind
    }

    pub fn at_eof(&self) -> bool {
        self.lookahead.is_eof()
    }

    /// Number of tokens moved past so far, matched or discarded
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Consume the lookahead after a successful match and return it
    pub fn advance(&mut self) -> Token {
        let next = self.source.next_token();
        let token = std::mem::replace(&mut self.lookahead, next);
        self.consumed += 1;
        tracing::trace!(consumed = %token, next = %self.lookahead, "advance");
        token
    }

    /// Discard the lookahead during recovery.
    ///
    /// End-of-input is never discarded, so recovery loops always terminate.
    pub fn advance_raw(&mut self) -> TokenKind {
        if self.at_eof() {
            return TokenKind::Eof;
        }
        let next = self.source.next_token();
        let skipped = std::mem::replace(&mut self.lookahead, next);
        self.consumed += 1;
        tracing::debug!(skipped = %skipped, span = ?skipped.span, "discarded during recovery");
        self.lookahead.kind
    }
}
