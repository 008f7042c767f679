//! Predictive parsing engine
//!
//! One routine per nonterminal. Every routine follows the same steps:
//!
//! 1. guard: [`Parser::recover`] absorbs input left over from an earlier error
//! 2. predict: the grammar tables pick a production from the lookahead, and
//!    the choice is traced
//! 3. expand: terminals are matched and sub-routines called in production order
//! 4. build: the routine returns the tree node for what it parsed
//!
//! The tail nonterminals (`stmt_list`, `term_tail`, `factor_tail`) are right
//! recursive in the grammar. They run as loops here, tracing one prediction per
//! iteration exactly like the recursive form would, and fold operators to the
//! left as they go.

use crate::calc::diagnostics::{SyntaxError, SyntaxErrorKind, TraceEvent, TraceSink};
use crate::calc::grammar::{GrammarTables, Nonterminal, Production, TABLES};
use crate::calc::lexer::{Token, TokenKind, TokenSource};
use crate::calc::parser::ast::{BinOp, Condition, Expr, Program, RelOp, Statement};
use crate::calc::parser::cursor::Cursor;

/// Deepest nesting of parenthesized expressions and blocks the parser descends into
pub const MAX_NESTING: usize = 256;

/// A parser session: one token source, one trace sink, shared grammar tables
pub struct Parser<'t, S: TokenSource, K: TraceSink> {
    pub(crate) tables: &'t GrammarTables,
    pub(crate) cursor: Cursor<S>,
    pub(crate) sink: K,
    pub(crate) errors: Vec<SyntaxError>,
    /// Parenthesized expressions and blocks currently open
    pub(crate) depth: usize,
}

impl<S: TokenSource, K: TraceSink> Parser<'static, S, K> {
    /// Create a parser over the process-wide grammar tables
    pub fn new(source: S, sink: K) -> Self {
        Parser::with_tables(&TABLES, source, sink)
    }
}

impl<'t, S: TokenSource, K: TraceSink> Parser<'t, S, K> {
    pub fn with_tables(tables: &'t GrammarTables, source: S, sink: K) -> Self {
        Self {
            tables,
            cursor: Cursor::new(source),
            sink,
            errors: Vec::new(),
            depth: 0,
        }
    }

    /// Errors reported so far
    pub fn errors(&self) -> &[SyntaxError] {
        &self.errors
    }

    pub fn lookahead(&self) -> &Token {
        self.cursor.peek()
    }

    /// Reported errors, tokens consumed, and the trace sink
    pub fn into_parts(self) -> (Vec<SyntaxError>, usize, K) {
        let consumed = self.cursor.consumed();
        (self.errors, consumed, self.sink)
    }

    /// Trace and select the production for `nonterminal`, or report a predict error
    fn predict(&mut self, nonterminal: Nonterminal) -> Option<Production> {
        match self.tables.predict(nonterminal, self.cursor.kind()) {
            Some(production) => {
                self.sink.record(TraceEvent::Predict(production));
                Some(production)
            }
            None => {
                self.predict_error(nonterminal);
                None
            }
        }
    }

    /// Match a terminal of a production of `nonterminal`.
    ///
    /// On a mismatch the error is reported and the cursor is left where the
    /// inline recovery stopped; the caller carries on with a degenerate node.
    pub(crate) fn expect(&mut self, kind: TokenKind, nonterminal: Nonterminal) -> Option<Token> {
        self.recover_before(kind, nonterminal);
        if self.cursor.kind() != kind {
            self.report(SyntaxErrorKind::Match, nonterminal, Some(kind));
            return None;
        }

        let lexeme = self.cursor.peek().lexeme.clone();
        self.sink.record(TraceEvent::Match { kind, lexeme });
        Some(self.cursor.advance())
    }

    /// Match an identifier or literal and return its text, empty on error
    fn expect_lexeme(&mut self, kind: TokenKind, nonterminal: Nonterminal) -> String {
        self.expect(kind, nonterminal)
            .map(|token| token.lexeme)
            .unwrap_or_default()
    }

    /// program --> stmt_list eof
    pub fn program(&mut self) -> Program {
        self.recover(Nonterminal::Program);
        let statements = match self.predict(Nonterminal::Program) {
            Some(_) => {
                let mut statements = self.stmt_list();
                // an unmatched `end` closes nothing; skip it and keep going
                while self.cursor.kind() == TokenKind::End {
                    self.report(
                        SyntaxErrorKind::Recovery,
                        Nonterminal::Program,
                        Some(TokenKind::Eof),
                    );
                    self.cursor.advance_raw();
                    statements.extend(self.stmt_list());
                }
                self.expect(TokenKind::Eof, Nonterminal::Program);
                statements
            }
            None => Vec::new(),
        };
        Program::new(statements)
    }

    /// stmt_list --> stmt stmt_list | epsilon
    pub fn stmt_list(&mut self) -> Vec<Statement> {
        let mut statements = Vec::new();
        loop {
            self.recover(Nonterminal::StmtList);
            match self.predict(Nonterminal::StmtList) {
                Some(Production::StmtListCons) => statements.extend(self.stmt()),
                Some(_) => return statements,
                None => continue,
            }
        }
    }

    pub fn stmt(&mut self) -> Option<Statement> {
        self.recover(Nonterminal::Stmt);
        let statement = match self.predict(Nonterminal::Stmt)? {
            Production::Assign => {
                let target = self.expect_lexeme(TokenKind::Identifier, Nonterminal::Stmt);
                self.expect(TokenKind::Gets, Nonterminal::Stmt);
                Statement::Assign {
                    target,
                    value: self.expr(),
                }
            }
            Production::Read => {
                self.expect(TokenKind::Read, Nonterminal::Stmt);
                Statement::Read {
                    target: self.expect_lexeme(TokenKind::Identifier, Nonterminal::Stmt),
                }
            }
            Production::Write => {
                self.expect(TokenKind::Write, Nonterminal::Stmt);
                Statement::Write { value: self.expr() }
            }
            Production::If => {
                let (condition, body) = self.block(TokenKind::If)?;
                Statement::If { condition, body }
            }
            Production::While => {
                let (condition, body) = self.block(TokenKind::While)?;
                Statement::While { condition, body }
            }
            other => unreachable!("{} does not expand stmt", other),
        };
        Some(statement)
    }

    /// `keyword condition stmt_list end`, shared by if and while.
    /// `None` when the block is nested too deeply and was dropped.
    fn block(&mut self, keyword: TokenKind) -> Option<(Condition, Vec<Statement>)> {
        if !self.descend(Nonterminal::Stmt) {
            return None;
        }
        self.expect(keyword, Nonterminal::Stmt);
        let condition = self.condition();
        let body = self.stmt_list();
        self.expect(TokenKind::End, Nonterminal::Stmt);
        self.depth -= 1;
        Some((condition, body))
    }

    /// condition --> expr rule expr
    pub fn condition(&mut self) -> Condition {
        self.recover(Nonterminal::Condition);
        if self.predict(Nonterminal::Condition).is_none() {
            return Condition {
                op: None,
                lhs: Expr::Missing,
                rhs: Expr::Missing,
            };
        }

        let lhs = self.expr();
        let op = self
            .expect(TokenKind::Rule, Nonterminal::Condition)
            .and_then(|token| RelOp::from_lexeme(&token.lexeme));
        let rhs = self.expr();
        Condition { op, lhs, rhs }
    }

    /// expr --> term term_tail
    pub fn expr(&mut self) -> Expr {
        self.recover(Nonterminal::Expr);
        match self.predict(Nonterminal::Expr) {
            Some(_) => {
                let term = self.term();
                self.term_tail(term)
            }
            None => Expr::Missing,
        }
    }

    /// term_tail --> add_op term term_tail | epsilon
    fn term_tail(&mut self, lhs: Expr) -> Expr {
        let mut acc = lhs;
        loop {
            self.recover(Nonterminal::TermTail);
            match self.predict(Nonterminal::TermTail) {
                Some(Production::TermTailCons) => {
                    let op = self.add_op();
                    let rhs = self.term();
                    if let Some(op) = op {
                        acc = Expr::binary(op, acc, rhs);
                    }
                }
                Some(_) => return acc,
                None => continue,
            }
        }
    }

    /// term --> factor factor_tail
    pub fn term(&mut self) -> Expr {
        self.recover(Nonterminal::Term);
        match self.predict(Nonterminal::Term) {
            Some(_) => {
                let factor = self.factor();
                self.factor_tail(factor)
            }
            None => Expr::Missing,
        }
    }

    /// factor_tail --> mul_op factor factor_tail | epsilon
    fn factor_tail(&mut self, lhs: Expr) -> Expr {
        let mut acc = lhs;
        loop {
            self.recover(Nonterminal::FactorTail);
            match self.predict(Nonterminal::FactorTail) {
                Some(Production::FactorTailCons) => {
                    let op = self.mul_op();
                    let rhs = self.factor();
                    if let Some(op) = op {
                        acc = Expr::binary(op, acc, rhs);
                    }
                }
                Some(_) => return acc,
                None => continue,
            }
        }
    }

    /// factor --> id | literal | lparen expr rparen
    pub fn factor(&mut self) -> Expr {
        self.recover(Nonterminal::Factor);
        match self.predict(Nonterminal::Factor) {
            Some(Production::FactorId) => {
                Expr::id(self.expect_lexeme(TokenKind::Identifier, Nonterminal::Factor))
            }
            Some(Production::FactorLiteral) => {
                Expr::literal(self.expect_lexeme(TokenKind::Literal, Nonterminal::Factor))
            }
            Some(Production::FactorParen) => {
                if !self.descend(Nonterminal::Factor) {
                    return Expr::Missing;
                }
                self.expect(TokenKind::LeftParen, Nonterminal::Factor);
                let inner = self.expr();
                self.expect(TokenKind::RightParen, Nonterminal::Factor);
                self.depth -= 1;
                Expr::group(inner)
            }
            _ => Expr::Missing,
        }
    }

    fn add_op(&mut self) -> Option<BinOp> {
        self.recover(Nonterminal::AddOp);
        let (kind, op) = match self.predict(Nonterminal::AddOp)? {
            Production::Add => (TokenKind::Add, BinOp::Add),
            Production::Sub => (TokenKind::Sub, BinOp::Sub),
            other => unreachable!("{} does not expand add_op", other),
        };
        self.expect(kind, Nonterminal::AddOp).map(|_| op)
    }

    fn mul_op(&mut self) -> Option<BinOp> {
        self.recover(Nonterminal::MulOp);
        let (kind, op) = match self.predict(Nonterminal::MulOp)? {
            Production::Mul => (TokenKind::Mul, BinOp::Mul),
            Production::Div => (TokenKind::Div, BinOp::Div),
            other => unreachable!("{} does not expand mul_op", other),
        };
        self.expect(kind, Nonterminal::MulOp).map(|_| op)
    }
}
