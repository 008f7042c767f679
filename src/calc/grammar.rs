//! Grammar tables for the calculator language
//!
//! The grammar is fixed, so its FIRST, FOLLOW and nullable sets are written
//! out by hand below rather than computed from a grammar description at
//! runtime. The LL(1) prediction table is filled from those sets once, when
//! [`GrammarTables::new`] runs, and never changes afterwards.
//!
//! ```text
//! program     --> stmt_list eof
//! stmt_list   --> stmt stmt_list | epsilon
//! stmt        --> id gets expr | read id | write expr
//!               | if condition stmt_list end | while condition stmt_list end
//! condition   --> expr rule expr
//! expr        --> term term_tail
//! term_tail   --> add_op term term_tail | epsilon
//! term        --> factor factor_tail
//! factor_tail --> mul_op factor factor_tail | epsilon
//! factor      --> id | literal | lparen expr rparen
//! add_op      --> add | sub
//! mul_op      --> mul | div
//! ```

use crate::calc::lexer::TokenKind;
use once_cell::sync::Lazy;
use std::fmt;

const TOKEN_COUNT: usize = TokenKind::ALL.len();

/// A set of token kinds, stored as a bitset indexed by the kind's discriminant
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TokenSet(u32);

impl TokenSet {
    pub const EMPTY: TokenSet = TokenSet(0);

    pub const fn of(kinds: &[TokenKind]) -> Self {
        let mut bits = 0u32;
        let mut i = 0;
        while i < kinds.len() {
            bits |= 1 << kinds[i] as u32;
            i += 1;
        }
        TokenSet(bits)
    }

    pub const fn contains(self, kind: TokenKind) -> bool {
        self.0 & (1 << kind as u32) != 0
    }

    pub const fn with(self, kind: TokenKind) -> Self {
        TokenSet(self.0 | (1 << kind as u32))
    }

    pub const fn union(self, other: TokenSet) -> Self {
        TokenSet(self.0 | other.0)
    }

    pub const fn is_disjoint(self, other: TokenSet) -> bool {
        self.0 & other.0 == 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(self) -> impl Iterator<Item = TokenKind> {
        TokenKind::ALL
            .into_iter()
            .filter(move |kind| self.contains(*kind))
    }
}

impl fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter().map(TokenKind::name)).finish()
    }
}

impl FromIterator<TokenKind> for TokenSet {
    fn from_iter<I: IntoIterator<Item = TokenKind>>(iter: I) -> Self {
        iter.into_iter().fold(TokenSet::EMPTY, TokenSet::with)
    }
}

/// Nonterminals of the grammar, one parsing routine each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Nonterminal {
    Program,
    StmtList,
    Stmt,
    Condition,
    Expr,
    Term,
    TermTail,
    Factor,
    FactorTail,
    AddOp,
    MulOp,
}

impl Nonterminal {
    pub const ALL: [Nonterminal; 11] = [
        Nonterminal::Program,
        Nonterminal::StmtList,
        Nonterminal::Stmt,
        Nonterminal::Condition,
        Nonterminal::Expr,
        Nonterminal::Term,
        Nonterminal::TermTail,
        Nonterminal::Factor,
        Nonterminal::FactorTail,
        Nonterminal::AddOp,
        Nonterminal::MulOp,
    ];

    pub const COUNT: usize = Self::ALL.len();

    pub fn name(self) -> &'static str {
        match self {
            Nonterminal::Program => "program",
            Nonterminal::StmtList => "stmt_list",
            Nonterminal::Stmt => "stmt",
            Nonterminal::Condition => "condition",
            Nonterminal::Expr => "expr",
            Nonterminal::Term => "term",
            Nonterminal::TermTail => "term_tail",
            Nonterminal::Factor => "factor",
            Nonterminal::FactorTail => "factor_tail",
            Nonterminal::AddOp => "add_op",
            Nonterminal::MulOp => "mul_op",
        }
    }
}

impl fmt::Display for Nonterminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A grammar symbol on the right-hand side of a production
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    T(TokenKind),
    N(Nonterminal),
}

impl Symbol {
    pub fn name(self) -> &'static str {
        match self {
            Symbol::T(kind) => kind.name(),
            Symbol::N(nonterminal) => nonterminal.name(),
        }
    }
}

/// Every production of the grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Production {
    Program,
    StmtListCons,
    StmtListEmpty,
    Assign,
    Read,
    Write,
    If,
    While,
    Condition,
    Expr,
    TermTailCons,
    TermTailEmpty,
    Term,
    FactorTailCons,
    FactorTailEmpty,
    FactorId,
    FactorLiteral,
    FactorParen,
    Add,
    Sub,
    Mul,
    Div,
}

impl Production {
    pub const ALL: [Production; 22] = [
        Production::Program,
        Production::StmtListCons,
        Production::StmtListEmpty,
        Production::Assign,
        Production::Read,
        Production::Write,
        Production::If,
        Production::While,
        Production::Condition,
        Production::Expr,
        Production::TermTailCons,
        Production::TermTailEmpty,
        Production::Term,
        Production::FactorTailCons,
        Production::FactorTailEmpty,
        Production::FactorId,
        Production::FactorLiteral,
        Production::FactorParen,
        Production::Add,
        Production::Sub,
        Production::Mul,
        Production::Div,
    ];

    pub fn lhs(self) -> Nonterminal {
        match self {
            Production::Program => Nonterminal::Program,
            Production::StmtListCons | Production::StmtListEmpty => Nonterminal::StmtList,
            Production::Assign
            | Production::Read
            | Production::Write
            | Production::If
            | Production::While => Nonterminal::Stmt,
            Production::Condition => Nonterminal::Condition,
            Production::Expr => Nonterminal::Expr,
            Production::TermTailCons | Production::TermTailEmpty => Nonterminal::TermTail,
            Production::Term => Nonterminal::Term,
            Production::FactorTailCons | Production::FactorTailEmpty => Nonterminal::FactorTail,
            Production::FactorId | Production::FactorLiteral | Production::FactorParen => {
                Nonterminal::Factor
            }
            Production::Add | Production::Sub => Nonterminal::AddOp,
            Production::Mul | Production::Div => Nonterminal::MulOp,
        }
    }

    pub fn rhs(self) -> &'static [Symbol] {
        use Nonterminal as N;
        use Symbol::{N as Nt, T};
        use TokenKind as K;

        match self {
            Production::Program => &[Nt(N::StmtList), T(K::Eof)],
            Production::StmtListCons => &[Nt(N::Stmt), Nt(N::StmtList)],
            Production::StmtListEmpty => &[],
            Production::Assign => &[T(K::Identifier), T(K::Gets), Nt(N::Expr)],
            Production::Read => &[T(K::Read), T(K::Identifier)],
            Production::Write => &[T(K::Write), Nt(N::Expr)],
            Production::If => &[T(K::If), Nt(N::Condition), Nt(N::StmtList), T(K::End)],
            Production::While => &[T(K::While), Nt(N::Condition), Nt(N::StmtList), T(K::End)],
            Production::Condition => &[Nt(N::Expr), T(K::Rule), Nt(N::Expr)],
            Production::Expr => &[Nt(N::Term), Nt(N::TermTail)],
            Production::TermTailCons => &[Nt(N::AddOp), Nt(N::Term), Nt(N::TermTail)],
            Production::TermTailEmpty => &[],
            Production::Term => &[Nt(N::Factor), Nt(N::FactorTail)],
            Production::FactorTailCons => &[Nt(N::MulOp), Nt(N::Factor), Nt(N::FactorTail)],
            Production::FactorTailEmpty => &[],
            Production::FactorId => &[T(K::Identifier)],
            Production::FactorLiteral => &[T(K::Literal)],
            Production::FactorParen => &[T(K::LeftParen), Nt(N::Expr), T(K::RightParen)],
            Production::Add => &[T(K::Add)],
            Production::Sub => &[T(K::Sub)],
            Production::Mul => &[T(K::Mul)],
            Production::Div => &[T(K::Div)],
        }
    }

    pub fn is_epsilon(self) -> bool {
        self.rhs().is_empty()
    }
}

impl fmt::Display for Production {
    /// Renders `lhs --> rhs`, the form used by predict trace lines
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -->", self.lhs())?;
        if self.is_epsilon() {
            return f.write_str(" epsilon");
        }
        for symbol in self.rhs() {
            write!(f, " {}", symbol.name())?;
        }
        Ok(())
    }
}

/// FIRST, FOLLOW and nullable data for one nonterminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolEntry {
    pub first: TokenSet,
    pub follow: TokenSet,
    pub nullable: bool,
}

impl SymbolEntry {
    /// Tokens at which recovery for this nonterminal stops discarding input
    pub fn sync_set(&self) -> TokenSet {
        self.first.union(self.follow).with(TokenKind::Eof)
    }
}

const STMT_START: TokenSet = TokenSet::of(&[
    TokenKind::Identifier,
    TokenKind::Read,
    TokenKind::Write,
    TokenKind::If,
    TokenKind::While,
]);
const OPERAND_START: TokenSet = TokenSet::of(&[
    TokenKind::LeftParen,
    TokenKind::Identifier,
    TokenKind::Literal,
]);
const ADD_OPS: TokenSet = TokenSet::of(&[TokenKind::Add, TokenKind::Sub]);
const MUL_OPS: TokenSet = TokenSet::of(&[TokenKind::Mul, TokenKind::Div]);

const FOLLOW_STMT_LIST: TokenSet = TokenSet::of(&[TokenKind::End, TokenKind::Eof]);
const FOLLOW_STMT: TokenSet = STMT_START.union(FOLLOW_STMT_LIST);
const FOLLOW_CONDITION: TokenSet = STMT_START.with(TokenKind::End);
const FOLLOW_EXPR: TokenSet = FOLLOW_STMT
    .with(TokenKind::RightParen)
    .with(TokenKind::Rule);
const FOLLOW_TERM: TokenSet = FOLLOW_EXPR.union(ADD_OPS);
const FOLLOW_FACTOR: TokenSet = FOLLOW_TERM.union(MUL_OPS);

const fn entry(first: TokenSet, follow: TokenSet, nullable: bool) -> SymbolEntry {
    SymbolEntry {
        first,
        follow,
        nullable,
    }
}

/// Hand-derived entries, in [`Nonterminal::ALL`] order
const ENTRIES: [SymbolEntry; Nonterminal::COUNT] = [
    // program
    entry(STMT_START.with(TokenKind::Eof), TokenSet::EMPTY, false),
    // stmt_list
    entry(STMT_START, FOLLOW_STMT_LIST, true),
    // stmt
    entry(STMT_START, FOLLOW_STMT, false),
    // condition
    entry(OPERAND_START, FOLLOW_CONDITION, false),
    // expr
    entry(OPERAND_START, FOLLOW_EXPR, false),
    // term
    entry(OPERAND_START, FOLLOW_TERM, false),
    // term_tail
    entry(ADD_OPS, FOLLOW_EXPR, true),
    // factor
    entry(OPERAND_START, FOLLOW_FACTOR, false),
    // factor_tail
    entry(MUL_OPS, FOLLOW_TERM, true),
    // add_op
    entry(ADD_OPS, OPERAND_START, false),
    // mul_op
    entry(MUL_OPS, OPERAND_START, false),
];

/// Read-only grammar data shared by every parse
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrammarTables {
    entries: [SymbolEntry; Nonterminal::COUNT],
    predictions: [[Option<Production>; TOKEN_COUNT]; Nonterminal::COUNT],
}

/// Process-wide tables, built on first use
pub static TABLES: Lazy<GrammarTables> = Lazy::new(GrammarTables::new);

impl GrammarTables {
    pub fn new() -> Self {
        let mut tables = Self {
            entries: ENTRIES,
            predictions: [[None; TOKEN_COUNT]; Nonterminal::COUNT],
        };

        for production in Production::ALL {
            let row = production.lhs() as usize;
            for kind in tables.predict_set(production).iter() {
                let cell = &mut tables.predictions[row][kind as usize];
                debug_assert!(
                    cell.is_none(),
                    "LL(1) conflict in {} on {}",
                    production.lhs(),
                    kind
                );
                *cell = Some(production);
            }
        }

        tables
    }

    pub fn entry(&self, nonterminal: Nonterminal) -> &SymbolEntry {
        &self.entries[nonterminal as usize]
    }

    pub fn follow(&self, nonterminal: Nonterminal) -> TokenSet {
        self.entry(nonterminal).follow
    }

    pub fn nullable(&self, nonterminal: Nonterminal) -> bool {
        self.entry(nonterminal).nullable
    }

    /// FIRST of a symbol sequence, and whether the whole sequence is nullable
    pub fn first_of(&self, symbols: &[Symbol]) -> (TokenSet, bool) {
        let mut set = TokenSet::EMPTY;
        for symbol in symbols {
            match *symbol {
                Symbol::T(kind) => return (set.with(kind), false),
                Symbol::N(nonterminal) => {
                    let entry = self.entry(nonterminal);
                    set = set.union(entry.first);
                    if !entry.nullable {
                        return (set, false);
                    }
                }
            }
        }
        (set, true)
    }

    /// Lookahead tokens that select `production`
    pub fn predict_set(&self, production: Production) -> TokenSet {
        let (first, nullable) = self.first_of(production.rhs());
        if nullable {
            first.union(self.follow(production.lhs()))
        } else {
            first
        }
    }

    /// The production to expand for `nonterminal` when the lookahead is `kind`
    pub fn predict(&self, nonterminal: Nonterminal, kind: TokenKind) -> Option<Production> {
        self.predictions[nonterminal as usize][kind as usize]
    }
}

impl Default for GrammarTables {
    fn default() -> Self {
        Self::new()
    }
}
