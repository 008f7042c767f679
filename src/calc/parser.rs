//! Predictive recursive-descent parser
//!
//! The parser pulls one token at a time from a [`TokenSource`](crate::calc::lexer::TokenSource),
//! picks productions from the LL(1) tables in [`grammar`](crate::calc::grammar),
//! and builds a [`Program`] tree bottom-up. Malformed input is reported on the
//! trace sink and skipped with panic-mode recovery; parsing never aborts.

pub mod api;
pub mod ast;
pub mod ast_sexpr;
pub mod cursor;
pub mod engine;
mod recovery;

pub use api::{parse_expression, parse_source, parse_str, parse_tokens, ParseOutcome};
pub use ast::{BinOp, Condition, Expr, Program, RelOp, Statement};
pub use ast_sexpr::{serialize_expr, serialize_program, serialize_statement};
pub use engine::{Parser, MAX_NESTING};
