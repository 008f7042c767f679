//! # calcparse
//!
//! A table-driven LL(1) parser for the calculator language: `read`, `write`,
//! assignment, `if` and `while` over arithmetic expressions and relational
//! conditions.
//!
//! The parser traces every production it predicts and every token it matches,
//! recovers from malformed input with panic-mode resynchronization, and
//! renders the resulting tree in a bracketed form.
//!
//! ```text
//! source --> lexer --> tokens --> parser --> Program --> ast_sexpr / json / yaml
//!                                   |
//!                                   +--> trace sink (predict / matched / syntax error)
//! ```

pub mod calc;

pub use calc::parser::{parse_source, parse_str, ParseOutcome};
