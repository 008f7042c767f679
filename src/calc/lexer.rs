//! Lexer module for the calculator language
//!
//! This module contains the tokenization logic, including token definitions
//! and the pull-based lexer the parser consumes. The parser never looks more
//! than one token ahead and never pushes a token back, so the lexer is driven
//! through [`TokenSource::next_token`] rather than materialized up front.

pub mod lexer_impl;
pub mod tokens;

pub use lexer_impl::{tokenize, Lexer, TokenSource, TokenStream};
pub use tokens::{Token, TokenKind};
