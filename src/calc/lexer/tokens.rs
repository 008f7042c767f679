//! Token definitions for the calculator language
//!
//! This module defines the closed set of token kinds produced by the lexer.
//! The kinds are defined using the logos derive macro; `Eof` and `Invalid` are
//! never matched by logos directly, they are synthesized by the lexer driver.
use logos::Logos;
use serde::Serialize;
use std::fmt;
use std::ops::Range;

/// All possible token kinds in the calculator language
#[derive(Logos, Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize)]
#[logos(skip r"[ \t\r\n\f]+")]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    // Keywords
    #[token("read")]
    Read,
    #[token("write")]
    Write,
    #[token("if")]
    If,
    #[token("while")]
    While,
    #[token("end")]
    End,

    // Operands
    #[regex(r"[A-Za-z][A-Za-z0-9_]*")]
    Identifier,
    #[regex(r"[0-9]+(\.[0-9]*)?|\.[0-9]+")]
    Literal,

    // Operators
    #[token(":=")]
    Gets,
    #[token("+")]
    Add,
    #[token("-")]
    Sub,
    #[token("*")]
    Mul,
    #[token("/")]
    Div,
    #[token("(")]
    LeftParen,
    #[token(")")]
    RightParen,

    // Relational operators all share one kind; the lexeme tells them apart
    #[token("=")]
    #[token("==")]
    #[token("<>")]
    #[token("<")]
    #[token(">")]
    #[token("<=")]
    #[token(">=")]
    Rule,

    /// End of input, produced forever once the source is exhausted
    Eof,

    /// A character the scanner does not recognize
    Invalid,
}

impl TokenKind {
    /// Every kind, in declaration order. The index of a kind in this slice is
    /// its bit position in a [`TokenSet`](crate::calc::grammar::TokenSet).
    pub const ALL: [TokenKind; 17] = [
        TokenKind::Read,
        TokenKind::Write,
        TokenKind::If,
        TokenKind::While,
        TokenKind::End,
        TokenKind::Identifier,
        TokenKind::Literal,
        TokenKind::Gets,
        TokenKind::Add,
        TokenKind::Sub,
        TokenKind::Mul,
        TokenKind::Div,
        TokenKind::LeftParen,
        TokenKind::RightParen,
        TokenKind::Rule,
        TokenKind::Eof,
        TokenKind::Invalid,
    ];

    /// The short name used in trace lines and production listings
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Read => "read",
            TokenKind::Write => "write",
            TokenKind::If => "if",
            TokenKind::While => "while",
            TokenKind::End => "end",
            TokenKind::Identifier => "id",
            TokenKind::Literal => "literal",
            TokenKind::Gets => "gets",
            TokenKind::Add => "add",
            TokenKind::Sub => "sub",
            TokenKind::Mul => "mul",
            TokenKind::Div => "div",
            TokenKind::LeftParen => "lparen",
            TokenKind::RightParen => "rparen",
            TokenKind::Rule => "rule",
            TokenKind::Eof => "eof",
            TokenKind::Invalid => "invalid",
        }
    }

    /// Whether tokens of this kind carry a meaningful lexeme
    pub fn carries_lexeme(self) -> bool {
        matches!(self, TokenKind::Identifier | TokenKind::Literal)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A classified token with the text it was scanned from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub span: Range<usize>,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, span: Range<usize>) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            span,
        }
    }

    /// End-of-input token positioned at `offset`
    pub fn eof(offset: usize) -> Self {
        Self::new(TokenKind::Eof, "", offset..offset)
    }

    /// Build a token without source position, mostly useful in tests
    pub fn bare(kind: TokenKind, lexeme: impl Into<String>) -> Self {
        Self::new(kind, lexeme, 0..0)
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.kind.carries_lexeme() {
            write!(f, "{}: {}", self.kind, self.lexeme)
        } else {
            write!(f, "{}", self.kind)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Result<TokenKind, ()>> {
        TokenKind::lexer(source).collect()
    }

    #[test]
    fn test_keywords() {
        assert_eq!(
            kinds("read write if while end"),
            vec![
                Ok(TokenKind::Read),
                Ok(TokenKind::Write),
                Ok(TokenKind::If),
                Ok(TokenKind::While),
                Ok(TokenKind::End),
            ]
        );
    }

    #[test]
    fn test_keyword_prefix_is_identifier() {
        assert_eq!(kinds("reader"), vec![Ok(TokenKind::Identifier)]);
        assert_eq!(kinds("ends"), vec![Ok(TokenKind::Identifier)]);
    }

    #[test]
    fn test_literals() {
        assert_eq!(
            kinds("12 3.5 .25 7."),
            vec![
                Ok(TokenKind::Literal),
                Ok(TokenKind::Literal),
                Ok(TokenKind::Literal),
                Ok(TokenKind::Literal),
            ]
        );
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            kinds(":= + - * / ( )"),
            vec![
                Ok(TokenKind::Gets),
                Ok(TokenKind::Add),
                Ok(TokenKind::Sub),
                Ok(TokenKind::Mul),
                Ok(TokenKind::Div),
                Ok(TokenKind::LeftParen),
                Ok(TokenKind::RightParen),
            ]
        );
    }

    #[test]
    fn test_relational_operators_share_kind() {
        let all = kinds("= == <> < > <= >=");
        assert_eq!(all.len(), 7);
        assert!(all.iter().all(|k| *k == Ok(TokenKind::Rule)));
    }

    #[test]
    fn test_unrecognized_character() {
        assert_eq!(
            kinds("x @ y"),
            vec![Ok(TokenKind::Identifier), Err(()), Ok(TokenKind::Identifier)]
        );
    }

    #[test]
    fn test_token_display() {
        assert_eq!(Token::bare(TokenKind::Identifier, "x").to_string(), "id: x");
        assert_eq!(Token::bare(TokenKind::Literal, "42").to_string(), "literal: 42");
        assert_eq!(Token::bare(TokenKind::Gets, ":=").to_string(), "gets");
        assert_eq!(Token::eof(0).to_string(), "eof");
    }

    #[test]
    fn test_all_is_in_declaration_order() {
        for (index, kind) in TokenKind::ALL.iter().enumerate() {
            assert_eq!(*kind as usize, index);
        }
    }
}
