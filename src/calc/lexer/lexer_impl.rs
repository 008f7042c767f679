//! Implementation of the calculator lexer
//!
//! Tokenization itself is handled entirely by logos. This module adapts the
//! logos iterator to the parser's pull-based [`TokenSource`] contract: one
//! token per call, end-of-input forever once the source is exhausted.

use crate::calc::lexer::tokens::{Token, TokenKind};
use logos::Logos;

/// The lexer contract consumed by the parser.
///
/// Implementations must be total: every call returns a token, and after the
/// input is exhausted every call returns an end-of-input token. No token is
/// ever returned twice.
pub trait TokenSource {
    fn next_token(&mut self) -> Token;
}

/// Scans calculator source text on demand
pub struct Lexer<'src> {
    inner: logos::Lexer<'src, TokenKind>,
    source_len: usize,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            inner: TokenKind::lexer(source),
            source_len: source.len(),
        }
    }
}

impl TokenSource for Lexer<'_> {
    fn next_token(&mut self) -> Token {
        match self.inner.next() {
            Some(Ok(kind)) => Token::new(kind, self.inner.slice(), self.inner.span()),
            Some(Err(())) => {
                let span = self.inner.span();
                tracing::debug!(lexeme = self.inner.slice(), ?span, "unrecognized input");
                Token::new(TokenKind::Invalid, self.inner.slice(), span)
            }
            None => Token::eof(self.source_len),
        }
    }
}

/// Replays a pre-built token sequence.
///
/// A trailing end-of-input token is optional; one is synthesized once the
/// sequence runs out.
#[derive(Debug, Clone)]
pub struct TokenStream {
    tokens: std::vec::IntoIter<Token>,
    end: usize,
}

impl TokenStream {
    pub fn new(tokens: Vec<Token>) -> Self {
        let end = tokens.last().map(|t| t.span.end).unwrap_or(0);
        Self {
            tokens: tokens.into_iter(),
            end,
        }
    }
}

impl TokenSource for TokenStream {
    fn next_token(&mut self) -> Token {
        self.tokens.next().unwrap_or_else(|| Token::eof(self.end))
    }
}

impl<T: TokenSource + ?Sized> TokenSource for &mut T {
    fn next_token(&mut self) -> Token {
        (**self).next_token()
    }
}

/// Convenience function to tokenize a string, including the trailing end-of-input token
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();

    loop {
        let token = lexer.next_token();
        let done = token.is_eof();
        tokens.push(token);
        if done {
            break;
        }
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_simple_tokenization() {
        assert_eq!(
            kinds("x := y + 1"),
            vec![
                TokenKind::Identifier,
                TokenKind::Gets,
                TokenKind::Identifier,
                TokenKind::Add,
                TokenKind::Literal,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_lexemes_and_spans() {
        let tokens = tokenize("read  abc");
        assert_eq!(tokens[0].lexeme, "read");
        assert_eq!(tokens[0].span, 0..4);
        assert_eq!(tokens[1].lexeme, "abc");
        assert_eq!(tokens[1].span, 6..9);
        assert_eq!(tokens[2], Token::eof(9));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
    }

    #[test]
    fn test_whitespace_only() {
        assert_eq!(kinds(" \n\t  \r\n"), vec![TokenKind::Eof]);
    }

    #[test]
    fn test_invalid_character_becomes_token() {
        let tokens = tokenize("x := 1 @ write x");
        assert_eq!(tokens[3].kind, TokenKind::Invalid);
        assert_eq!(tokens[3].lexeme, "@");
        assert_eq!(tokens[4].kind, TokenKind::Write);
    }

    #[test]
    fn test_lexer_is_total_after_exhaustion() {
        let mut lexer = Lexer::new("x");
        assert_eq!(lexer.next_token().kind, TokenKind::Identifier);
        for _ in 0..3 {
            assert!(lexer.next_token().is_eof());
        }
    }

    #[test]
    fn test_token_stream_synthesizes_eof() {
        let mut stream = TokenStream::new(vec![Token::new(TokenKind::Identifier, "x", 0..1)]);
        assert_eq!(stream.next_token().lexeme, "x");
        assert_eq!(stream.next_token(), Token::eof(1));
        assert_eq!(stream.next_token(), Token::eof(1));
    }

    #[test]
    fn test_multiline_program() {
        let source = "read n\nwhile n > 0\n  write n\n  n := n - 1\nend\n";
        assert_eq!(
            kinds(source),
            vec![
                TokenKind::Read,
                TokenKind::Identifier,
                TokenKind::While,
                TokenKind::Identifier,
                TokenKind::Rule,
                TokenKind::Literal,
                TokenKind::Write,
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::Gets,
                TokenKind::Identifier,
                TokenKind::Sub,
                TokenKind::Literal,
                TokenKind::End,
                TokenKind::Eof
            ]
        );
    }
}
