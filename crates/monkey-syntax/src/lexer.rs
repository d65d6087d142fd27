use crate::token::{Token, TokenKind};

use logos::Logos;

/// A source of tokens for the parser. Once the input is exhausted, every
/// further call must return an [`TokenKind::Eof`] token.
pub trait TokenStream {
    fn next_token(&mut self) -> Token;
}

pub struct Lexer<'a> {
    inner: logos::Lexer<'a, TokenKind>,
    pending: Option<Token>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { inner: TokenKind::lexer(source), pending: None }
    }

    fn token(&self, kind: TokenKind) -> Token {
        Token::new(kind, self.inner.slice(), self.inner.span())
    }
}

impl TokenStream for Lexer<'_> {
    fn next_token(&mut self) -> Token {
        if let Some(token) = self.pending.take() {
            return token;
        }

        match self.inner.next() {
            None => Token::eof(self.inner.source().len()),
            Some(TokenKind::Error) => {
                let mut span = self.inner.span();

                // Glue the rest of the word onto the illegal input.
                while let Some(kind) = self.inner.next() {
                    let span_new = self.inner.span();
                    let is_word =
                        matches!(kind, TokenKind::Error | TokenKind::Identifier | TokenKind::Int);
                    if is_word && span.end == span_new.start {
                        span.end = span_new.end;
                    } else {
                        self.pending = Some(self.token(kind));
                        break;
                    }
                }

                let literal = &self.inner.source()[span.clone()];
                Token::new(TokenKind::Error, literal, span)
            }
            Some(kind) => self.token(kind),
        }
    }
}

impl TokenStream for std::vec::IntoIter<Token> {
    fn next_token(&mut self) -> Token {
        self.next().unwrap_or_else(|| Token::eof(0))
    }
}
