use logos::Logos;
use monkey_common::types::Span;

use std::fmt::{self, Display, Formatter};

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, literal: impl Into<String>, span: Span) -> Self {
        Self { kind, literal: literal.into(), span }
    }

    pub fn eof(offset: usize) -> Self {
        Self::new(TokenKind::Eof, "", offset..offset)
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, Logos, PartialEq)]
pub enum TokenKind {
    // Single-character tokens.
    #[token("(")]
    LtParen,
    #[token(")")]
    RtParen,
    #[token("{")]
    LtBrace,
    #[token("}")]
    RtBrace,
    #[token(",")]
    Comma,
    #[token("-")]
    Minus,
    #[token("+")]
    Plus,
    #[token(";")]
    Semicolon,
    #[token("/")]
    Slash,
    #[token("*")]
    Asterisk,

    // One or two character tokens.
    #[token("!")]
    Bang,
    #[token("!=")]
    BangEqual,
    #[token("=")]
    Assign,
    #[token("==")]
    EqualEqual,
    #[token(">")]
    Greater,
    #[token(">=")]
    GreaterEqual,
    #[token("<")]
    Less,
    #[token("<=")]
    LessEqual,

    // Literals.
    #[regex("[a-zA-Z_][a-zA-Z0-9_]*")]
    Identifier,
    #[regex("[0-9]+")]
    Int,

    // Keywords.
    #[token("else")]
    Else,
    #[token("false")]
    False,
    #[token("fn")]
    Function,
    #[token("if")]
    If,
    #[token("let")]
    Let,
    #[token("return")]
    Return,
    #[token("true")]
    True,

    /// Never produced by logos; the lexer emits it once the source runs out.
    Eof,

    #[regex(r"//.*", logos::skip)]
    #[regex(r"[ \r\n\t\f]+", logos::skip)]
    #[error]
    Error,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::LtParen => "`(`",
            TokenKind::RtParen => "`)`",
            TokenKind::LtBrace => "`{`",
            TokenKind::RtBrace => "`}`",
            TokenKind::Comma => "`,`",
            TokenKind::Minus => "`-`",
            TokenKind::Plus => "`+`",
            TokenKind::Semicolon => "`;`",
            TokenKind::Slash => "`/`",
            TokenKind::Asterisk => "`*`",
            TokenKind::Bang => "`!`",
            TokenKind::BangEqual => "`!=`",
            TokenKind::Assign => "`=`",
            TokenKind::EqualEqual => "`==`",
            TokenKind::Greater => "`>`",
            TokenKind::GreaterEqual => "`>=`",
            TokenKind::Less => "`<`",
            TokenKind::LessEqual => "`<=`",
            TokenKind::Identifier => "identifier",
            TokenKind::Int => "integer",
            TokenKind::Else => "`else`",
            TokenKind::False => "`false`",
            TokenKind::Function => "`fn`",
            TokenKind::If => "`if`",
            TokenKind::Let => "`let`",
            TokenKind::Return => "`return`",
            TokenKind::True => "`true`",
            TokenKind::Eof => "end of input",
            TokenKind::Error => "illegal input",
        };
        write!(f, "{name}")
    }
}
