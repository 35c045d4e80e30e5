//! Lexer for the generated SQL surface using logos.

use crate::error::ExtractError;
use crate::span::Span;
use logos::Logos;

/// Token types for the SQL surface emitted by the generator.
///
/// Keywords are matched case-insensitively. Function names (`SUM`, `COUNT`,
/// ...) are plain identifiers; callers recognise them by a following `(`.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
pub enum Token {
    // Clause keywords
    #[token("select", ignore(ascii_case))]
    Select,
    #[token("distinct", ignore(ascii_case))]
    Distinct,
    #[token("from", ignore(ascii_case))]
    From,
    #[token("where", ignore(ascii_case))]
    Where,
    #[token("group", ignore(ascii_case))]
    Group,
    #[token("having", ignore(ascii_case))]
    Having,
    #[token("order", ignore(ascii_case))]
    Order,
    #[token("by", ignore(ascii_case))]
    By,
    #[token("limit", ignore(ascii_case))]
    Limit,
    #[token("offset", ignore(ascii_case))]
    Offset,
    #[token("union", ignore(ascii_case))]
    Union,

    // Join keywords
    #[token("join", ignore(ascii_case))]
    Join,
    #[token("inner", ignore(ascii_case))]
    Inner,
    #[token("left", ignore(ascii_case))]
    Left,
    #[token("right", ignore(ascii_case))]
    Right,
    #[token("full", ignore(ascii_case))]
    Full,
    #[token("outer", ignore(ascii_case))]
    Outer,
    #[token("cross", ignore(ascii_case))]
    Cross,
    #[token("on", ignore(ascii_case))]
    On,
    #[token("using", ignore(ascii_case))]
    Using,

    // Window keywords
    #[token("over", ignore(ascii_case))]
    Over,
    #[token("partition", ignore(ascii_case))]
    Partition,

    // Sort direction
    #[token("asc", ignore(ascii_case))]
    Asc,
    #[token("desc", ignore(ascii_case))]
    Desc,

    // Predicate keywords
    #[token("and", ignore(ascii_case))]
    And,
    #[token("or", ignore(ascii_case))]
    Or,
    #[token("not", ignore(ascii_case))]
    Not,
    #[token("in", ignore(ascii_case))]
    In,
    #[token("is", ignore(ascii_case))]
    Is,
    #[token("null", ignore(ascii_case))]
    Null,
    #[token("between", ignore(ascii_case))]
    Between,
    #[token("like", ignore(ascii_case))]
    Like,
    #[token("as", ignore(ascii_case))]
    As,

    // Comparison operators
    #[token("=")]
    Eq,
    #[token("!=")]
    #[token("<>")]
    Ne,
    #[token("<=")]
    Le,
    #[token(">=")]
    Ge,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,

    // Arithmetic
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("/")]
    Slash,
    #[token("*")]
    Star,

    // Identifier (bare or double-quoted)
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    #[regex(r#""[^"]+""#, |lex| {
        let s = lex.slice();
        s[1..s.len() - 1].to_string()
    })]
    Ident(String),

    // String literal, '' escapes a quote
    #[regex(r"'([^']|'')*'", |lex| {
        let s = lex.slice();
        s[1..s.len() - 1].replace("''", "'")
    })]
    String(String),

    // Integer literal
    #[regex(r"[0-9]+", |lex| lex.slice().parse::<i64>().ok())]
    Int(i64),

    // Float literal
    #[regex(r"[0-9]+\.[0-9]+", |lex| lex.slice().parse::<f64>().ok())]
    Float(f64),

    // Punctuation
    #[token(".")]
    Dot,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
}

impl Token {
    /// True for literal values that can sit on the right of a comparison.
    pub fn is_literal(&self) -> bool {
        matches!(self, Token::String(_) | Token::Int(_) | Token::Float(_))
    }

    /// Identifier text, if this token is an identifier.
    pub fn ident(&self) -> Option<&str> {
        match self {
            Token::Ident(name) => Some(name),
            _ => None,
        }
    }
}

/// A token with its span in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Span,
}

/// Lexer that produces spanned tokens.
pub struct Lexer<'source> {
    inner: logos::Lexer<'source, Token>,
}

impl<'source> Lexer<'source> {
    /// Create a new lexer for the given source.
    pub fn new(source: &'source str) -> Self {
        Self {
            inner: Token::lexer(source),
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<SpannedToken, ExtractError>;

    fn next(&mut self) -> Option<Self::Item> {
        let result = self.inner.next()?;
        let span: Span = self.inner.span().into();
        Some(match result {
            Ok(token) => Ok(SpannedToken { token, span }),
            Err(()) => Err(ExtractError::UnexpectedInput {
                found: self.inner.slice().to_string(),
                span,
            }),
        })
    }
}

/// Whether `name` lexes as exactly one bare identifier spelling `name`.
///
/// Keywords (`order`, `limit`, ...) and names needing quotes fail this check,
/// since the generator emits names unquoted.
pub fn is_bare_identifier(name: &str) -> bool {
    let mut lexer = Token::lexer(name);
    let first_is_name = matches!(lexer.next(), Some(Ok(Token::Ident(ident))) if ident == name);
    first_is_name && lexer.next().is_none()
}

/// Tokenize a source string into a vector of spanned tokens.
///
/// Fails on the first character sequence that is not part of the surface.
pub fn tokenize(source: &str) -> Result<Vec<SpannedToken>, ExtractError> {
    Lexer::new(source).collect()
}
