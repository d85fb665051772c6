//! Token definitions produced by the lexer.

use std::fmt;

use crate::{Name, Span};

/// A lexed token with its source location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    /// One-based line of the token's first character.
    pub line: u32,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span, line: u32) -> Self {
        Token { kind, span, line }
    }

    /// The literal source text of the token.
    pub fn text<'src>(&self, source: &'src str) -> &'src str {
        self.span.text(source)
    }

    pub fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }
}

/// One fragment of a double-quoted string literal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StrPart {
    /// Literal text with escapes already decoded.
    Text(String),
    /// Source range of the code between `${` and its matching `}`.
    Code(Span),
}

/// Decoded string literal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StrLiteral {
    pub parts: Vec<StrPart>,
}

impl StrLiteral {
    /// Whether the literal contains any `${...}` interpolation.
    pub fn is_interpolated(&self) -> bool {
        self.parts.iter().any(|p| matches!(p, StrPart::Code(_)))
    }

    /// Concatenated text of a literal without interpolation.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for part in &self.parts {
            if let StrPart::Text(text) = part {
                out.push_str(text);
            }
        }
        out
    }
}

/// Token kinds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenKind {
    Ident(Name),
    /// Numeric literal text; integral vs fractional is decided at evaluation.
    Number(Name),
    Str(StrLiteral),

    // Keywords
    If,
    While,
    Fun,
    True,
    False,
    Null,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    PlusPlus,
    MinusMinus,
    Bang,
    Lt,
    Gt,
    LtEq,
    GtEq,
    EqEq,
    NotEq,
    AmpAmp,
    PipePipe,
    Eq,
    Arrow,
    Dot,
    Question,
    Colon,

    // Punctuation
    LParen,
    RParen,
    LBrace,
    RBrace,
    Comma,
    Semi,

    Eof,
}

impl TokenKind {
    /// Keyword for an identifier spelling, if any.
    pub fn keyword(text: &str) -> Option<TokenKind> {
        Some(match text {
            "if" => TokenKind::If,
            "while" => TokenKind::While,
            "fun" => TokenKind::Fun,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "null" => TokenKind::Null,
            _ => return None,
        })
    }

    /// Short human-readable description used in parse errors.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Ident(name) => format!("identifier `{name}`"),
            TokenKind::Number(text) => format!("number `{text}`"),
            TokenKind::Str(_) => "string literal".to_string(),
            TokenKind::Eof => "end of input".to_string(),
            other => format!("`{other}`"),
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TokenKind::Ident(name) | TokenKind::Number(name) => return f.write_str(name),
            TokenKind::Str(lit) => return write!(f, "{:?}", lit.plain_text()),
            TokenKind::If => "if",
            TokenKind::While => "while",
            TokenKind::Fun => "fun",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::Null => "null",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::PlusPlus => "++",
            TokenKind::MinusMinus => "--",
            TokenKind::Bang => "!",
            TokenKind::Lt => "<",
            TokenKind::Gt => ">",
            TokenKind::LtEq => "<=",
            TokenKind::GtEq => ">=",
            TokenKind::EqEq => "==",
            TokenKind::NotEq => "!=",
            TokenKind::AmpAmp => "&&",
            TokenKind::PipePipe => "||",
            TokenKind::Eq => "=",
            TokenKind::Arrow => "->",
            TokenKind::Dot => ".",
            TokenKind::Question => "?",
            TokenKind::Colon => ":",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::Comma => ",",
            TokenKind::Semi => ";",
            TokenKind::Eof => "<eof>",
        };
        f.write_str(text)
    }
}
