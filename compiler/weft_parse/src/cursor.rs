//! Token access on top of the lexer's push-back slot.

use tracing::trace;
use weft_ir::{Span, Token, TokenKind};

use crate::{ParseError, Parser};

/// Closing token for the group currently being parsed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Delimiter {
    Eof,
    Paren,
    Brace,
}

impl Delimiter {
    pub(crate) fn closes(self, kind: &TokenKind) -> bool {
        matches!(
            (self, kind),
            (Delimiter::Eof, TokenKind::Eof)
                | (Delimiter::Paren, TokenKind::RParen)
                | (Delimiter::Brace, TokenKind::RBrace)
        )
    }

    pub(crate) fn symbol(self) -> &'static str {
        match self {
            Delimiter::Eof => "<eof>",
            Delimiter::Paren => ")",
            Delimiter::Brace => "}",
        }
    }
}

impl Parser<'_> {
    pub(crate) fn next(&mut self) -> Result<Token, ParseError> {
        let token = self.lexer.next_token()?;
        trace!(kind = ?token.kind, span = %token.span, "token");
        Ok(token)
    }

    pub(crate) fn push_back(&mut self, token: Token) {
        self.lexer.push_back(token);
    }

    /// Consume the next token if `pred` accepts its kind.
    pub(crate) fn eat_if(
        &mut self,
        pred: impl FnOnce(&TokenKind) -> bool,
    ) -> Result<Option<Token>, ParseError> {
        let token = self.next()?;
        if pred(&token.kind) {
            Ok(Some(token))
        } else {
            self.push_back(token);
            Ok(None)
        }
    }

    /// Consume a token of exactly `kind` or fail with `expected`.
    pub(crate) fn expect(
        &mut self,
        kind: &TokenKind,
        expected: &'static str,
    ) -> Result<Token, ParseError> {
        let token = self.next()?;
        if &token.kind == kind {
            Ok(token)
        } else {
            Err(self.unexpected(&token, expected))
        }
    }

    /// Run `f` with `stop` as the active closing delimiter, restoring the
    /// previous one afterwards.
    pub(crate) fn with_stop<T>(
        &mut self,
        stop: Delimiter,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        let saved = std::mem::replace(&mut self.stop, stop);
        let result = f(self);
        self.stop = saved;
        result
    }

    pub(crate) fn unexpected(&self, token: &Token, expected: &'static str) -> ParseError {
        if token.is_eof() && self.stop != Delimiter::Eof {
            return ParseError::MissingDelimiter {
                delimiter: self.stop.symbol(),
                span: token.span,
                line: token.line,
            };
        }
        ParseError::UnexpectedToken {
            found: token.kind.describe(),
            expected,
            span: token.span,
            line: token.line,
        }
    }

    pub(crate) fn line_of(&self, span: Span) -> u32 {
        span.line_in(self.source)
    }
}
