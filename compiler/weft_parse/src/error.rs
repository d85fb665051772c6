//! Parse errors.
//!
//! The grammar has no recovery: the first error aborts compilation and is
//! reported with the offending token text and its location.

use thiserror::Error;
use weft_ir::Span;
use weft_lexer::LexError;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("line {line}: unexpected {found}, expected {expected}")]
    UnexpectedToken {
        found: String,
        expected: &'static str,
        span: Span,
        line: u32,
    },

    #[error("line {line}: missing closing `{delimiter}`")]
    MissingDelimiter {
        delimiter: &'static str,
        span: Span,
        line: u32,
    },

    #[error("line {line}: `{keyword}` takes {expected} `;`-separated sections, found {found}")]
    KeywordArity {
        keyword: &'static str,
        expected: &'static str,
        found: usize,
        span: Span,
        line: u32,
    },

    #[error("line {line}: invalid assignment target")]
    InvalidAssignmentTarget { span: Span, line: u32 },

    #[error("line {line}: function parameters must be identifiers")]
    InvalidParameters { span: Span, line: u32 },

    #[error("line {line}: `{keyword}(...)` expects a list of identifiers")]
    InvalidDefinition {
        keyword: &'static str,
        span: Span,
        line: u32,
    },

    #[error("line {line}: the conditional operator `?:` is not supported")]
    UnsupportedConditional { span: Span, line: u32 },
}

impl ParseError {
    pub fn span(&self) -> Span {
        match self {
            ParseError::Lex(e) => e.span(),
            ParseError::UnexpectedToken { span, .. }
            | ParseError::MissingDelimiter { span, .. }
            | ParseError::KeywordArity { span, .. }
            | ParseError::InvalidAssignmentTarget { span, .. }
            | ParseError::InvalidParameters { span, .. }
            | ParseError::InvalidDefinition { span, .. }
            | ParseError::UnsupportedConditional { span, .. } => *span,
        }
    }

    pub fn line(&self) -> u32 {
        match self {
            ParseError::Lex(e) => e.line(),
            ParseError::UnexpectedToken { line, .. }
            | ParseError::MissingDelimiter { line, .. }
            | ParseError::KeywordArity { line, .. }
            | ParseError::InvalidAssignmentTarget { line, .. }
            | ParseError::InvalidParameters { line, .. }
            | ParseError::InvalidDefinition { line, .. }
            | ParseError::UnsupportedConditional { line, .. } => *line,
        }
    }
}
