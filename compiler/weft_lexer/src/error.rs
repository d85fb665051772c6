//! Lexical errors. All of them abort compilation.

use thiserror::Error;
use weft_ir::Span;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("line {line}: illegal character `{ch}`")]
    IllegalCharacter { ch: char, span: Span, line: u32 },

    #[error("line {line}: unterminated string literal")]
    UnterminatedString { span: Span, line: u32 },

    #[error("line {line}: unterminated escape sequence")]
    UnterminatedEscape { span: Span, line: u32 },

    #[error("line {line}: invalid escape sequence `\\{ch}`")]
    InvalidEscape { ch: char, span: Span, line: u32 },

    #[error("line {line}: invalid unicode escape `\\u{digits}`")]
    InvalidUnicodeEscape { digits: String, span: Span, line: u32 },

    #[error("line {line}: unterminated `${{...}}` interpolation")]
    UnterminatedInterpolation { span: Span, line: u32 },

    #[error("line {line}: unterminated block comment")]
    UnterminatedComment { span: Span, line: u32 },
}

impl LexError {
    pub fn span(&self) -> Span {
        match self {
            LexError::IllegalCharacter { span, .. }
            | LexError::UnterminatedString { span, .. }
            | LexError::UnterminatedEscape { span, .. }
            | LexError::InvalidEscape { span, .. }
            | LexError::InvalidUnicodeEscape { span, .. }
            | LexError::UnterminatedInterpolation { span, .. }
            | LexError::UnterminatedComment { span, .. } => *span,
        }
    }

    pub fn line(&self) -> u32 {
        match self {
            LexError::IllegalCharacter { line, .. }
            | LexError::UnterminatedString { line, .. }
            | LexError::UnterminatedEscape { line, .. }
            | LexError::InvalidEscape { line, .. }
            | LexError::InvalidUnicodeEscape { line, .. }
            | LexError::UnterminatedInterpolation { line, .. }
            | LexError::UnterminatedComment { line, .. } => *line,
        }
    }
}
