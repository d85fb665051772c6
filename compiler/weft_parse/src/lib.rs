//! Parser for Weft scripts.
//!
//! Turns source text into a single [`Expr`]: the script body as a block of
//! `;`-separated statements. Operators are folded by precedence climbing
//! over the table in [`weft_ir::prec`]; parenthesised groups and the keyword
//! forms `if(...)`, `while(...)`, `fun(...)` and `fun{...}` share one
//! section parser that runs with the group's closing token as its stop
//! token.

mod cursor;
mod error;
mod grammar;

pub use error::ParseError;

use weft_ir::{Expr, Span};
use weft_lexer::Lexer;

use cursor::Delimiter;

/// Parser state: the token stream plus the active stop token.
pub struct Parser<'src> {
    lexer: Lexer<'src>,
    source: &'src str,
    stop: Delimiter,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> Self {
        Parser {
            lexer: Lexer::new(source),
            source,
            stop: Delimiter::Eof,
        }
    }

    /// Parser over a sub-range of `source`, used for `${...}` code.
    fn with_range(source: &'src str, range: Span) -> Self {
        let line = range.line_in(source);
        Parser {
            lexer: Lexer::with_range(source, range, line),
            source,
            stop: Delimiter::Eof,
        }
    }

    /// Parse the whole input as a script body.
    pub fn parse_program(mut self) -> Result<Expr, ParseError> {
        self.program()
    }
}

/// Parse a complete script.
#[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
pub fn parse(source: &str) -> Result<Expr, ParseError> {
    Parser::new(source).parse_program()
}

#[cfg(test)]
mod tests;
