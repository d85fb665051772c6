//! Grammar productions.
//!
//! - `expr`: the precedence-climbing loop
//! - `operators`: infix/postfix operator table
//! - `primary`: literals, groups, keyword forms, interpolation
//! - `targets`: assignment targets and lambda parameter lists
//!
//! This module holds the section parser shared by every group: elements are
//! separated by `,`, sections by `;`, and the group ends at the active stop
//! token.

mod expr;
mod operators;
mod primary;
mod targets;

use weft_ir::{prec, Expr, ExprKind, Span, TokenKind};

use crate::cursor::Delimiter;
use crate::{ParseError, Parser};

/// One `;`-separated section of a group.
#[derive(Debug)]
pub(crate) struct Section {
    pub items: Vec<Expr>,
    /// A `,` appeared, so a single item still forms a tuple.
    pub had_comma: bool,
    pub span: Span,
}

impl Section {
    fn new(span: Span) -> Self {
        Section {
            items: Vec::new(),
            had_comma: false,
            span,
        }
    }

    fn is_empty(&self) -> bool {
        self.items.is_empty() && !self.had_comma
    }

    /// Collapse to one expression: empty tuple, single item or tuple.
    pub fn into_expr(self) -> Expr {
        let span = self
            .items
            .iter()
            .map(|e| e.span)
            .reduce(Span::merge)
            .unwrap_or(self.span);
        if !self.had_comma && self.items.len() == 1 {
            if let Some(item) = self.items.into_iter().next() {
                return item;
            }
            return Expr::empty(span);
        }
        Expr::new(ExprKind::Tuple(self.items), span)
    }
}

/// Result of parsing a delimited group.
pub(crate) struct Group {
    pub sections: Vec<Section>,
    /// Span from the opening token through the closing token.
    pub span: Span,
}

impl Group {
    /// Sequence of the non-empty sections as a block.
    pub fn into_block(self) -> Expr {
        block_of(self.sections, self.span)
    }
}

pub(crate) fn block_of(sections: Vec<Section>, span: Span) -> Expr {
    let mut exprs: Vec<Expr> = sections
        .into_iter()
        .filter(|s| !s.is_empty())
        .map(Section::into_expr)
        .collect();
    match exprs.len() {
        0 => Expr::empty(span),
        1 => exprs.pop().unwrap_or_else(|| Expr::empty(span)),
        _ => Expr::new(ExprKind::Block(exprs), span),
    }
}

impl Parser<'_> {
    /// Whole input up to end of file.
    pub(crate) fn program(&mut self) -> Result<Expr, ParseError> {
        let open = Span::new(0, 0);
        let group = self.group(Delimiter::Eof, open)?;
        Ok(group.into_block())
    }

    /// Parse sections until `close`, after the opening token at `open`.
    pub(crate) fn group(&mut self, close: Delimiter, open: Span) -> Result<Group, ParseError> {
        self.with_stop(close, |p| p.group_sections(open))
    }

    fn group_sections(&mut self, open: Span) -> Result<Group, ParseError> {
        let mut sections = vec![Section::new(open)];
        loop {
            let token = self.next()?;
            if self.stop.closes(&token.kind) {
                return Ok(Group {
                    sections,
                    span: open.merge(token.span),
                });
            }
            match token.kind {
                TokenKind::Semi => {
                    sections.push(Section::new(token.span));
                    continue;
                }
                TokenKind::Eof => return Err(self.unclosed(open)),
                _ => self.push_back(token),
            }

            let item = self.expr(prec::LOWEST)?;
            if let Some(section) = sections.last_mut() {
                section.items.push(item);
            }

            let after = self.next()?;
            if self.stop.closes(&after.kind) {
                return Ok(Group {
                    sections,
                    span: open.merge(after.span),
                });
            }
            match after.kind {
                TokenKind::Comma => {
                    if let Some(section) = sections.last_mut() {
                        section.had_comma = true;
                    }
                }
                TokenKind::Semi => sections.push(Section::new(after.span)),
                TokenKind::Eof => return Err(self.unclosed(open)),
                _ => return Err(self.unexpected(&after, self.separator_expectation())),
            }
        }
    }

    fn unclosed(&self, open: Span) -> ParseError {
        ParseError::MissingDelimiter {
            delimiter: self.stop.symbol(),
            span: open,
            line: self.line_of(open),
        }
    }

    fn separator_expectation(&self) -> &'static str {
        match self.stop {
            Delimiter::Eof => "`;` or end of input",
            Delimiter::Paren => "`,`, `;` or `)`",
            Delimiter::Brace => "`,`, `;` or `}`",
        }
    }
}
