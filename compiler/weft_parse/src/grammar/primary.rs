//! Primary expressions: literals, identifiers, groups and keyword forms.

use std::sync::Arc;

use tracing::debug;
use weft_ir::{
    DefineKind, Expr, ExprKind, FunctionLiteral, FunctionStyle, InterpolationPart, Name, Span,
    StrLiteral, StrPart, Token, TokenKind,
};

use super::{block_of, Group};
use crate::cursor::Delimiter;
use crate::{ParseError, Parser};

impl Parser<'_> {
    pub(crate) fn primary(&mut self) -> Result<Expr, ParseError> {
        let token = self.next()?;
        let span = token.span;
        let kind = match token.kind {
            TokenKind::Ident(ref name) => {
                if let Some(kind) = DefineKind::from_keyword(name) {
                    if let Some(open) = self.eat_if(|k| matches!(k, TokenKind::LParen))? {
                        return self.define_form(kind, open);
                    }
                }
                ExprKind::Ident(name.clone())
            }
            TokenKind::Number(ref text) => ExprKind::Number(text.clone()),
            TokenKind::True => ExprKind::Bool(true),
            TokenKind::False => ExprKind::Bool(false),
            TokenKind::Null => ExprKind::Null,
            TokenKind::Str(ref lit) => return self.string(lit, span),
            TokenKind::LParen => {
                let group = self.group(Delimiter::Paren, span)?;
                return Ok(paren_group(group));
            }
            TokenKind::If => return self.if_form(&token),
            TokenKind::While => return self.while_form(&token),
            TokenKind::Fun => return self.fun_form(&token),
            _ => return Err(self.unexpected(&token, "an expression")),
        };
        Ok(Expr::new(kind, span))
    }

    fn string(&mut self, lit: &StrLiteral, span: Span) -> Result<Expr, ParseError> {
        if !lit.is_interpolated() {
            return Ok(Expr::new(ExprKind::Str(Arc::from(lit.plain_text())), span));
        }
        let mut parts = Vec::with_capacity(lit.parts.len());
        for part in &lit.parts {
            match part {
                StrPart::Text(text) => parts.push(InterpolationPart::Text(Arc::from(text.as_str()))),
                StrPart::Code(range) => {
                    let code = Parser::with_range(self.source, *range).parse_program()?;
                    parts.push(InterpolationPart::Expr(code));
                }
            }
        }
        debug!(parts = parts.len(), "interpolated string");
        Ok(Expr::new(ExprKind::Interpolated(parts), span))
    }

    /// `def(a, b)` / `val(a)` after the opening parenthesis.
    fn define_form(&mut self, kind: DefineKind, open: Token) -> Result<Expr, ParseError> {
        let group = self.group(Delimiter::Paren, open.span)?;
        let span = group.span;
        let invalid = || ParseError::InvalidDefinition {
            keyword: kind.keyword(),
            span,
            line: open.line,
        };
        if group.sections.len() != 1 {
            return Err(invalid());
        }
        let mut names = Vec::new();
        for section in group.sections {
            for item in section.items {
                match item.kind {
                    ExprKind::Ident(name) => names.push(name),
                    _ => return Err(invalid()),
                }
            }
        }
        if names.is_empty() {
            return Err(invalid());
        }
        Ok(Expr::new(ExprKind::Define { kind, names }, span))
    }

    /// `if(cond; then)` or `if(cond; then; else)`.
    fn if_form(&mut self, keyword: &Token) -> Result<Expr, ParseError> {
        let group = self.keyword_group(keyword, "`(` after `if`", Delimiter::Paren)?;
        let span = group.span;
        let found = group.sections.len();
        if !(2..=3).contains(&found) {
            return Err(ParseError::KeywordArity {
                keyword: "if",
                expected: "2 or 3",
                found,
                span,
                line: keyword.line,
            });
        }
        let mut sections = group.sections.into_iter().map(super::Section::into_expr);
        let (Some(cond), Some(then_branch)) = (sections.next(), sections.next()) else {
            return Err(ParseError::KeywordArity {
                keyword: "if",
                expected: "2 or 3",
                found,
                span,
                line: keyword.line,
            });
        };
        let else_branch = sections.next().map(Box::new);
        Ok(Expr::new(
            ExprKind::If {
                cond: Box::new(cond),
                then_branch: Box::new(then_branch),
                else_branch,
            },
            span,
        ))
    }

    /// `while(cond; body...)`.
    fn while_form(&mut self, keyword: &Token) -> Result<Expr, ParseError> {
        let group = self.keyword_group(keyword, "`(` after `while`", Delimiter::Paren)?;
        let span = group.span;
        let found = group.sections.len();
        if found < 2 {
            return Err(ParseError::KeywordArity {
                keyword: "while",
                expected: "at least 2",
                found,
                span,
                line: keyword.line,
            });
        }
        let mut sections = group.sections;
        let body_sections = sections.split_off(1);
        let cond = sections
            .pop()
            .map_or_else(|| Expr::empty(span), super::Section::into_expr);
        Ok(Expr::new(
            ExprKind::While {
                cond: Box::new(cond),
                body: Box::new(block_of(body_sections, span)),
            },
            span,
        ))
    }

    /// `fun(params; body...)` or `fun{params; body...}`.
    fn fun_form(&mut self, keyword: &Token) -> Result<Expr, ParseError> {
        let open = self.next()?;
        let (close, style) = match open.kind {
            TokenKind::LParen => (Delimiter::Paren, FunctionStyle::Expression),
            TokenKind::LBrace => (Delimiter::Brace, FunctionStyle::Block),
            _ => return Err(self.unexpected(&open, "`(` or `{` after `fun`")),
        };
        let group = self.group(close, open.span)?;
        let span = keyword.span.merge(group.span);
        let found = group.sections.len();
        if found < 2 {
            return Err(ParseError::KeywordArity {
                keyword: "fun",
                expected: "at least 2",
                found,
                span,
                line: keyword.line,
            });
        }
        let mut sections = group.sections;
        let body_sections = sections.split_off(1);
        let mut params: Vec<Name> = Vec::new();
        for section in sections {
            for item in section.items {
                match item.kind {
                    ExprKind::Ident(name) => params.push(name),
                    _ => {
                        return Err(ParseError::InvalidParameters {
                            span: item.span,
                            line: self.line_of(item.span),
                        })
                    }
                }
            }
        }
        let body = block_of(body_sections, span);
        Ok(Expr::new(
            ExprKind::Function(Arc::new(FunctionLiteral { params, body, style })),
            span,
        ))
    }

    fn keyword_group(
        &mut self,
        keyword: &Token,
        expected: &'static str,
        close: Delimiter,
    ) -> Result<Group, ParseError> {
        let open = self.expect(&TokenKind::LParen, expected)?;
        let mut group = self.group(close, open.span)?;
        group.span = keyword.span.merge(group.span);
        Ok(group)
    }
}

/// `( ... )`: empty tuple, parenthesised expression, tuple or block.
fn paren_group(group: Group) -> Expr {
    let span = group.span;
    if group.sections.len() > 1 {
        return group.into_block();
    }
    let Some(section) = group.sections.into_iter().next() else {
        return Expr::empty(span);
    };
    if section.had_comma || section.items.len() != 1 {
        return Expr::new(ExprKind::Tuple(section.items), span);
    }
    match section.items.into_iter().next() {
        Some(inner) => Expr::new(ExprKind::Paren(Box::new(inner)), span),
        None => Expr::empty(span),
    }
}
