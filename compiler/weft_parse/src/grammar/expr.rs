//! Precedence climbing.
//!
//! `expr(limit)` parses a prefix expression, then keeps folding the next
//! operator into the result while the operator's precedence is at most
//! `limit`. Right operands are parsed with the operator's right limit, which
//! makes left-associative operators stop at their own level and
//! right-associative ones (`=`, `->`) recurse into it.

use std::sync::Arc;

use tracing::debug;
use weft_ir::{prec, Expr, ExprKind, Fixity, FunctionLiteral, FunctionStyle, Token, TokenKind};
use weft_stack::ensure_sufficient_stack;

use super::operators::{prefix_op, InfixOp};
use crate::cursor::Delimiter;
use crate::{ParseError, Parser};

impl Parser<'_> {
    pub(crate) fn expr(&mut self, limit: u8) -> Result<Expr, ParseError> {
        ensure_sufficient_stack(|| self.expr_inner(limit))
    }

    fn expr_inner(&mut self, limit: u8) -> Result<Expr, ParseError> {
        let mut left = self.prefix()?;
        loop {
            let token = self.next()?;
            let Some(op) = InfixOp::from_token(&token.kind) else {
                self.push_back(token);
                return Ok(left);
            };
            if op.precedence() > limit {
                self.push_back(token);
                return Ok(left);
            }
            left = self.fold(op, left, token)?;
        }
    }

    fn prefix(&mut self) -> Result<Expr, ParseError> {
        let token = self.next()?;
        let Some(op) = prefix_op(&token.kind) else {
            self.push_back(token);
            return self.primary();
        };
        let operand = self.expr(prec::PREFIX)?;
        if op.is_step() {
            self.check_step_target(&operand)?;
        }
        let span = token.span.merge(operand.span);
        Ok(Expr::new(
            ExprKind::Unary {
                op,
                fixity: Fixity::Prefix,
                operand: Box::new(operand),
            },
            span,
        ))
    }

    fn fold(&mut self, op: InfixOp, left: Expr, token: Token) -> Result<Expr, ParseError> {
        match op {
            InfixOp::Binary(bin) => {
                if bin == weft_ir::BinaryOp::Assign {
                    self.check_assign_target(&left)?;
                }
                let right = self.expr(op.right_limit())?;
                let span = left.span.merge(right.span);
                Ok(Expr::new(
                    ExprKind::Binary {
                        op: bin,
                        left: Box::new(left),
                        right: Box::new(right),
                    },
                    span,
                ))
            }
            InfixOp::Call => {
                let group = self.group(Delimiter::Paren, token.span)?;
                let mut sections = group.sections.into_iter();
                let args = sections.next().map(|s| s.items).unwrap_or_default();
                if let Some(extra) = sections.next() {
                    return Err(ParseError::UnexpectedToken {
                        found: "`;`".to_string(),
                        expected: "`,` or `)` in an argument list",
                        span: extra.span,
                        line: self.line_of(extra.span),
                    });
                }
                let span = left.span.merge(group.span);
                Ok(Expr::new(
                    ExprKind::Call {
                        target: Box::new(left),
                        args,
                    },
                    span,
                ))
            }
            InfixOp::Member => {
                let name_token = self.next()?;
                let TokenKind::Ident(name) = name_token.kind.clone() else {
                    return Err(self.unexpected(&name_token, "member name after `.`"));
                };
                let span = left.span.merge(name_token.span);
                Ok(Expr::new(
                    ExprKind::Member {
                        target: Box::new(left),
                        name,
                    },
                    span,
                ))
            }
            InfixOp::PostfixStep(step) => {
                self.check_step_target(&left)?;
                let span = left.span.merge(token.span);
                Ok(Expr::new(
                    ExprKind::Unary {
                        op: step,
                        fixity: Fixity::Postfix,
                        operand: Box::new(left),
                    },
                    span,
                ))
            }
            InfixOp::Lambda => {
                let params = self.lambda_params(&left)?;
                let body = self.expr(op.right_limit())?;
                let span = left.span.merge(body.span);
                debug!(params = params.len(), "lambda");
                Ok(Expr::new(
                    ExprKind::Function(Arc::new(FunctionLiteral {
                        params,
                        body,
                        style: FunctionStyle::Expression,
                    })),
                    span,
                ))
            }
            InfixOp::Conditional => Err(ParseError::UnsupportedConditional {
                span: token.span,
                line: token.line,
            }),
        }
    }
}
