//! Validation of assignment targets and lambda parameter lists.

use weft_ir::{Expr, ExprKind, Name};

use crate::{ParseError, Parser};

impl Parser<'_> {
    /// Left side of `=`: identifier, member, definition form, or a
    /// (parenthesised) tuple of targets for destructuring.
    pub(crate) fn check_assign_target(&self, target: &Expr) -> Result<(), ParseError> {
        match &target.kind {
            ExprKind::Ident(_) | ExprKind::Member { .. } | ExprKind::Define { .. } => Ok(()),
            ExprKind::Paren(inner) => self.check_assign_target(inner),
            ExprKind::Tuple(items) if !items.is_empty() => {
                items.iter().try_for_each(|item| self.check_assign_target(item))
            }
            _ => Err(self.invalid_target(target)),
        }
    }

    /// Operand of `++` / `--`.
    pub(crate) fn check_step_target(&self, target: &Expr) -> Result<(), ParseError> {
        match &target.kind {
            ExprKind::Ident(_) | ExprKind::Member { .. } => Ok(()),
            ExprKind::Paren(inner) => self.check_step_target(inner),
            _ => Err(self.invalid_target(target)),
        }
    }

    /// Left side of `->`: `x`, `(x)`, `()` or `(x, y, ...)`.
    pub(crate) fn lambda_params(&self, left: &Expr) -> Result<Vec<Name>, ParseError> {
        let invalid = || ParseError::InvalidParameters {
            span: left.span,
            line: self.line_of(left.span),
        };
        match &left.kind {
            ExprKind::Ident(name) => Ok(vec![name.clone()]),
            ExprKind::Paren(inner) => inner
                .as_ident()
                .map(|name| vec![name.clone()])
                .ok_or_else(invalid),
            ExprKind::Tuple(items) => items
                .iter()
                .map(|item| item.as_ident().cloned().ok_or_else(invalid))
                .collect(),
            _ => Err(invalid()),
        }
    }

    fn invalid_target(&self, target: &Expr) -> ParseError {
        ParseError::InvalidAssignmentTarget {
            span: target.span,
            line: self.line_of(target.span),
        }
    }
}
