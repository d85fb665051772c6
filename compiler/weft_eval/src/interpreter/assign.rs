//! Assignment, definition targets and `++`/`--`.

use weft_ir::{DefineKind, Expr, ExprKind, Fixity, Name, UnaryOp};

use super::Interpreter;
use crate::errors::{invalid_operand, tuple_arity_mismatch, EvalError, EvalResult};
use crate::scope::Cell;
use crate::{numeric, Value};

impl Interpreter<'_> {
    /// Store `value` into an assignment target.
    pub(super) fn assign_to(&mut self, target: &Expr, value: Value) -> Result<(), EvalError> {
        match &target.kind {
            ExprKind::Ident(name) => self.assign_name(name, value),
            ExprKind::Paren(inner) => self.assign_to(inner, value),
            ExprKind::Tuple(targets) => {
                let items = destructure(targets.len(), &value)?;
                for (target, item) in targets.iter().zip(items) {
                    self.assign_to(target, item)?;
                }
                Ok(())
            }
            ExprKind::Member { target, name } => {
                let receiver = self.eval(target)?;
                self.set_member(&receiver, name, value)
            }
            ExprKind::Define { kind, names } => {
                let items = if names.len() == 1 {
                    vec![value]
                } else {
                    destructure(names.len(), &value)?
                };
                for (name, item) in names.iter().zip(items) {
                    let cell = match kind {
                        DefineKind::Value => Cell::Value(item),
                        DefineKind::Constant => Cell::Constant(item),
                    };
                    self.scope.define(name, cell)?;
                }
                Ok(())
            }
            _ => Err(EvalError::new("invalid assignment target")),
        }
    }

    /// Update the nearest existing binding, or define one where new
    /// definitions from the current scope land.
    pub(super) fn assign_name(&mut self, name: &Name, value: Value) -> Result<(), EvalError> {
        if self.scope.assign_existing(name, value.clone())? {
            return Ok(());
        }
        self.scope.define(name, Cell::Value(value))
    }

    /// Prefix or postfix `++`/`--` on an identifier or member.
    pub(super) fn eval_step(&mut self, op: UnaryOp, fixity: Fixity, operand: &Expr) -> EvalResult {
        let delta = if op == UnaryOp::Increment { 1 } else { -1 };
        let (old, new) = match &operand.kind {
            ExprKind::Ident(name) => {
                let old = self.lookup(name)?;
                let new = numeric::step(&old, delta)?;
                self.assign_name(name, new.clone())?;
                (old, new)
            }
            ExprKind::Member { target, name } => {
                let receiver = self.eval(target)?;
                let old = self.get_member(&receiver, name)?;
                let new = numeric::step(&old, delta)?;
                self.set_member(&receiver, name, new.clone())?;
                (old, new)
            }
            ExprKind::Paren(inner) => return self.eval_step(op, fixity, inner),
            _ => return Err(invalid_operand(op.as_symbol(), "expression")),
        };
        Ok(match fixity {
            Fixity::Prefix => new,
            Fixity::Postfix => old,
        })
    }
}

/// Split `value` into exactly `expected` parts.
fn destructure(expected: usize, value: &Value) -> Result<Vec<Value>, EvalError> {
    let items = value.tuple_items();
    if items.len() == expected {
        Ok(items)
    } else {
        Err(tuple_arity_mismatch(expected, items.len()))
    }
}
