//! Binary and unary operator semantics.
//!
//! `&&`, `||` and `=` never reach this module: they need unevaluated
//! operands and are handled by the interpreter. Everything else dispatches
//! here on already-evaluated values.

use std::cmp::Ordering;

use weft_ir::{BinaryOp, UnaryOp};

use crate::errors::{invalid_operand, invalid_operands, EvalResult};
use crate::numeric;
use crate::Value;

/// Evaluate `left op right`.
pub fn evaluate_binary(op: BinaryOp, left: &Value, right: &Value) -> EvalResult {
    match op {
        BinaryOp::Add if matches!(left, Value::Str(_)) || matches!(right, Value::Str(_)) => {
            Ok(Value::text(format!("{left}{right}")))
        }
        BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => {
            numeric::arithmetic(op, left, right)
        }
        BinaryOp::Eq => Ok(Value::Bool(values_equal(left, right))),
        BinaryOp::NotEq => Ok(Value::Bool(!values_equal(left, right))),
        BinaryOp::Lt | BinaryOp::Gt | BinaryOp::LtEq | BinaryOp::GtEq => {
            let ordering = order(left, right).ok_or_else(|| mismatch(op, left, right))?;
            Ok(Value::Bool(match op {
                BinaryOp::Lt => ordering == Ordering::Less,
                BinaryOp::Gt => ordering == Ordering::Greater,
                BinaryOp::LtEq => ordering != Ordering::Greater,
                _ => ordering != Ordering::Less,
            }))
        }
        BinaryOp::And | BinaryOp::Or | BinaryOp::Assign => Err(mismatch(op, left, right)),
    }
}

fn mismatch(op: BinaryOp, left: &Value, right: &Value) -> crate::EvalError {
    invalid_operands(op.as_symbol(), &left.type_name(), &right.type_name())
}

fn order(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
        _ if left.is_number() && right.is_number() => numeric::compare(left, right),
        _ => None,
    }
}

/// Structural equality where numbers compare by value across kinds.
pub fn values_equal(left: &Value, right: &Value) -> bool {
    if left.is_number() && right.is_number() {
        return numeric::compare(left, right) == Some(Ordering::Equal);
    }
    match (left, right) {
        (Value::List(a), Value::List(b)) => seq_equal(&a.borrow(), &b.borrow()),
        (Value::Array(a), Value::Array(b)) => seq_equal(&a.items.borrow(), &b.items.borrow()),
        (Value::Tuple(a), Value::Tuple(b)) => seq_equal(a, b),
        (Value::Map(a), Value::Map(b)) => {
            let (a, b) = (a.borrow(), b.borrow());
            a.len() == b.len()
                && a
                    .iter()
                    .zip(b.iter())
                    .all(|((ka, va), (kb, vb))| ka == kb && values_equal(va, vb))
        }
        _ => left == right,
    }
}

fn seq_equal(a: &[Value], b: &[Value]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| values_equal(x, y))
}

/// Evaluate a non-stepping unary operator.
pub fn evaluate_unary(op: UnaryOp, operand: &Value) -> EvalResult {
    match op {
        UnaryOp::Neg => numeric::negate(operand),
        UnaryOp::Plus => numeric::promote(operand),
        UnaryOp::Not => Ok(Value::Bool(!operand.is_truthy())),
        UnaryOp::Increment | UnaryOp::Decrement => {
            Err(invalid_operand(op.as_symbol(), &operand.type_name()))
        }
    }
}

#[cfg(test)]
mod tests;
