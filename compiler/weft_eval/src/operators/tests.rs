use pretty_assertions::assert_eq;
use weft_ir::{BinaryOp, UnaryOp};

use super::*;
use crate::errors::EvalErrorKind;

fn binary(op: BinaryOp, left: impl Into<Value>, right: impl Into<Value>) -> Value {
    match evaluate_binary(op, &left.into(), &right.into()) {
        Ok(v) => v,
        Err(e) => panic!("unexpected error: {e}"),
    }
}

#[test]
fn plus_with_text_concatenates_display_forms() {
    assert_eq!(binary(BinaryOp::Add, "a", 1), Value::text("a1"));
    assert_eq!(binary(BinaryOp::Add, 2, "b"), Value::text("2b"));
    assert_eq!(binary(BinaryOp::Add, Value::Null, "!"), Value::text("null!"));
}

#[test]
fn relational_on_numbers_and_text() {
    assert_eq!(binary(BinaryOp::Lt, 1, 2.5), Value::Bool(true));
    assert_eq!(binary(BinaryOp::GtEq, 3_i64, 3), Value::Bool(true));
    assert_eq!(binary(BinaryOp::Gt, "b", "a"), Value::Bool(true));
    assert_eq!(binary(BinaryOp::LtEq, "b", "a"), Value::Bool(false));
}

#[test]
fn relational_on_mixed_types_is_an_error() {
    let err = evaluate_binary(BinaryOp::Lt, &Value::text("a"), &Value::Int(1));
    assert!(matches!(
        err.map_err(|e| e.kind),
        Err(EvalErrorKind::InvalidOperands { .. })
    ));
}

#[test]
fn equality_promotes_numbers() {
    assert_eq!(binary(BinaryOp::Eq, 1, 1_i64), Value::Bool(true));
    assert_eq!(binary(BinaryOp::Eq, 2, 2.0), Value::Bool(true));
    assert_eq!(binary(BinaryOp::NotEq, 2, 3), Value::Bool(true));
    assert!(!values_equal(&Value::Int(1), &Value::text("1")));
}

#[test]
fn equality_is_structural_for_aggregates() {
    let a = Value::list(vec![Value::Int(1), Value::text("x")]);
    let b = Value::list(vec![Value::Long(1), Value::text("x")]);
    assert!(values_equal(&a, &b));
    let m1 = Value::map([("k", Value::Int(1))]);
    let m2 = Value::map([("k", Value::Double(1.0))]);
    assert!(values_equal(&m1, &m2));
    let m3 = Value::map([("j", Value::Int(1))]);
    assert!(!values_equal(&m1, &m3));
}

#[test]
fn arithmetic_on_non_numbers_is_rejected() {
    let err = evaluate_binary(BinaryOp::Mul, &Value::text("a"), &Value::Int(2));
    assert!(matches!(
        err.map_err(|e| e.kind),
        Err(EvalErrorKind::InvalidOperands { .. })
    ));
}

#[test]
fn unary_operators() {
    assert_eq!(
        evaluate_unary(UnaryOp::Neg, &Value::Int(3)).ok(),
        Some(Value::Int(-3))
    );
    assert_eq!(
        evaluate_unary(UnaryOp::Plus, &Value::Byte(3)).ok(),
        Some(Value::Int(3))
    );
    assert_eq!(
        evaluate_unary(UnaryOp::Not, &Value::text("")).ok(),
        Some(Value::Bool(true))
    );
    assert_eq!(
        evaluate_unary(UnaryOp::Not, &Value::Int(0)).ok(),
        Some(Value::Bool(false))
    );
    assert!(evaluate_unary(UnaryOp::Neg, &Value::text("x")).is_err());
}
