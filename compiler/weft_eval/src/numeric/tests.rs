use super::*;
use pretty_assertions::assert_eq;

fn num(text: &str) -> Value {
    match parse_literal(text) {
        Ok(v) => v,
        Err(e) => panic!("bad literal {text:?}: {e}"),
    }
}

fn arith(op: BinaryOp, l: Value, r: Value) -> Value {
    match arithmetic(op, &l, &r) {
        Ok(v) => v,
        Err(e) => panic!("{l:?} {op} {r:?} failed: {e}"),
    }
}

#[test]
fn matrix_diagonal_is_identical() {
    for kind in NumericKind::ALL {
        assert_eq!(kind.conversion_to(kind), Conversion::Identical, "{kind}");
    }
}

#[test]
fn boolean_only_reaches_object() {
    for kind in NumericKind::ALL {
        let expected = match kind {
            NumericKind::Boolean => Conversion::Identical,
            NumericKind::Object => Conversion::Widen,
            _ => Conversion::Impossible,
        };
        assert_eq!(NumericKind::Boolean.conversion_to(kind), expected, "{kind}");
    }
}

#[test]
fn character_widens_to_int_and_beyond() {
    use NumericKind::*;
    for target in [Int, Long, BigInteger, Float, Double, BigDecimal, Object] {
        assert_eq!(Character.conversion_to(target), Conversion::Widen, "{target}");
    }
    assert_eq!(Character.conversion_to(Byte), Conversion::Narrow);
    assert_eq!(Character.conversion_to(Number), Conversion::Impossible);
}

#[test]
fn big_integer_does_not_widen_to_floats() {
    use NumericKind::*;
    assert_eq!(BigInteger.conversion_to(Double), Conversion::Narrow);
    assert_eq!(BigInteger.conversion_to(BigDecimal), Conversion::Widen);
}

#[test]
fn common_kind_floors_at_int() {
    use NumericKind::*;
    assert_eq!(common_kind(Byte, Byte), Some(Int));
    assert_eq!(common_kind(Character, Character), Some(Int));
    assert_eq!(common_kind(Byte, Character), Some(Int));
    assert_eq!(common_kind(Int, Long), Some(Long));
    assert_eq!(common_kind(Long, Double), Some(Double));
    assert_eq!(common_kind(BigInteger, Double), Some(BigDecimal));
    assert_eq!(common_kind(Boolean, Int), None);
}

#[test]
fn byte_and_char_arithmetic_runs_in_int() {
    assert_eq!(arith(BinaryOp::Add, Value::Byte(100), Value::Byte(100)), Value::Int(200));
    assert_eq!(arith(BinaryOp::Add, Value::Char('a'), Value::Char('b')), Value::Int(195));
}

#[test]
fn literals_pick_smallest_kind() {
    assert_eq!(num("7"), Value::Int(7));
    assert_eq!(num("3000000000"), Value::Long(3_000_000_000));
    assert!(matches!(num("99999999999999999999999"), Value::BigInt(_)));
    assert_eq!(num("1.5"), Value::Decimal(Decimal::new(15, 1)));
    assert_eq!(num("2e3"), Value::Decimal(Decimal::from(2000)));
}

#[test]
fn integer_division_and_remainder() {
    assert_eq!(arith(BinaryOp::Div, Value::Int(7), Value::Int(2)), Value::Int(3));
    assert_eq!(arith(BinaryOp::Rem, Value::Int(7), Value::Int(2)), Value::Int(1));
    assert!(matches!(
        arithmetic(BinaryOp::Div, &Value::Int(1), &Value::Int(0)),
        Err(EvalError { kind: crate::EvalErrorKind::DivisionByZero, .. })
    ));
}

#[test]
fn overflow_is_reported() {
    let err = arithmetic(BinaryOp::Add, &Value::Int(i32::MAX), &Value::Int(1));
    assert!(matches!(
        err,
        Err(EvalError { kind: crate::EvalErrorKind::IntegerOverflow { .. }, .. })
    ));
}

#[test]
fn mixed_int_and_decimal() {
    assert_eq!(
        arith(BinaryOp::Add, num("1.5"), Value::Int(1)),
        Value::Decimal(Decimal::new(25, 1))
    );
}

#[test]
fn narrowing_requires_round_trip() {
    let big = Value::BigInt(Rc::new(BigInt::from(5)));
    assert_eq!(convert(&big, NumericKind::Int).ok(), Some(Value::Int(5)));
    let huge = Value::BigInt(Rc::new(BigInt::from(i64::MAX)));
    assert!(convert(&huge, NumericKind::Int).is_err());
    assert!(convert(&Value::Double(0.1), NumericKind::Float).is_err());
    assert_eq!(
        convert(&Value::Double(1.5), NumericKind::Float).ok(),
        Some(Value::Float(1.5))
    );
}

#[test]
fn comparison_promotes() {
    assert_eq!(compare(&Value::Int(1), &Value::Long(1)), Some(Ordering::Equal));
    assert_eq!(compare(&Value::Byte(3), &num("2.5")), Some(Ordering::Greater));
    assert_eq!(compare(&Value::Double(f64::NAN), &Value::Int(1)), None);
}

#[test]
fn step_keeps_kind() {
    assert_eq!(step(&Value::Byte(1), 1).ok(), Some(Value::Byte(2)));
    assert_eq!(step(&Value::Char('a'), 1).ok(), Some(Value::Char('b')));
    assert_eq!(step(&Value::Long(5), -1).ok(), Some(Value::Long(4)));
    assert_eq!(step(&Value::Double(1.5), 1).ok(), Some(Value::Double(2.5)));
}

#[test]
fn step_overflow_is_a_narrowing_failure() {
    let err = step(&Value::Byte(i8::MAX), 1);
    assert!(matches!(
        err,
        Err(EvalError { kind: crate::EvalErrorKind::NarrowingConversion { .. }, .. })
    ));
    let err = step(&Value::Int(i32::MAX), 1);
    assert!(matches!(
        err,
        Err(EvalError { kind: crate::EvalErrorKind::NarrowingConversion { .. }, .. })
    ));
}

#[test]
fn negation_promotes_small_kinds() {
    assert_eq!(negate(&Value::Byte(3)).ok(), Some(Value::Int(-3)));
    assert!(negate(&Value::Bool(true)).is_err());
    assert!(negate(&Value::Int(i32::MIN)).is_err());
}
