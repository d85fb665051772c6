//! Numeric kinds, the conversion matrix and arithmetic.
//!
//! Every numeric value has a [`NumericKind`]. Conversions between kinds are
//! classified by a fixed 12x12 matrix ([`NumericKind::conversion_to`]):
//! identical, safe widening, unsafe narrowing (accepted only when the value
//! survives the round trip) or impossible. Binary arithmetic runs in the
//! least kind both operands widen to, never below `int`.

use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use num_bigint::BigInt;
use num_traits::{FromPrimitive, ToPrimitive, Zero};
use rust_decimal::Decimal;
use weft_ir::BinaryOp;

use crate::errors::{
    division_by_zero, integer_overflow, invalid_operand, invalid_operands, narrowing_conversion,
    EvalError, EvalResult,
};
use crate::Value;

/// Ordered numeric kinds. The order is the widening order used for
/// difficulty scoring.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NumericKind {
    Boolean,
    Character,
    Byte,
    Short,
    Int,
    Long,
    BigInteger,
    Float,
    Double,
    BigDecimal,
    /// Any number.
    Number,
    /// Any value.
    Object,
}

/// Classification of a kind-to-kind conversion.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Conversion {
    Identical,
    Widen,
    Narrow,
    Impossible,
}

use Conversion::{Identical as I, Impossible as X, Narrow as N, Widen as W};

/// Rows are sources, columns targets, both in `NumericKind` order.
#[rustfmt::skip]
const CONVERSIONS: [[Conversion; 12]; 12] = [
    //          bool char byte shrt int  long bigi flt  dbl  bigd num  obj
    /* bool */ [I,   X,   X,   X,   X,   X,   X,   X,   X,   X,   X,   W],
    /* char */ [X,   I,   N,   N,   W,   W,   W,   W,   W,   W,   X,   W],
    /* byte */ [X,   N,   I,   W,   W,   W,   W,   W,   W,   W,   W,   W],
    /* shrt */ [X,   N,   N,   I,   W,   W,   W,   W,   W,   W,   W,   W],
    /* int  */ [X,   N,   N,   N,   I,   W,   W,   W,   W,   W,   W,   W],
    /* long */ [X,   N,   N,   N,   N,   I,   W,   W,   W,   W,   W,   W],
    /* bigi */ [X,   N,   N,   N,   N,   N,   I,   N,   N,   W,   W,   W],
    /* flt  */ [X,   N,   N,   N,   N,   N,   N,   I,   W,   W,   W,   W],
    /* dbl  */ [X,   N,   N,   N,   N,   N,   N,   N,   I,   W,   W,   W],
    /* bigd */ [X,   N,   N,   N,   N,   N,   N,   N,   N,   I,   W,   W],
    /* num  */ [X,   X,   N,   N,   N,   N,   N,   N,   N,   N,   I,   W],
    /* obj  */ [X,   X,   X,   X,   X,   X,   X,   X,   X,   X,   N,   I],
];

impl NumericKind {
    pub const ALL: [NumericKind; 12] = [
        NumericKind::Boolean,
        NumericKind::Character,
        NumericKind::Byte,
        NumericKind::Short,
        NumericKind::Int,
        NumericKind::Long,
        NumericKind::BigInteger,
        NumericKind::Float,
        NumericKind::Double,
        NumericKind::BigDecimal,
        NumericKind::Number,
        NumericKind::Object,
    ];

    #[inline]
    pub fn conversion_to(self, target: NumericKind) -> Conversion {
        CONVERSIONS[self as usize][target as usize]
    }

    /// Widening steps between two kinds, used as a resolver penalty.
    pub fn distance(self, target: NumericKind) -> u32 {
        (target as u32).abs_diff(self as u32)
    }

    /// Kinds whose narrowing is tolerated by the resolver when the value
    /// round-trips exactly.
    pub fn is_arbitrary_precision(self) -> bool {
        matches!(self, NumericKind::BigInteger | NumericKind::BigDecimal)
    }

    pub fn is_integral(self) -> bool {
        matches!(
            self,
            NumericKind::Character
                | NumericKind::Byte
                | NumericKind::Short
                | NumericKind::Int
                | NumericKind::Long
                | NumericKind::BigInteger
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            NumericKind::Boolean => "boolean",
            NumericKind::Character => "char",
            NumericKind::Byte => "byte",
            NumericKind::Short => "short",
            NumericKind::Int => "int",
            NumericKind::Long => "long",
            NumericKind::BigInteger => "BigInteger",
            NumericKind::Float => "float",
            NumericKind::Double => "double",
            NumericKind::BigDecimal => "BigDecimal",
            NumericKind::Number => "Number",
            NumericKind::Object => "object",
        }
    }
}

impl fmt::Display for NumericKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Least kind both sides safely reach, floored at `int`.
///
/// `None` when no concrete numeric kind accepts both (booleans, or a
/// generic kind on either side).
pub fn common_kind(a: NumericKind, b: NumericKind) -> Option<NumericKind> {
    let reaches = |from: NumericKind, to: NumericKind| {
        matches!(from.conversion_to(to), Conversion::Identical | Conversion::Widen)
    };
    let kind = NumericKind::ALL[NumericKind::Character as usize..=NumericKind::BigDecimal as usize]
        .iter()
        .copied()
        .find(|&k| reaches(a, k) && reaches(b, k))?;
    Some(kind.max(NumericKind::Int))
}

// Conversion

fn integral(value: &Value) -> Option<i128> {
    match value {
        Value::Char(c) => Some(i128::from(u32::from(*c))),
        Value::Byte(v) => Some(i128::from(*v)),
        Value::Short(v) => Some(i128::from(*v)),
        Value::Int(v) => Some(i128::from(*v)),
        Value::Long(v) => Some(i128::from(*v)),
        Value::BigInt(v) => v.to_i128(),
        Value::Float(v) => whole_f64(f64::from(*v)),
        Value::Double(v) => whole_f64(*v),
        Value::Decimal(v) if v.fract().is_zero() => v.to_i128(),
        _ => None,
    }
}

fn whole_f64(v: f64) -> Option<i128> {
    if v.is_finite() && v.fract() == 0.0 {
        v.to_i128()
    } else {
        None
    }
}

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Float(v) => Some(f64::from(*v)),
        Value::Double(v) => Some(*v),
        Value::BigInt(v) => v.to_f64(),
        Value::Decimal(v) => v.to_f64(),
        other => integral(other).and_then(|i| i.to_f64()),
    }
}

/// Representation of `value` in `target` without any range checking beyond
/// what the target type itself enforces. `None` when not representable.
fn convert_raw(value: &Value, target: NumericKind) -> Option<Value> {
    match target {
        NumericKind::Boolean => match value {
            Value::Bool(b) => Some(Value::Bool(*b)),
            _ => None,
        },
        NumericKind::Number | NumericKind::Object => Some(value.clone()),
        _ if matches!(value, Value::Bool(_)) => None,
        NumericKind::Character => integral(value)
            .and_then(|i| u32::try_from(i).ok())
            .and_then(char::from_u32)
            .map(Value::Char),
        NumericKind::Byte => integral(value)
            .and_then(|i| i8::try_from(i).ok())
            .map(Value::Byte),
        NumericKind::Short => integral(value)
            .and_then(|i| i16::try_from(i).ok())
            .map(Value::Short),
        NumericKind::Int => integral(value)
            .and_then(|i| i32::try_from(i).ok())
            .map(Value::Int),
        NumericKind::Long => integral(value)
            .and_then(|i| i64::try_from(i).ok())
            .map(Value::Long),
        NumericKind::BigInteger => match value {
            Value::BigInt(v) => Some(Value::BigInt(Rc::clone(v))),
            other => integral(other).map(|i| Value::BigInt(Rc::new(BigInt::from(i)))),
        },
        #[allow(clippy::cast_possible_truncation, reason = "checked by round trip")]
        NumericKind::Float => as_f64(value).map(|v| Value::Float(v as f32)),
        NumericKind::Double => as_f64(value).map(Value::Double),
        NumericKind::BigDecimal => match value {
            Value::Decimal(v) => Some(Value::Decimal(*v)),
            Value::Float(v) => Decimal::from_f32(*v).map(Value::Decimal),
            Value::Double(v) => Decimal::from_f64(*v).map(Value::Decimal),
            other => integral(other)
                .and_then(|i| Decimal::try_from_i128_with_scale(i, 0).ok())
                .map(Value::Decimal),
        },
    }
}

/// Convert `value` to `target`, honouring the conversion matrix.
///
/// Narrowing succeeds only when converting back yields the original value.
pub fn convert(value: &Value, target: NumericKind) -> EvalResult {
    let Some(source) = value.numeric_kind() else {
        return Err(narrowing_conversion(&value.type_name(), target.name(), value));
    };
    let fail = || narrowing_conversion(source.name(), target.name(), value);
    match source.conversion_to(target) {
        Conversion::Identical => Ok(value.clone()),
        Conversion::Widen => convert_raw(value, target).ok_or_else(fail),
        Conversion::Narrow => {
            let narrowed = convert_raw(value, target).ok_or_else(fail)?;
            match convert_raw(&narrowed, source) {
                Some(back) if back == *value => Ok(narrowed),
                _ => Err(fail()),
            }
        }
        Conversion::Impossible => Err(fail()),
    }
}

// Literals

/// Value of a numeric literal.
///
/// Integral text becomes the smallest of int, long and big-integer that
/// holds it. Text with a fraction or exponent becomes a big-decimal, or a
/// double when the decimal range is exceeded.
pub fn parse_literal(text: &str) -> EvalResult {
    let fractional = text.contains(['.', 'e', 'E']);
    if !fractional {
        if let Ok(v) = text.parse::<i32>() {
            return Ok(Value::Int(v));
        }
        if let Ok(v) = text.parse::<i64>() {
            return Ok(Value::Long(v));
        }
        return BigInt::from_str(text)
            .map(|v| Value::BigInt(Rc::new(v)))
            .map_err(|_| EvalError::new(format!("invalid number literal `{text}`")));
    }
    let decimal = if text.contains(['e', 'E']) {
        Decimal::from_scientific(text).ok()
    } else {
        Decimal::from_str(text).ok()
    };
    match decimal {
        Some(d) => Ok(Value::Decimal(d)),
        None => text
            .parse::<f64>()
            .map(Value::Double)
            .map_err(|_| EvalError::new(format!("invalid number literal `{text}`"))),
    }
}

// Arithmetic

fn arith_kind(op: BinaryOp, left: &Value, right: &Value) -> Result<NumericKind, EvalError> {
    let mismatch = || invalid_operands(op.as_symbol(), &left.type_name(), &right.type_name());
    match (left.numeric_kind(), right.numeric_kind()) {
        (Some(a), Some(b)) => common_kind(a, b).ok_or_else(mismatch),
        _ => Err(mismatch()),
    }
}

/// `+ - * / %` on two numbers.
pub fn arithmetic(op: BinaryOp, left: &Value, right: &Value) -> EvalResult {
    let kind = arith_kind(op, left, right)?;
    let l = convert(left, kind)?;
    let r = convert(right, kind)?;
    let symbol = op.as_symbol();
    match (&l, &r) {
        (Value::Int(a), Value::Int(b)) => int_op(op, *a, *b).map(Value::Int),
        (Value::Long(a), Value::Long(b)) => int_op(op, *a, *b).map(Value::Long),
        (Value::BigInt(a), Value::BigInt(b)) => {
            big_op(op, a, b).map(|v| Value::BigInt(Rc::new(v)))
        }
        (Value::Float(a), Value::Float(b)) => Ok(Value::Float(float_op(op, *a, *b))),
        (Value::Double(a), Value::Double(b)) => Ok(Value::Double(float_op(op, *a, *b))),
        (Value::Decimal(a), Value::Decimal(b)) => decimal_op(op, *a, *b).map(Value::Decimal),
        _ => Err(invalid_operands(symbol, &l.type_name(), &r.type_name())),
    }
}

trait CheckedInt: Copy + Zero {
    fn checked(op: BinaryOp, a: Self, b: Self) -> Option<Self>;
}

macro_rules! checked_int {
    ($($t:ty),*) => {$(
        impl CheckedInt for $t {
            fn checked(op: BinaryOp, a: Self, b: Self) -> Option<Self> {
                match op {
                    BinaryOp::Add => a.checked_add(b),
                    BinaryOp::Sub => a.checked_sub(b),
                    BinaryOp::Mul => a.checked_mul(b),
                    BinaryOp::Div => a.checked_div(b),
                    BinaryOp::Rem => a.checked_rem(b),
                    _ => None,
                }
            }
        }
    )*};
}

checked_int!(i32, i64);

fn int_op<T: CheckedInt>(op: BinaryOp, a: T, b: T) -> Result<T, EvalError> {
    if matches!(op, BinaryOp::Div | BinaryOp::Rem) && b.is_zero() {
        return Err(division_by_zero());
    }
    T::checked(op, a, b).ok_or_else(|| integer_overflow(op.as_symbol()))
}

fn big_op(op: BinaryOp, a: &BigInt, b: &BigInt) -> Result<BigInt, EvalError> {
    match op {
        BinaryOp::Add => Ok(a + b),
        BinaryOp::Sub => Ok(a - b),
        BinaryOp::Mul => Ok(a * b),
        BinaryOp::Div | BinaryOp::Rem if b.is_zero() => Err(division_by_zero()),
        BinaryOp::Div => Ok(a / b),
        BinaryOp::Rem => Ok(a % b),
        _ => Err(invalid_operand(op.as_symbol(), "BigInteger")),
    }
}

fn float_op<T>(op: BinaryOp, a: T, b: T) -> T
where
    T: std::ops::Add<Output = T>
        + std::ops::Sub<Output = T>
        + std::ops::Mul<Output = T>
        + std::ops::Div<Output = T>
        + std::ops::Rem<Output = T>,
{
    match op {
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div => a / b,
        BinaryOp::Rem => a % b,
        _ => a + b,
    }
}

fn decimal_op(op: BinaryOp, a: Decimal, b: Decimal) -> Result<Decimal, EvalError> {
    if matches!(op, BinaryOp::Div | BinaryOp::Rem) && b.is_zero() {
        return Err(division_by_zero());
    }
    let result = match op {
        BinaryOp::Add => a.checked_add(b),
        BinaryOp::Sub => a.checked_sub(b),
        BinaryOp::Mul => a.checked_mul(b),
        BinaryOp::Div => a.checked_div(b),
        BinaryOp::Rem => a.checked_rem(b),
        _ => None,
    };
    result.ok_or_else(|| integer_overflow(op.as_symbol()))
}

/// Ordering of two numbers after promotion. `None` for unordered floats or
/// non-numeric operands.
pub fn compare(left: &Value, right: &Value) -> Option<Ordering> {
    let kind = common_kind(left.numeric_kind()?, right.numeric_kind()?)?;
    let l = convert(left, kind).ok()?;
    let r = convert(right, kind).ok()?;
    match (&l, &r) {
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::Long(a), Value::Long(b)) => Some(a.cmp(b)),
        (Value::BigInt(a), Value::BigInt(b)) => Some(a.cmp(b)),
        (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
        (Value::Double(a), Value::Double(b)) => a.partial_cmp(b),
        (Value::Decimal(a), Value::Decimal(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

/// Unary `+`: promote to at least `int`.
pub fn promote(value: &Value) -> EvalResult {
    match value.numeric_kind() {
        Some(kind) if kind != NumericKind::Boolean => convert(value, kind.max(NumericKind::Int)),
        _ => Err(invalid_operand("+", &value.type_name())),
    }
}

/// Unary `-`.
pub fn negate(value: &Value) -> EvalResult {
    let promoted = match value.numeric_kind() {
        Some(NumericKind::Boolean) | None => {
            return Err(invalid_operand("-", &value.type_name()))
        }
        Some(_) => promote(value)?,
    };
    match promoted {
        Value::Int(v) => v.checked_neg().map(Value::Int),
        Value::Long(v) => v.checked_neg().map(Value::Long),
        Value::BigInt(v) => Some(Value::BigInt(Rc::new(-v.as_ref()))),
        Value::Float(v) => Some(Value::Float(-v)),
        Value::Double(v) => Some(Value::Double(-v)),
        Value::Decimal(v) => Some(Value::Decimal(-v)),
        _ => None,
    }
    .ok_or_else(|| integer_overflow("-"))
}

/// `++` / `--`: add `delta` and convert back to the operand's own kind.
///
/// Integral kinds step in the next wider kind, so overflowing the original
/// kind surfaces as a narrowing failure rather than wrapping.
pub fn step(value: &Value, delta: i8) -> EvalResult {
    let symbol = if delta > 0 { "++" } else { "--" };
    let Some(kind) = value.numeric_kind().filter(|k| *k != NumericKind::Boolean) else {
        return Err(invalid_operand(symbol, &value.type_name()));
    };
    let work = match kind {
        NumericKind::Character | NumericKind::Byte | NumericKind::Short => NumericKind::Int,
        NumericKind::Int => NumericKind::Long,
        NumericKind::Long => NumericKind::BigInteger,
        other => other,
    };
    let widened = convert(value, work)?;
    let one = convert(&Value::Int(i32::from(delta)), work)?;
    let stepped = arithmetic(BinaryOp::Add, &widened, &one)?;
    convert(&stepped, kind)
}

#[cfg(test)]
mod tests;
