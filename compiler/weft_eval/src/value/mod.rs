//! Runtime values.
//!
//! Values are cheap to clone: aggregates and closures sit behind `Rc`, so a
//! script sharing a list between two bindings shares the same storage.
//! `Void` is the "no value" produced by an empty tuple or a block with no
//! sections; it is distinct from `null` and disappears when collected into a
//! tuple.

use std::any::Any;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use num_bigint::BigInt;
use rust_decimal::Decimal;
use weft_ir::{FunctionLiteral, Name, Span};

use crate::interop::{HostObject, HostTypeInfo, ParamType};
use crate::numeric::NumericKind;
use crate::{EvalResult, Interpreter, ScopeRef};

pub type ListRef = Rc<RefCell<Vec<Value>>>;
pub type MapRef = Rc<RefCell<BTreeMap<Name, Value>>>;

/// Signature of a built-in global function.
pub type BuiltinFn = fn(&mut Interpreter<'_>, Vec<Value>, Span) -> EvalResult;

#[derive(Clone)]
pub enum Value {
    Null,
    /// No value.
    Void,
    Bool(bool),
    Char(char),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    BigInt(Rc<BigInt>),
    Float(f32),
    Double(f64),
    Decimal(Decimal),
    Str(Rc<str>),
    List(ListRef),
    Map(MapRef),
    Array(Rc<ArrayValue>),
    Tuple(Rc<[Value]>),
    Function(Rc<FunctionValue>),
    Builtin(Builtin),
    /// A receiver paired with an operation name, produced by member access.
    Method(Rc<BoundMethod>),
    Host(HostObject),
    /// A host type used as a value: constructor and static operations.
    Type(Arc<HostTypeInfo>),
}

/// Closure: a function literal plus the scope it was created in.
pub struct FunctionValue {
    pub literal: Arc<FunctionLiteral>,
    pub captured: ScopeRef,
}

impl FunctionValue {
    pub fn arity(&self) -> usize {
        self.literal.params.len()
    }
}

#[derive(Clone, Copy)]
pub struct Builtin {
    pub name: &'static str,
    pub func: BuiltinFn,
}

pub struct BoundMethod {
    pub receiver: Value,
    pub name: Name,
}

/// Fixed-length typed array, as produced by varargs collection or `array()`.
pub struct ArrayValue {
    pub element: ParamType,
    pub items: RefCell<Vec<Value>>,
}

impl Value {
    pub fn text(s: impl AsRef<str>) -> Value {
        Value::Str(Rc::from(s.as_ref()))
    }

    pub fn list(items: Vec<Value>) -> Value {
        Value::List(Rc::new(RefCell::new(items)))
    }

    pub fn map<K: Into<Name>>(entries: impl IntoIterator<Item = (K, Value)>) -> Value {
        let map = entries.into_iter().map(|(k, v)| (k.into(), v)).collect();
        Value::Map(Rc::new(RefCell::new(map)))
    }

    pub fn array(element: ParamType, items: Vec<Value>) -> Value {
        Value::Array(Rc::new(ArrayValue {
            element,
            items: RefCell::new(items),
        }))
    }

    pub fn host<T: Any>(info: &Arc<HostTypeInfo>, data: T) -> Value {
        Value::Host(HostObject::new(info, data))
    }

    /// Collect tuple elements: `null` and `Void` entries are dropped,
    /// nothing left is `Void` and a single survivor stands for itself.
    pub fn collect(values: Vec<Value>) -> Value {
        let mut kept: Vec<Value> = values
            .into_iter()
            .filter(|v| !matches!(v, Value::Void | Value::Null))
            .collect();
        match kept.len() {
            0 => Value::Void,
            1 => kept.pop().unwrap_or(Value::Void),
            _ => Value::Tuple(Rc::from(kept)),
        }
    }

    /// Elements for destructuring: a tuple's items, nothing for `Void`,
    /// otherwise the value itself.
    pub fn tuple_items(&self) -> Vec<Value> {
        match self {
            Value::Tuple(items) => items.to_vec(),
            Value::Void => Vec::new(),
            other => vec![other.clone()],
        }
    }

    /// Innermost last element of nested tuples.
    pub fn last(&self) -> &Value {
        let mut current = self;
        while let Value::Tuple(items) = current {
            match items.last() {
                Some(last) => current = last,
                None => break,
            }
        }
        current
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null | Value::Void => false,
            Value::Bool(b) => *b,
            Value::Str(s) => !s.is_empty(),
            Value::List(items) => !items.borrow().is_empty(),
            Value::Map(entries) => !entries.borrow().is_empty(),
            Value::Array(array) => !array.items.borrow().is_empty(),
            Value::Tuple(_) => {
                let last = self.last();
                !matches!(last, Value::Tuple(_)) && last.is_truthy()
            }
            _ => true,
        }
    }

    pub fn numeric_kind(&self) -> Option<NumericKind> {
        Some(match self {
            Value::Bool(_) => NumericKind::Boolean,
            Value::Char(_) => NumericKind::Character,
            Value::Byte(_) => NumericKind::Byte,
            Value::Short(_) => NumericKind::Short,
            Value::Int(_) => NumericKind::Int,
            Value::Long(_) => NumericKind::Long,
            Value::BigInt(_) => NumericKind::BigInteger,
            Value::Float(_) => NumericKind::Float,
            Value::Double(_) => NumericKind::Double,
            Value::Decimal(_) => NumericKind::BigDecimal,
            _ => return None,
        })
    }

    pub fn is_number(&self) -> bool {
        self.numeric_kind()
            .is_some_and(|k| k != NumericKind::Boolean)
    }

    pub fn is_callable(&self) -> bool {
        matches!(
            self,
            Value::Function(_) | Value::Builtin(_) | Value::Method(_) | Value::Type(_)
        )
    }

    /// Runtime type, in the vocabulary of declared parameter types.
    pub fn runtime_type(&self) -> ParamType {
        match self {
            Value::Null => ParamType::Null,
            Value::Void => ParamType::Void,
            Value::Str(_) => ParamType::Text,
            Value::List(_) => ParamType::List,
            Value::Map(_) => ParamType::Map,
            Value::Array(array) => ParamType::Array(Box::new(array.element.clone())),
            Value::Tuple(_) => ParamType::Tuple,
            Value::Function(_) | Value::Builtin(_) | Value::Method(_) => ParamType::Function,
            Value::Host(obj) => ParamType::Host(obj.info().name.clone()),
            Value::Type(info) => ParamType::Type(info.name.clone()),
            other => other
                .numeric_kind()
                .map_or(ParamType::Kind(NumericKind::Object), ParamType::Kind),
        }
    }

    pub fn type_name(&self) -> String {
        self.runtime_type().to_string()
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Non-negative integral value usable as an index.
    pub fn as_index(&self) -> Option<usize> {
        match crate::numeric::convert(self, NumericKind::Long) {
            Ok(Value::Long(v)) => usize::try_from(v).ok(),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) | (Value::Void, Value::Void) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Byte(a), Value::Byte(b)) => a == b,
            (Value::Short(a), Value::Short(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Long(a), Value::Long(b)) => a == b,
            (Value::BigInt(a), Value::BigInt(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a == b,
            (Value::Decimal(a), Value::Decimal(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow(),
            (Value::Map(a), Value::Map(b)) => Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow(),
            (Value::Array(a), Value::Array(b)) => {
                Rc::ptr_eq(a, b) || *a.items.borrow() == *b.items.borrow()
            }
            (Value::Tuple(a), Value::Tuple(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Builtin(a), Value::Builtin(b)) => a.name == b.name,
            (Value::Method(a), Value::Method(b)) => a.name == b.name && a.receiver == b.receiver,
            (Value::Host(a), Value::Host(b)) => a.same_object(b),
            (Value::Type(a), Value::Type(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

fn write_seq<'a>(
    f: &mut fmt::Formatter<'_>,
    open: &str,
    items: impl IntoIterator<Item = &'a Value>,
    close: &str,
) -> fmt::Result {
    f.write_str(open)?;
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    f.write_str(close)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Void => Ok(()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Char(c) => write!(f, "{c}"),
            Value::Byte(v) => write!(f, "{v}"),
            Value::Short(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Long(v) => write!(f, "{v}"),
            Value::BigInt(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v:?}"),
            Value::Double(v) => write!(f, "{v:?}"),
            Value::Decimal(v) => write!(f, "{v}"),
            Value::Str(s) => f.write_str(s),
            Value::List(items) => write_seq(f, "[", items.borrow().iter(), "]"),
            Value::Array(array) => write_seq(f, "[", array.items.borrow().iter(), "]"),
            Value::Tuple(items) => write_seq(f, "(", items.iter(), ")"),
            Value::Map(entries) => {
                f.write_str("{")?;
                for (i, (k, v)) in entries.borrow().iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}={v}")?;
                }
                f.write_str("}")
            }
            Value::Function(func) => {
                f.write_str("fun(")?;
                for (i, p) in func.literal.params.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{p}")?;
                }
                f.write_str(")")
            }
            Value::Builtin(b) => write!(f, "<builtin {}>", b.name),
            Value::Method(m) => write!(f, "<method {}.{}>", m.receiver.type_name(), m.name),
            Value::Host(obj) => obj.fmt_display(f),
            Value::Type(info) => write!(f, "{}", info.name),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Void => f.write_str("Void"),
            Value::Str(s) => write!(f, "Str({:?})", &**s),
            _ => write!(f, "{}({self})", self.type_name()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Long(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::text(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(Rc::from(s))
    }
}
