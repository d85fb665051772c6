//! The view a host operation gets of its invocation.

use std::any::Any;

use weft_ir::Span;

use crate::errors::{host_error, EvalError, EvalResult};
use crate::{Interpreter, Value};

/// Arguments of a host call, already converted to the operation's declared
/// parameter types, plus access back into the interpreter for callbacks.
pub struct HostCall<'a, 'e> {
    interp: &'a mut Interpreter<'e>,
    receiver: Option<Value>,
    args: Vec<Value>,
    span: Span,
}

impl<'a, 'e> HostCall<'a, 'e> {
    pub(crate) fn new(
        interp: &'a mut Interpreter<'e>,
        receiver: Option<Value>,
        args: Vec<Value>,
        span: Span,
    ) -> Self {
        HostCall {
            interp,
            receiver,
            args,
            span,
        }
    }

    /// The receiver, or `None` for constructors and static operations.
    pub fn receiver(&self) -> Option<&Value> {
        self.receiver.as_ref()
    }

    /// Host data of the receiver.
    pub fn receiver_as<T: Any>(&self) -> Result<&T, EvalError> {
        match &self.receiver {
            Some(Value::Host(object)) => object.downcast::<T>().ok_or_else(|| {
                host_error(format!(
                    "receiver {} does not hold the expected host data",
                    object.info().name
                ))
            }),
            Some(other) => Err(host_error(format!(
                "expected a host receiver, found {}",
                other.type_name()
            ))),
            None => Err(host_error("operation has no receiver")),
        }
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    pub fn arg(&self, index: usize) -> Result<&Value, EvalError> {
        self.args
            .get(index)
            .ok_or_else(|| host_error(format!("missing argument {index}")))
    }

    pub fn text_arg(&self, index: usize) -> Result<&str, EvalError> {
        let value = self.arg(index)?;
        value.as_str().ok_or_else(|| {
            host_error(format!(
                "argument {index} must be text, found {}",
                value.type_name()
            ))
        })
    }

    pub fn int_arg(&self, index: usize) -> Result<i32, EvalError> {
        match self.arg(index)? {
            Value::Int(v) => Ok(*v),
            other => match crate::numeric::convert(other, crate::NumericKind::Int)? {
                Value::Int(v) => Ok(v),
                _ => Err(host_error(format!("argument {index} must be an int"))),
            },
        }
    }

    /// Items of an array argument, such as collected varargs.
    pub fn array_arg(&self, index: usize) -> Result<Vec<Value>, EvalError> {
        match self.arg(index)? {
            Value::Array(array) => Ok(array.items.borrow().clone()),
            Value::Null => Ok(Vec::new()),
            other => Err(host_error(format!(
                "argument {index} must be an array, found {}",
                other.type_name()
            ))),
        }
    }

    pub fn span(&self) -> Span {
        self.span
    }

    /// Call a script value (closure, builtin or bound method) from host
    /// code.
    pub fn call(&mut self, callee: &Value, args: Vec<Value>) -> EvalResult {
        self.interp.call_value(callee, args, self.span)
    }

    pub fn interpreter(&mut self) -> &mut Interpreter<'e> {
        self.interp
    }
}
