//! Member access and host operation dispatch.
//!
//! `receiver.name` reads a map entry or host property when there is one,
//! and otherwise yields a bound method. Calls go through the engine's
//! resolver, which picks among the receiver type's declared operations and
//! the registered extensions.

use std::rc::Rc;

use weft_ir::{Name, Span};

use super::Interpreter;
use crate::errors::{no_such_member, EvalError, EvalResult};
use crate::interop::HostCall;
use crate::{BoundMethod, Value};

impl Interpreter<'_> {
    pub(super) fn get_member(&self, receiver: &Value, name: &Name) -> EvalResult {
        match receiver {
            Value::Map(entries) => {
                if let Some(value) = entries.borrow().get(name.as_str()) {
                    return Ok(value.clone());
                }
                if self.has_operation(receiver, name) {
                    Ok(bind(receiver, name))
                } else {
                    Ok(Value::Null)
                }
            }
            Value::Host(object) => {
                if let Some(property) = object.info().property(name) {
                    return property.get(object);
                }
                if self.has_operation(receiver, name) {
                    Ok(bind(receiver, name))
                } else {
                    Err(no_such_member(&receiver.type_name(), name))
                }
            }
            _ if self.has_operation(receiver, name) => Ok(bind(receiver, name)),
            _ => Err(no_such_member(&receiver.type_name(), name)),
        }
    }

    pub(super) fn set_member(
        &mut self,
        receiver: &Value,
        name: &Name,
        value: Value,
    ) -> Result<(), EvalError> {
        match receiver {
            Value::Map(entries) => {
                entries.borrow_mut().insert(name.clone(), value);
                Ok(())
            }
            Value::Host(object) => match object.info().property(name) {
                Some(property) => property.set(object, value),
                None => Err(no_such_member(&receiver.type_name(), name)),
            },
            other => Err(no_such_member(&other.type_name(), name)),
        }
    }

    /// `receiver.name(args)`. Map entries and host properties holding
    /// callables are called directly; anything else is an operation call.
    pub(super) fn call_member(
        &mut self,
        receiver: &Value,
        name: &Name,
        args: Vec<Value>,
        span: Span,
    ) -> EvalResult {
        let stored = match receiver {
            Value::Map(entries) => entries.borrow().get(name.as_str()).cloned(),
            Value::Host(object) if !self.has_operation(receiver, name) => object
                .info()
                .property(name)
                .map(|property| property.get(object))
                .transpose()?,
            _ => None,
        };
        match stored {
            Some(callee) if callee.is_callable() => self.call_named(&callee, args, span, Some(name)),
            _ => self.call_method(receiver, name, args, span),
        }
    }

    /// Resolve and invoke a host or extension operation. A [`Value::Type`]
    /// receiver selects static operations.
    #[tracing::instrument(level = "trace", skip_all, fields(operation = %name))]
    pub(super) fn call_method(
        &mut self,
        receiver: &Value,
        name: &Name,
        args: Vec<Value>,
        span: Span,
    ) -> EvalResult {
        let engine = self.engine;
        let is_static = matches!(receiver, Value::Type(_));
        let resolution = engine.resolver().resolve(
            engine.types(),
            engine.extensions(),
            receiver,
            name,
            is_static,
            &args,
        )?;
        let args = resolution.bind_args(args)?;
        let receiver = (!is_static).then(|| receiver.clone());
        let mut call = HostCall::new(self, receiver, args, span);
        resolution.operation.invoke(&mut call)
    }

    fn has_operation(&self, receiver: &Value, name: &str) -> bool {
        let engine = self.engine;
        engine.resolver().has_operation(
            engine.types(),
            engine.extensions(),
            receiver,
            name,
            matches!(receiver, Value::Type(_)),
        )
    }
}

fn bind(receiver: &Value, name: &Name) -> Value {
    Value::Method(Rc::new(BoundMethod {
        receiver: receiver.clone(),
        name: name.clone(),
    }))
}
