//! `array` extensions.

use std::rc::Rc;

use super::{index_arg, out_of_bounds, ExtensionRegistry};
use crate::errors::{host_error, EvalError};
use crate::interop::{HostCall, ParamType};
use crate::value::ArrayValue;
use crate::Value;

fn array(call: &HostCall<'_, '_>) -> Result<Rc<ArrayValue>, EvalError> {
    match call.receiver() {
        Some(Value::Array(array)) => Ok(Rc::clone(array)),
        _ => Err(host_error("expected an array receiver")),
    }
}

pub(super) fn register(registry: &mut ExtensionRegistry) {
    registry.add("array", "length", vec![], |call| {
        let len = array(call)?.items.borrow().len();
        Ok(Value::Int(i32::try_from(len).unwrap_or(i32::MAX)))
    });
    registry.add("array", "get", vec![ParamType::INT], |call| {
        let array = array(call)?;
        let index = index_arg(call, 0)?;
        let items = array.items.borrow();
        items
            .get(index)
            .cloned()
            .ok_or_else(|| out_of_bounds(index, items.len()))
    });
    registry.add("array", "toList", vec![], |call| {
        let items = array(call)?.items.borrow().clone();
        Ok(Value::list(items))
    });
}
