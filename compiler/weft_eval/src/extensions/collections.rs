//! `object`, `collection` and `map` extensions.

use std::rc::Rc;

use weft_ir::Name;

use super::{index_arg, out_of_bounds, ExtensionRegistry};
use crate::errors::{host_error, EvalError};
use crate::interop::{HostCall, ParamType};
use crate::operators::values_equal;
use crate::value::{ListRef, MapRef};
use crate::Value;

pub(super) fn register(registry: &mut ExtensionRegistry) {
    register_object(registry);
    register_collection(registry);
    register_map(registry);
}

fn receiver(call: &HostCall<'_, '_>) -> Value {
    call.receiver().cloned().unwrap_or(Value::Null)
}

fn list(call: &HostCall<'_, '_>) -> Result<ListRef, EvalError> {
    match call.receiver() {
        Some(Value::List(items)) => Ok(Rc::clone(items)),
        other => Err(host_error(format!(
            "expected a list receiver, found {}",
            other.map_or_else(|| "nothing".to_string(), Value::type_name)
        ))),
    }
}

fn map(call: &HostCall<'_, '_>) -> Result<MapRef, EvalError> {
    match call.receiver() {
        Some(Value::Map(entries)) => Ok(Rc::clone(entries)),
        other => Err(host_error(format!(
            "expected a map receiver, found {}",
            other.map_or_else(|| "nothing".to_string(), Value::type_name)
        ))),
    }
}

fn register_object(registry: &mut ExtensionRegistry) {
    registry.add("object", "toString", vec![], |call| {
        Ok(Value::text(receiver(call).to_string()))
    });
    registry.add("object", "equals", vec![ParamType::OBJECT], |call| {
        let other = call.arg(0)?;
        Ok(Value::Bool(values_equal(&receiver(call), other)))
    });
}

fn register_collection(registry: &mut ExtensionRegistry) {
    registry.add("collection", "size", vec![], |call| {
        let len = list(call)?.borrow().len();
        Ok(Value::Long(i64::try_from(len).unwrap_or(i64::MAX)))
    });
    registry.add("collection", "isEmpty", vec![], |call| {
        Ok(Value::Bool(list(call)?.borrow().is_empty()))
    });
    registry.add("collection", "get", vec![ParamType::INT], |call| {
        let items = list(call)?;
        let index = index_arg(call, 0)?;
        let items = items.borrow();
        items
            .get(index)
            .cloned()
            .ok_or_else(|| out_of_bounds(index, items.len()))
    });
    registry.add("collection", "add", vec![ParamType::OBJECT], |call| {
        let value = call.arg(0)?.clone();
        list(call)?.borrow_mut().push(value);
        Ok(Value::Bool(true))
    });
    registry.add("collection", "contains", vec![ParamType::OBJECT], |call| {
        let needle = call.arg(0)?;
        let found = list(call)?.borrow().iter().any(|v| values_equal(v, needle));
        Ok(Value::Bool(found))
    });
    registry.add("collection", "join", vec![ParamType::Text], |call| {
        let separator = call.text_arg(0)?;
        let joined = list(call)?
            .borrow()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(separator);
        Ok(Value::text(joined))
    });
    registry.add("collection", "each", vec![ParamType::Function], |call| {
        let f = call.arg(0)?.clone();
        let items = list(call)?.borrow().clone();
        for item in items {
            call.call(&f, vec![item])?;
        }
        Ok(Value::Null)
    });
    registry.add("collection", "map", vec![ParamType::Function], |call| {
        let f = call.arg(0)?.clone();
        let items = list(call)?.borrow().clone();
        let mapped = items
            .into_iter()
            .map(|item| call.call(&f, vec![item]))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Value::list(mapped))
    });
    registry.add("collection", "filter", vec![ParamType::Function], |call| {
        let f = call.arg(0)?.clone();
        let items = list(call)?.borrow().clone();
        let mut kept = Vec::new();
        for item in items {
            if call.call(&f, vec![item.clone()])?.is_truthy() {
                kept.push(item);
            }
        }
        Ok(Value::list(kept))
    });
}

fn register_map(registry: &mut ExtensionRegistry) {
    registry.add("map", "size", vec![], |call| {
        let len = map(call)?.borrow().len();
        Ok(Value::Long(i64::try_from(len).unwrap_or(i64::MAX)))
    });
    registry.add("map", "isEmpty", vec![], |call| {
        Ok(Value::Bool(map(call)?.borrow().is_empty()))
    });
    registry.add("map", "get", vec![ParamType::Text], |call| {
        let key = call.text_arg(0)?;
        Ok(map(call)?.borrow().get(key).cloned().unwrap_or(Value::Null))
    });
    registry.add("map", "put", vec![ParamType::Text, ParamType::OBJECT], |call| {
        let key = Name::new(call.text_arg(0)?);
        let value = call.arg(1)?.clone();
        let previous = map(call)?.borrow_mut().insert(key, value);
        Ok(previous.unwrap_or(Value::Null))
    });
    registry.add("map", "containsKey", vec![ParamType::Text], |call| {
        let key = call.text_arg(0)?;
        Ok(Value::Bool(map(call)?.borrow().contains_key(key)))
    });
    registry.add("map", "keys", vec![], |call| {
        let keys = map(call)?.borrow().keys().map(Value::text).collect();
        Ok(Value::list(keys))
    });
    registry.add("map", "values", vec![], |call| {
        let values = map(call)?.borrow().values().cloned().collect();
        Ok(Value::list(values))
    });
}
