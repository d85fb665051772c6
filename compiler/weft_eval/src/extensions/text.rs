//! `text` extensions. Positions count characters, not bytes.

use std::rc::Rc;

use super::{index_arg, ExtensionRegistry};
use crate::errors::{host_error, EvalError};
use crate::interop::{HostCall, HostOperation, ParamType};
use crate::Value;

fn text(call: &HostCall<'_, '_>) -> Result<Rc<str>, EvalError> {
    match call.receiver() {
        Some(Value::Str(s)) => Ok(Rc::clone(s)),
        _ => Err(host_error("expected a text receiver")),
    }
}

fn char_slice(s: &str, start: usize, end: usize) -> Result<String, EvalError> {
    let len = s.chars().count();
    if start > end || end > len {
        return Err(host_error(format!(
            "range {start}..{end} out of bounds for length {len}"
        )));
    }
    Ok(s.chars().skip(start).take(end - start).collect())
}

pub(super) fn register(registry: &mut ExtensionRegistry) {
    registry.add("text", "length", vec![], |call| {
        let len = text(call)?.chars().count();
        Ok(Value::Int(i32::try_from(len).unwrap_or(i32::MAX)))
    });
    registry.add("text", "upper", vec![], |call| {
        Ok(Value::text(text(call)?.to_uppercase()))
    });
    registry.add("text", "lower", vec![], |call| {
        Ok(Value::text(text(call)?.to_lowercase()))
    });
    registry.add("text", "trim", vec![], |call| Ok(Value::text(text(call)?.trim())));
    registry.add("text", "substring", vec![ParamType::INT], |call| {
        let s = text(call)?;
        let start = index_arg(call, 0)?;
        char_slice(&s, start, s.chars().count()).map(Value::from)
    });
    registry.add(
        "text",
        "substring",
        vec![ParamType::INT, ParamType::INT],
        |call| {
            let s = text(call)?;
            let start = index_arg(call, 0)?;
            let end = index_arg(call, 1)?;
            char_slice(&s, start, end).map(Value::from)
        },
    );
    registry.add("text", "startsWith", vec![ParamType::Text], |call| {
        let prefix = call.text_arg(0)?;
        Ok(Value::Bool(text(call)?.starts_with(prefix)))
    });
    registry.add("text", "endsWith", vec![ParamType::Text], |call| {
        let suffix = call.text_arg(0)?;
        Ok(Value::Bool(text(call)?.ends_with(suffix)))
    });
    registry.add("text", "contains", vec![ParamType::Text], |call| {
        let needle = call.text_arg(0)?;
        Ok(Value::Bool(text(call)?.contains(needle)))
    });
    registry.add(
        "text",
        "replace",
        vec![ParamType::Text, ParamType::Text],
        |call| {
            let from = call.text_arg(0)?;
            let to = call.text_arg(1)?;
            Ok(Value::text(text(call)?.replace(from, to)))
        },
    );
    registry.add("text", "split", vec![ParamType::Text], |call| {
        let separator = call.text_arg(0)?;
        let s = text(call)?;
        let parts = if separator.is_empty() {
            s.chars().map(|c| Value::text(c.to_string())).collect()
        } else {
            s.split(separator).map(Value::text).collect()
        };
        Ok(Value::list(parts))
    });
    registry.register(
        HostOperation::new(
            "text",
            "concat",
            vec![ParamType::array(ParamType::Text)],
            |call| {
                let mut out = text(call)?.to_string();
                for part in call.array_arg(0)? {
                    out.push_str(&part.to_string());
                }
                Ok(Value::text(out))
            },
        )
        .variadic(),
    );
}
