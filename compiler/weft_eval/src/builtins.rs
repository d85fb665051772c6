//! Global functions every engine provides.

use weft_ir::{Name, Span};

use crate::errors::{arity_mismatch, host_error, user_throw, EvalError, EvalResult};
use crate::interop::ParamType;
use crate::{Builtin, Interpreter, Value};

pub(crate) const BUILTINS: &[Builtin] = &[
    Builtin { name: "print", func: print },
    Builtin { name: "println", func: println },
    Builtin { name: "throw", func: throw },
    Builtin { name: "eval", func: eval },
    Builtin { name: "list", func: list },
    Builtin { name: "map", func: map },
    Builtin { name: "array", func: array },
    Builtin { name: "typeOf", func: type_of },
];

/// Display forms separated by single spaces.
fn joined(args: &[Value]) -> String {
    args.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

fn single(args: Vec<Value>) -> Result<Value, EvalError> {
    let got = args.len();
    let mut args = args.into_iter();
    match (args.next(), args.next()) {
        (Some(value), None) => Ok(value),
        _ => Err(arity_mismatch(1, got)),
    }
}

fn print(interp: &mut Interpreter<'_>, args: Vec<Value>, _span: Span) -> EvalResult {
    interp.print_handler().print(&joined(&args));
    Ok(Value::Void)
}

fn println(interp: &mut Interpreter<'_>, args: Vec<Value>, _span: Span) -> EvalResult {
    interp.print_handler().println(&joined(&args));
    Ok(Value::Void)
}

/// `throw(value)`; `throw()` throws `null`.
fn throw(_interp: &mut Interpreter<'_>, args: Vec<Value>, _span: Span) -> EvalResult {
    let value = if args.is_empty() {
        Value::Null
    } else {
        single(args)?
    };
    Err(user_throw(value))
}

/// Compile `text` and run it in the caller's scope.
fn eval(interp: &mut Interpreter<'_>, args: Vec<Value>, span: Span) -> EvalResult {
    let source = single(args)?;
    let Some(text) = source.as_str() else {
        return Err(host_error(format!(
            "eval expects text, found {}",
            source.type_name()
        )));
    };
    let body = weft_parse::parse(text).map_err(|err| EvalError::new(format!("eval: {err}")))?;
    // Spans inside `body` index `text`, not the calling script.
    interp.eval(&body).map_err(|err| err.with_span(span))
}

fn list(_interp: &mut Interpreter<'_>, args: Vec<Value>, _span: Span) -> EvalResult {
    Ok(Value::list(args))
}

/// `map(k1, v1, k2, v2, ...)`; keys are stored by their display form.
fn map(_interp: &mut Interpreter<'_>, args: Vec<Value>, _span: Span) -> EvalResult {
    if args.len() % 2 != 0 {
        return Err(host_error(format!(
            "map expects key/value pairs, found {} arguments",
            args.len()
        )));
    }
    let mut entries = Vec::with_capacity(args.len() / 2);
    let mut args = args.into_iter();
    while let (Some(key), Some(value)) = (args.next(), args.next()) {
        entries.push((Name::from(key.to_string()), value));
    }
    Ok(Value::map(entries))
}

fn array(_interp: &mut Interpreter<'_>, args: Vec<Value>, _span: Span) -> EvalResult {
    Ok(Value::array(ParamType::OBJECT, args))
}

fn type_of(_interp: &mut Interpreter<'_>, args: Vec<Value>, _span: Span) -> EvalResult {
    Ok(Value::text(single(args)?.type_name()))
}
