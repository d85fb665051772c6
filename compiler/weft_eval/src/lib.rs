//! Weft evaluation: an embeddable, dynamically typed expression language.
//!
//! # Architecture
//!
//! - [`Engine`]: globals, host types, extensions and the overload cache;
//!   `Send + Sync`, shared by every evaluation
//! - [`CompiledScript`]: a parsed script, evaluated any number of times
//! - [`Interpreter`]: one evaluation's execution context
//! - [`ScopeRef`]: `Rc` scope chains, including host-supplied [`Bindings`]
//! - [`Value`]: runtime values
//! - [`interop`]: host type descriptions and the overload [`Resolver`]
//! - [`numeric`]: the numeric kind lattice, conversions and arithmetic
//!
//! ```text
//! let engine = Engine::new();
//! let script = engine.compile("a = 1; f = () -> a; a = 2; f()")?;
//! assert_eq!(script.eval(None)?, Value::Int(2));
//! ```

mod builtins;
pub mod diagnostics;
mod engine;
pub mod errors;
pub mod extensions;
pub mod interop;
pub mod interpreter;
pub mod numeric;
mod operators;
mod print_handler;
pub mod scope;
mod value;

pub use engine::{CompiledScript, Engine, EngineBuilder, EvalLimits, ScriptError};
pub use errors::{BacktraceFrame, EvalBacktrace, EvalError, EvalErrorKind, EvalResult};
pub use extensions::ExtensionRegistry;
pub use interop::{
    HostCall, HostObject, HostOperation, HostTypeInfo, HostTypeInfoBuilder, ParamType, Resolver,
    TypeRegistry,
};
pub use interpreter::{Interpreter, ScopedInterpreter};
pub use numeric::NumericKind;
pub use operators::values_equal;
pub use print_handler::{
    buffer_handler, silent_handler, stdout_handler, PrintHandlerImpl, SharedPrintHandler,
};
pub use scope::{Bindings, Cell, HostBindings, Lookup, MapBindings, ScopeRef};
pub use value::{ArrayValue, BoundMethod, Builtin, BuiltinFn, FunctionValue, ListRef, MapRef, Value};

pub use weft_parse::ParseError;
