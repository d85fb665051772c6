//! The embedding entry point.
//!
//! An [`Engine`] owns everything evaluations share: the global bindings,
//! registered host types, extension operations, the overload resolution
//! cache and the print handler. It is `Send + Sync` and cheap to clone, so
//! one engine can serve any number of threads. Scripts compiled by an
//! engine keep it alive.

use std::rc::Rc;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use thiserror::Error;
use weft_ir::{Expr, Name};
use weft_parse::ParseError;

use crate::builtins::BUILTINS;
use crate::errors::{EvalError, EvalResult};
use crate::extensions::ExtensionRegistry;
use crate::interop::{HostCall, HostOperation, HostTypeInfo, HostTypeInfoBuilder, ParamType};
use crate::interop::{Resolver, TypeRegistry};
use crate::print_handler::{stdout_handler, SharedPrintHandler};
use crate::scope::ScopeRef;
use crate::{BoundMethod, Builtin, Interpreter, Value};

/// Type name that owns functions registered with
/// [`EngineBuilder::function`].
const FUNCTIONS: &str = "functions";

/// Resource limits applied to each evaluation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EvalLimits {
    /// Maximum live script call depth; `None` is unlimited.
    pub max_call_depth: Option<usize>,
}

impl EvalLimits {
    /// Limits used on targets that cannot grow their stack.
    pub const WASM_MAX_CALL_DEPTH: usize = 200;

    pub fn unbounded() -> Self {
        EvalLimits {
            max_call_depth: None,
        }
    }

    pub fn bounded(max_call_depth: usize) -> Self {
        EvalLimits {
            max_call_depth: Some(max_call_depth),
        }
    }
}

impl Default for EvalLimits {
    fn default() -> Self {
        if weft_stack::can_grow_stack() {
            EvalLimits::unbounded()
        } else {
            EvalLimits::bounded(Self::WASM_MAX_CALL_DEPTH)
        }
    }
}

/// A global binding. Stored in a thread-safe form and turned into a
/// [`Value`] when a script reads it.
enum Global {
    Builtin(Builtin),
    Type(Arc<HostTypeInfo>),
    /// Static operation of the engine's function table.
    Function(Arc<HostTypeInfo>),
}

struct EngineShared {
    globals: FxHashMap<Name, Global>,
    types: TypeRegistry,
    extensions: ExtensionRegistry,
    resolver: Resolver,
    print: SharedPrintHandler,
    limits: EvalLimits,
}

/// Shared compiler and evaluation context.
#[derive(Clone)]
pub struct Engine(Arc<EngineShared>);

/// Builder for [`Engine`].
pub struct EngineBuilder {
    print: Option<SharedPrintHandler>,
    limits: EvalLimits,
    types: Vec<Arc<HostTypeInfo>>,
    extensions: ExtensionRegistry,
    functions: HostTypeInfoBuilder,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        EngineBuilder::new()
    }
}

impl EngineBuilder {
    /// Stdout printing, default limits and the default extensions.
    pub fn new() -> Self {
        EngineBuilder {
            print: None,
            limits: EvalLimits::default(),
            types: Vec::new(),
            extensions: ExtensionRegistry::with_defaults(),
            functions: HostTypeInfo::builder(FUNCTIONS),
        }
    }

    #[must_use]
    pub fn print_handler(mut self, handler: SharedPrintHandler) -> Self {
        self.print = Some(handler);
        self
    }

    #[must_use]
    pub fn limits(mut self, limits: EvalLimits) -> Self {
        self.limits = limits;
        self
    }

    #[must_use]
    pub fn max_call_depth(mut self, depth: usize) -> Self {
        self.limits.max_call_depth = Some(depth);
        self
    }

    /// Register a host type and bind it globally under its name.
    #[must_use]
    pub fn host_type(mut self, info: &Arc<HostTypeInfo>) -> Self {
        self.types.push(Arc::clone(info));
        self
    }

    /// Replace the extension registry, defaults included.
    #[must_use]
    pub fn extensions(mut self, extensions: ExtensionRegistry) -> Self {
        self.extensions = extensions;
        self
    }

    /// Add one extension operation.
    #[must_use]
    pub fn extension(mut self, op: HostOperation) -> Self {
        self.extensions.register(op);
        self
    }

    /// Bind a global host function. Registering the same name with other
    /// parameter lists adds overloads.
    #[must_use]
    pub fn function<F>(mut self, name: &str, params: Vec<ParamType>, f: F) -> Self
    where
        F: Fn(&mut HostCall<'_, '_>) -> EvalResult + Send + Sync + 'static,
    {
        self.functions = self.functions.static_method(name, params, f);
        self
    }

    /// Global host function whose last parameter collects trailing
    /// arguments.
    #[must_use]
    pub fn variadic_function<F>(mut self, name: &str, params: Vec<ParamType>, f: F) -> Self
    where
        F: Fn(&mut HostCall<'_, '_>) -> EvalResult + Send + Sync + 'static,
    {
        self.functions = self.functions.static_variadic_method(name, params, f);
        self
    }

    pub fn build(self) -> Engine {
        let mut globals = FxHashMap::default();
        for builtin in BUILTINS {
            globals.insert(Name::new(builtin.name), Global::Builtin(*builtin));
        }

        let functions = self.functions.build();
        for op in functions.operations() {
            globals.insert(op.name.clone(), Global::Function(Arc::clone(&functions)));
        }

        let mut types = TypeRegistry::new();
        for info in &self.types {
            types.register(info);
            globals.insert(info.name.clone(), Global::Type(Arc::clone(info)));
        }

        tracing::debug!(
            globals = globals.len(),
            types = types.len(),
            extensions = self.extensions.len(),
            "engine built"
        );
        Engine(Arc::new(EngineShared {
            globals,
            types,
            extensions: self.extensions,
            resolver: Resolver::new(),
            print: self.print.unwrap_or_else(stdout_handler),
            limits: self.limits,
        }))
    }
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new()
    }
}

impl Engine {
    /// An engine with the default configuration.
    pub fn new() -> Self {
        EngineBuilder::new().build()
    }

    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    /// Parse `source` into a reusable script.
    #[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
    pub fn compile(&self, source: &str) -> Result<CompiledScript, ParseError> {
        let body = weft_parse::parse(source)?;
        Ok(CompiledScript {
            engine: self.clone(),
            source: Arc::from(source),
            body: Arc::new(body),
        })
    }

    /// Compile and evaluate in one step.
    pub fn run(&self, source: &str, scope: Option<ScopeRef>) -> Result<Value, ScriptError> {
        Ok(self.compile(source)?.eval(scope)?)
    }

    pub fn types(&self) -> &TypeRegistry {
        &self.0.types
    }

    pub fn extensions(&self) -> &ExtensionRegistry {
        &self.0.extensions
    }

    pub fn resolver(&self) -> &Resolver {
        &self.0.resolver
    }

    pub fn print_handler(&self) -> &SharedPrintHandler {
        &self.0.print
    }

    pub fn limits(&self) -> EvalLimits {
        self.0.limits
    }

    /// Whether a global named `name` exists.
    pub fn has_global(&self, name: &str) -> bool {
        self.0.globals.contains_key(name)
    }

    /// The global bound to `name`, as a script sees it.
    pub fn global(&self, name: &str) -> Option<Value> {
        Some(match self.0.globals.get(name)? {
            Global::Builtin(builtin) => Value::Builtin(*builtin),
            Global::Type(info) => Value::Type(Arc::clone(info)),
            Global::Function(table) => Value::Method(Rc::new(BoundMethod {
                receiver: Value::Type(Arc::clone(table)),
                name: Name::new(name),
            })),
        })
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("globals", &self.0.globals.len())
            .field("types", &self.0.types.len())
            .field("extensions", &self.0.extensions)
            .field("cached_resolutions", &self.0.resolver.cached())
            .field("limits", &self.0.limits)
            .finish()
    }
}

/// A parsed script bound to the engine that compiled it.
///
/// Immutable; evaluate it any number of times, from any thread that holds a
/// clone.
#[derive(Clone)]
pub struct CompiledScript {
    engine: Engine,
    source: Arc<str>,
    body: Arc<Expr>,
}

impl CompiledScript {
    /// Evaluate with `scope` as the current scope, or in a fresh root scope.
    ///
    /// Top-level definitions land in `scope` (or its definition target),
    /// so the caller sees them afterwards.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn eval(&self, scope: Option<ScopeRef>) -> EvalResult {
        let mut interpreter = Interpreter::new(&self.engine, scope.unwrap_or_default());
        interpreter.eval(&self.body)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn body(&self) -> &Expr {
        &self.body
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }
}

impl std::fmt::Debug for CompiledScript {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledScript")
            .field("len", &self.source.len())
            .field("body", &self.body.to_sexpr())
            .finish_non_exhaustive()
    }
}

/// Compile or evaluation failure from [`Engine::run`].
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Eval(#[from] EvalError),
}

impl ScriptError {
    /// The thrown value, for uncaught `throw(...)`.
    pub fn thrown_value(&self) -> Option<&Value> {
        match self {
            ScriptError::Eval(err) => err.thrown_value(),
            ScriptError::Parse(_) => None,
        }
    }
}

#[cfg(test)]
mod tests;
