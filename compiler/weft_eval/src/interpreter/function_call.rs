//! Calls to closures, builtins and bound methods.

use std::rc::Rc;

use weft_ir::{Expr, ExprKind, Name, Span};

use super::Interpreter;
use crate::diagnostics::CallFrame;
use crate::errors::{arity_mismatch, not_callable, EvalError, EvalResult};
use crate::scope::ScopeRef;
use crate::{FunctionValue, Value};

const ANONYMOUS: &str = "<fun>";

impl Interpreter<'_> {
    pub(super) fn eval_call(&mut self, target: &Expr, args: &[Expr], span: Span) -> EvalResult {
        if let ExprKind::Member {
            target: object,
            name,
        } = &target.kind
        {
            let receiver = self.eval(object)?;
            let args = self.eval_args(args)?;
            return self.call_member(&receiver, name, args, span);
        }
        let callee = self.eval(target)?;
        let args = self.eval_args(args)?;
        self.call_named(&callee, args, span, target.as_ident())
    }

    /// Evaluate call arguments left to right. Arguments producing no value
    /// are dropped.
    fn eval_args(&mut self, args: &[Expr]) -> Result<Vec<Value>, EvalError> {
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            let value = self.eval(arg)?;
            if !matches!(value, Value::Void) {
                values.push(value);
            }
        }
        Ok(values)
    }

    /// Call any callable value: closure, builtin, bound method or host type
    /// (its constructor).
    pub fn call_value(&mut self, callee: &Value, args: Vec<Value>, span: Span) -> EvalResult {
        self.call_named(callee, args, span, None)
    }

    pub(super) fn call_named(
        &mut self,
        callee: &Value,
        args: Vec<Value>,
        span: Span,
        name: Option<&Name>,
    ) -> EvalResult {
        match callee {
            Value::Function(func) => self.call_function(func, args, span, name),
            Value::Builtin(builtin) => (builtin.func)(self, args, span),
            Value::Method(method) => self.call_method(&method.receiver, &method.name, args, span),
            Value::Type(_) => self.call_method(callee, &Name::new("new"), args, span),
            other => Err(not_callable(&other.type_name())),
        }
    }

    /// Run a closure body.
    ///
    /// `fun{...}` bodies get a fresh local scope over the captured one.
    /// `fun(...)` and `->` bodies get a parameter overlay, so definitions
    /// they make land in the captured scope.
    #[tracing::instrument(level = "trace", skip_all, fields(arity = func.arity()))]
    fn call_function(
        &mut self,
        func: &Rc<FunctionValue>,
        args: Vec<Value>,
        span: Span,
        name: Option<&Name>,
    ) -> EvalResult {
        let literal = &func.literal;
        if args.len() != literal.params.len() {
            return Err(arity_mismatch(literal.params.len(), args.len()));
        }
        let scope = if literal.style.has_own_context() {
            ScopeRef::local(&func.captured)
        } else {
            ScopeRef::overlay(&func.captured)
        };
        for (param, arg) in literal.params.iter().zip(args) {
            scope.bind_param(param, arg);
        }

        self.call_stack.push(CallFrame {
            name: name.cloned().unwrap_or_else(|| Name::new(ANONYMOUS)),
            call_span: Some(span),
        })?;
        let result = self
            .with_scope(scope, |scoped| scoped.eval(&literal.body))
            .map_err(|err| self.attach_backtrace(err));
        self.call_stack.pop();
        result
    }
}
