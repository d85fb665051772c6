//! Tree-walking evaluator.
//!
//! One [`Interpreter`] runs one evaluation. It owns the execution context:
//! the current scope pointer, swapped and restored around calls by
//! [`ScopedInterpreter`](scope_guard::ScopedInterpreter), and the call stack
//! used for depth limits and backtraces. Everything shared between
//! evaluations (globals, host types, extensions, the resolver cache) lives
//! in the [`Engine`].
//!
//! Submodules:
//! - `assign`: assignment targets, destructuring, `++`/`--`
//! - `function_call`: calling closures, builtins and bound methods
//! - `method_dispatch`: member reads and writes, host operation calls

mod assign;
mod function_call;
mod method_dispatch;
mod scope_guard;

pub use scope_guard::ScopedInterpreter;

use std::fmt::Write;
use std::rc::Rc;
use std::sync::Arc;

use weft_ir::{BinaryOp, Expr, ExprKind, FunctionLiteral, InterpolationPart, Name};
use weft_stack::ensure_sufficient_stack;

use crate::diagnostics::CallStack;
use crate::errors::{constant_without_value, undefined_binding, EvalError, EvalResult};
use crate::operators::{evaluate_binary, evaluate_unary};
use crate::print_handler::SharedPrintHandler;
use crate::scope::{Cell, Lookup, ScopeRef};
use crate::{numeric, Engine, FunctionValue, Value};

/// Execution context of a single evaluation.
pub struct Interpreter<'e> {
    engine: &'e Engine,
    scope: ScopeRef,
    call_stack: CallStack,
}

impl<'e> Interpreter<'e> {
    /// An interpreter whose current scope is `scope`.
    pub fn new(engine: &'e Engine, scope: ScopeRef) -> Self {
        Interpreter {
            engine,
            scope,
            call_stack: CallStack::new(engine.limits().max_call_depth),
        }
    }

    pub fn engine(&self) -> &'e Engine {
        self.engine
    }

    /// The scope new code would run in.
    pub fn scope(&self) -> &ScopeRef {
        &self.scope
    }

    pub fn print_handler(&self) -> &SharedPrintHandler {
        self.engine.print_handler()
    }

    /// Live script call depth.
    pub fn depth(&self) -> usize {
        self.call_stack.depth()
    }

    /// Evaluate `expr` in the current scope.
    ///
    /// Errors without a location get the span of the innermost expression
    /// that produced them.
    pub fn eval(&mut self, expr: &Expr) -> EvalResult {
        ensure_sufficient_stack(|| self.eval_inner(expr))
            .map_err(|err| err.with_span_if_missing(expr.span))
    }

    fn eval_inner(&mut self, expr: &Expr) -> EvalResult {
        match &expr.kind {
            ExprKind::Ident(name) => self.lookup(name),
            ExprKind::Number(text) => numeric::parse_literal(text),
            ExprKind::Bool(b) => Ok(Value::Bool(*b)),
            ExprKind::Null => Ok(Value::Null),
            ExprKind::Str(s) => Ok(Value::text(s)),
            ExprKind::Interpolated(parts) => self.eval_interpolated(parts),
            ExprKind::Tuple(items) => {
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    values.push(self.eval(item)?);
                }
                Ok(Value::collect(values))
            }
            ExprKind::Paren(inner) => self.eval(inner),
            ExprKind::Block(sections) => {
                let mut last = Value::Void;
                for section in sections {
                    last = self.eval(section)?;
                }
                Ok(last)
            }
            ExprKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                if self.eval(cond)?.is_truthy() {
                    self.eval(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.eval(else_branch)
                } else {
                    Ok(Value::Null)
                }
            }
            ExprKind::While { cond, body } => {
                let mut last = Value::Null;
                while self.eval(cond)?.is_truthy() {
                    last = self.eval(body)?;
                }
                Ok(last)
            }
            ExprKind::Function(literal) => Ok(self.make_closure(literal)),
            ExprKind::Define { kind, names } => {
                if *kind == weft_ir::DefineKind::Constant {
                    let first = names.first().map_or("", Name::as_str);
                    return Err(constant_without_value(first));
                }
                for name in names {
                    self.scope.define(name, Cell::Undefined)?;
                }
                Ok(Value::Void)
            }
            ExprKind::Binary { op, left, right } => self.eval_binary(*op, left, right),
            ExprKind::Unary {
                op,
                fixity,
                operand,
            } => {
                if op.is_step() {
                    self.eval_step(*op, *fixity, operand)
                } else {
                    let value = self.eval(operand)?;
                    evaluate_unary(*op, &value)
                }
            }
            ExprKind::Member { target, name } => {
                let receiver = self.eval(target)?;
                self.get_member(&receiver, name)
            }
            ExprKind::Call { target, args } => self.eval_call(target, args, expr.span),
        }
    }

    /// Read `name`: the scope chain first, then the engine's globals.
    fn lookup(&self, name: &Name) -> EvalResult {
        match self.scope.lookup(name)? {
            Lookup::Found(value) => Ok(value),
            Lookup::Undefined => Err(undefined_binding(name)),
            Lookup::Missing => self
                .engine
                .global(name)
                .ok_or_else(|| undefined_binding(name)),
        }
    }

    fn eval_interpolated(&mut self, parts: &[InterpolationPart]) -> EvalResult {
        let mut out = String::new();
        for part in parts {
            match part {
                InterpolationPart::Text(text) => out.push_str(text),
                InterpolationPart::Expr(expr) => {
                    let value = self.eval(expr)?;
                    let _ = write!(out, "{value}");
                }
            }
        }
        Ok(Value::text(out))
    }

    fn make_closure(&self, literal: &Arc<FunctionLiteral>) -> Value {
        Value::Function(Rc::new(FunctionValue {
            literal: Arc::clone(literal),
            captured: self.scope.clone(),
        }))
    }

    fn eval_binary(&mut self, op: BinaryOp, left: &Expr, right: &Expr) -> EvalResult {
        match op {
            BinaryOp::Assign => {
                let value = self.eval(right)?;
                self.assign_to(left, value.clone())?;
                Ok(value)
            }
            BinaryOp::And => {
                if !self.eval(left)?.is_truthy() {
                    return Ok(Value::Bool(false));
                }
                Ok(Value::Bool(self.eval(right)?.is_truthy()))
            }
            BinaryOp::Or => {
                if self.eval(left)?.is_truthy() {
                    return Ok(Value::Bool(true));
                }
                Ok(Value::Bool(self.eval(right)?.is_truthy()))
            }
            _ => {
                let l = self.eval(left)?;
                let r = self.eval(right)?;
                evaluate_binary(op, &l, &r)
            }
        }
    }

    fn attach_backtrace(&self, err: EvalError) -> EvalError {
        self.call_stack.attach_backtrace(err)
    }
}

#[cfg(test)]
mod tests;
