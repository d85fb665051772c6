//! Evaluation errors and their constructors.
//!
//! Every runtime failure is an [`EvalError`] carrying a structured
//! [`EvalErrorKind`]. Constructors live here so messages are produced in one
//! place. A script-level `throw` is an error of kind
//! [`EvalErrorKind::UserThrow`] with the thrown value kept on
//! [`EvalError::thrown_value`], so hosts can tell it apart from interpreter
//! failures.

use std::fmt;

use weft_ir::Span;

use crate::Value;

pub type EvalResult = Result<Value, EvalError>;

/// Structured error category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EvalErrorKind {
    // Bindings
    UndefinedBinding {
        name: String,
    },
    ConstantReassignment {
        name: String,
    },
    ConstantWithoutValue {
        name: String,
    },

    // Host interop
    NoApplicableOperation {
        type_name: String,
        operation: String,
        arguments: String,
    },
    AmbiguousOperation {
        type_name: String,
        operation: String,
        candidates: Vec<String>,
    },
    NarrowingConversion {
        from: String,
        to: String,
        value: String,
    },
    NoSuchMember {
        type_name: String,
        member: String,
    },
    Host {
        message: String,
    },

    // Calls and tuples
    ArityMismatch {
        expected: usize,
        got: usize,
    },
    TupleArityMismatch {
        expected: usize,
        got: usize,
    },
    NotCallable {
        type_name: String,
    },
    RecursionLimit {
        depth: usize,
    },

    // Operators
    InvalidOperand {
        op: String,
        type_name: String,
    },
    InvalidOperands {
        op: String,
        left: String,
        right: String,
    },
    DivisionByZero,
    IntegerOverflow {
        operation: String,
    },

    /// Raised by the script's `throw`.
    UserThrow,
    Custom {
        message: String,
    },
}

impl fmt::Display for EvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UndefinedBinding { name } => write!(f, "undefined variable `{name}`"),
            Self::ConstantReassignment { name } => {
                write!(f, "cannot reassign constant `{name}`")
            }
            Self::ConstantWithoutValue { name } => {
                write!(f, "constant `{name}` must be given a value")
            }
            Self::NoApplicableOperation {
                type_name,
                operation,
                arguments,
            } => write!(
                f,
                "no applicable `{operation}` on {type_name} for arguments ({arguments})"
            ),
            Self::AmbiguousOperation {
                type_name,
                operation,
                candidates,
            } => write!(
                f,
                "ambiguous call to `{operation}` on {type_name}: candidates {}",
                candidates.join(", ")
            ),
            Self::NarrowingConversion { from, to, value } => {
                write!(f, "cannot narrow {from} value {value} to {to}")
            }
            Self::NoSuchMember { type_name, member } => {
                write!(f, "{type_name} has no member `{member}`")
            }
            Self::Host { message } => write!(f, "host error: {message}"),
            Self::ArityMismatch { expected, got } => {
                let which = if got < expected { "few" } else { "many" };
                write!(f, "too {which} parameters: expected {expected}, got {got}")
            }
            Self::TupleArityMismatch { expected, got } => write!(
                f,
                "cannot destructure {got} value(s) into {expected} target(s)"
            ),
            Self::NotCallable { type_name } => write!(f, "{type_name} is not callable"),
            Self::RecursionLimit { depth } => {
                write!(f, "maximum call depth of {depth} exceeded")
            }
            Self::InvalidOperand { op, type_name } => {
                write!(f, "operator `{op}` cannot be applied to {type_name}")
            }
            Self::InvalidOperands { op, left, right } => {
                write!(f, "operator `{op}` cannot be applied to {left} and {right}")
            }
            Self::DivisionByZero => write!(f, "division by zero"),
            Self::IntegerOverflow { operation } => write!(f, "integer overflow in {operation}"),
            Self::UserThrow => write!(f, "uncaught throw"),
            Self::Custom { message } => f.write_str(message),
        }
    }
}

/// A single frame of an evaluation backtrace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BacktraceFrame {
    pub name: String,
    pub span: Option<Span>,
}

/// Call chain captured where an error crossed a function boundary.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EvalBacktrace {
    frames: Vec<BacktraceFrame>,
}

impl EvalBacktrace {
    pub fn new(frames: Vec<BacktraceFrame>) -> Self {
        EvalBacktrace { frames }
    }

    pub fn frames(&self) -> &[BacktraceFrame] {
        &self.frames
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl fmt::Display for EvalBacktrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, frame) in self.frames.iter().enumerate() {
            write!(f, "  {i}: {}", frame.name)?;
            if let Some(span) = frame.span {
                write!(f, " at {span}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Evaluation error.
#[derive(Clone, Debug)]
pub struct EvalError {
    pub kind: EvalErrorKind,
    pub message: String,
    /// Innermost expression being evaluated when the error arose.
    pub span: Option<Span>,
    pub backtrace: Option<EvalBacktrace>,
    thrown: Option<Value>,
}

impl EvalError {
    /// Error with a free-form message (`Custom` kind).
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        EvalError::from_kind(EvalErrorKind::Custom {
            message: message.clone(),
        })
    }

    fn from_kind(kind: EvalErrorKind) -> Self {
        EvalError {
            message: kind.to_string(),
            kind,
            span: None,
            backtrace: None,
            thrown: None,
        }
    }

    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Attach `span` unless a more precise one is already present.
    #[must_use]
    pub fn with_span_if_missing(mut self, span: Span) -> Self {
        if self.span.is_none() && !span.is_dummy() {
            self.span = Some(span);
        }
        self
    }

    #[must_use]
    pub fn with_backtrace(mut self, backtrace: EvalBacktrace) -> Self {
        if self.backtrace.is_none() && !backtrace.is_empty() {
            self.backtrace = Some(backtrace);
        }
        self
    }

    /// The value passed to `throw`, if this error came from one.
    pub fn thrown_value(&self) -> Option<&Value> {
        self.thrown.as_ref()
    }

    pub fn is_user_throw(&self) -> bool {
        matches!(self.kind, EvalErrorKind::UserThrow)
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for EvalError {}

// Bindings

#[cold]
pub fn undefined_binding(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndefinedBinding {
        name: name.to_string(),
    })
}

#[cold]
pub fn constant_reassignment(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ConstantReassignment {
        name: name.to_string(),
    })
}

#[cold]
pub fn constant_without_value(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ConstantWithoutValue {
        name: name.to_string(),
    })
}

// Host interop

#[cold]
pub fn no_applicable_operation(type_name: &str, operation: &str, arguments: &[String]) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NoApplicableOperation {
        type_name: type_name.to_string(),
        operation: operation.to_string(),
        arguments: arguments.join(", "),
    })
}

#[cold]
pub fn ambiguous_operation(type_name: &str, operation: &str, candidates: Vec<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::AmbiguousOperation {
        type_name: type_name.to_string(),
        operation: operation.to_string(),
        candidates,
    })
}

#[cold]
pub fn narrowing_conversion(from: &str, to: &str, value: &Value) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NarrowingConversion {
        from: from.to_string(),
        to: to.to_string(),
        value: value.to_string(),
    })
}

#[cold]
pub fn no_such_member(type_name: &str, member: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NoSuchMember {
        type_name: type_name.to_string(),
        member: member.to_string(),
    })
}

#[cold]
pub fn host_error(message: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::Host {
        message: message.into(),
    })
}

// Calls and tuples

#[cold]
pub fn arity_mismatch(expected: usize, got: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ArityMismatch { expected, got })
}

#[cold]
pub fn tuple_arity_mismatch(expected: usize, got: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::TupleArityMismatch { expected, got })
}

#[cold]
pub fn not_callable(type_name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotCallable {
        type_name: type_name.to_string(),
    })
}

#[cold]
pub fn recursion_limit_exceeded(depth: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::RecursionLimit { depth })
}

// Operators

#[cold]
pub fn invalid_operand(op: &str, type_name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidOperand {
        op: op.to_string(),
        type_name: type_name.to_string(),
    })
}

#[cold]
pub fn invalid_operands(op: &str, left: &str, right: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidOperands {
        op: op.to_string(),
        left: left.to_string(),
        right: right.to_string(),
    })
}

#[cold]
pub fn division_by_zero() -> EvalError {
    EvalError::from_kind(EvalErrorKind::DivisionByZero)
}

#[cold]
pub fn integer_overflow(operation: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::IntegerOverflow {
        operation: operation.to_string(),
    })
}

// Throw

/// Error raised by the script-level `throw(value)`.
#[cold]
pub fn user_throw(value: Value) -> EvalError {
    let mut err = EvalError::from_kind(EvalErrorKind::UserThrow);
    err.message = format!("uncaught throw: {value}");
    err.thrown = Some(value);
    err
}
