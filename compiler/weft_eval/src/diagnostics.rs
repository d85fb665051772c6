//! Call-stack tracking for runtime diagnostics.
//!
//! Every script function call pushes a [`CallFrame`]; the depth check lives
//! in [`CallStack::push`]. When an error leaves a function, the frames are
//! snapshotted into an [`EvalBacktrace`] on the error.

use weft_ir::{Name, Span};

use crate::errors::{recursion_limit_exceeded, BacktraceFrame, EvalBacktrace, EvalError};

/// One live call.
#[derive(Clone, Debug)]
pub struct CallFrame {
    /// Callee name as written at the call site, or `<fun>` for anonymous
    /// callees.
    pub name: Name,
    /// Where the call was made.
    pub call_span: Option<Span>,
}

/// Live call stack of an interpreter.
#[derive(Clone, Debug, Default)]
pub struct CallStack {
    frames: Vec<CallFrame>,
    max_depth: Option<usize>,
}

impl CallStack {
    /// `max_depth` of `None` is unlimited.
    pub fn new(max_depth: Option<usize>) -> Self {
        CallStack {
            frames: Vec::new(),
            max_depth,
        }
    }

    /// Push a frame. Fails without pushing once `max_depth` frames are live.
    pub fn push(&mut self, frame: CallFrame) -> Result<(), EvalError> {
        if let Some(max) = self.max_depth {
            if self.frames.len() >= max {
                return Err(recursion_limit_exceeded(max));
            }
        }
        self.frames.push(frame);
        Ok(())
    }

    pub fn pop(&mut self) {
        debug_assert!(!self.frames.is_empty(), "CallStack::pop on empty stack");
        self.frames.pop();
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn current_frame(&self) -> Option<&CallFrame> {
        self.frames.last()
    }

    /// Snapshot, most recent call first.
    pub fn capture(&self) -> EvalBacktrace {
        let frames = self
            .frames
            .iter()
            .rev()
            .map(|frame| BacktraceFrame {
                name: frame.name.to_string(),
                span: frame.call_span,
            })
            .collect();
        EvalBacktrace::new(frames)
    }

    /// Attach a snapshot to `err` unless it already carries one.
    pub fn attach_backtrace(&self, err: EvalError) -> EvalError {
        if self.frames.is_empty() {
            return err;
        }
        err.with_backtrace(self.capture())
    }
}

#[cfg(test)]
mod tests;
