//! Stack growth for recursive descent.
//!
//! Parsing nested parentheses and evaluating deep script recursion both
//! recurse on the native stack. [`ensure_sufficient_stack`] grows the stack
//! on a fresh segment when the remaining space drops below a red zone.
//!
//! On wasm the closure runs directly and the evaluator's call-depth limit is
//! the only guard.

/// Remaining stack below which a new segment is allocated.
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment.
const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Run `f`, first growing the stack if less than the red zone remains.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

/// Whether this target can grow its stack on demand.
pub const fn can_grow_stack() -> bool {
    cfg!(not(target_arch = "wasm32"))
}
