//! RAII guard for the interpreter's current scope.
//!
//! [`ScopedInterpreter`] swaps a scope in and puts the previous one back
//! when dropped, so the current-scope pointer is restored whether the
//! guarded evaluation returns normally, fails, or unwinds.

use std::ops::{Deref, DerefMut};

use super::Interpreter;
use crate::scope::ScopeRef;

/// Interpreter running in a temporarily swapped-in scope.
///
/// Derefs to the interpreter, so everything it offers is available through
/// the guard.
pub struct ScopedInterpreter<'guard, 'e> {
    interpreter: &'guard mut Interpreter<'e>,
    saved: Option<ScopeRef>,
}

impl Drop for ScopedInterpreter<'_, '_> {
    fn drop(&mut self) {
        if let Some(saved) = self.saved.take() {
            self.interpreter.scope = saved;
        }
    }
}

impl<'e> Deref for ScopedInterpreter<'_, 'e> {
    type Target = Interpreter<'e>;

    fn deref(&self) -> &Self::Target {
        self.interpreter
    }
}

impl DerefMut for ScopedInterpreter<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.interpreter
    }
}

impl<'e> Interpreter<'e> {
    /// Make `scope` current until the returned guard drops.
    pub fn scoped(&mut self, scope: ScopeRef) -> ScopedInterpreter<'_, 'e> {
        let saved = std::mem::replace(&mut self.scope, scope);
        ScopedInterpreter {
            interpreter: self,
            saved: Some(saved),
        }
    }

    /// Run `f` with `scope` current, restoring the previous scope after.
    pub fn with_scope<T>(
        &mut self,
        scope: ScopeRef,
        f: impl FnOnce(&mut ScopedInterpreter<'_, 'e>) -> T,
    ) -> T {
        let mut scoped = self.scoped(scope);
        f(&mut scoped)
    }
}
