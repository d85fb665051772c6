//! Extension operations for built-in value kinds.
//!
//! Extensions are ordinary [`HostOperation`]s registered against a type
//! name (`object`, `collection`, `map`, `array`, `text`, a host type's
//! name, ...). The resolver considers them after the operations a type
//! declares itself, walking the same ancestor chain, so an extension on
//! `object` is reachable from every value.

mod arrays;
mod collections;
mod text;

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use weft_ir::Name;

use crate::errors::{host_error, EvalError};
use crate::interop::{HostCall, HostOperation, ParamType};
use crate::EvalResult;

/// Extension operations by receiver type name.
#[derive(Default)]
pub struct ExtensionRegistry {
    ops: FxHashMap<Name, Vec<Arc<HostOperation>>>,
}

impl ExtensionRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        ExtensionRegistry::default()
    }

    /// The built-in extensions for objects, collections, maps, arrays and
    /// text.
    pub fn with_defaults() -> Self {
        let mut registry = ExtensionRegistry::new();
        collections::register(&mut registry);
        arrays::register(&mut registry);
        text::register(&mut registry);
        registry
    }

    pub fn register(&mut self, op: HostOperation) {
        self.ops
            .entry(op.origin.clone())
            .or_default()
            .push(Arc::new(op));
    }

    /// Shorthand for a fixed-arity extension on `type_name`.
    pub fn add<F>(&mut self, type_name: &str, name: &str, params: Vec<ParamType>, f: F)
    where
        F: Fn(&mut HostCall<'_, '_>) -> EvalResult + Send + Sync + 'static,
    {
        self.register(HostOperation::new(type_name, name, params, f));
    }

    pub fn operations_for(&self, type_name: &str) -> &[Arc<HostOperation>] {
        self.ops.get(type_name).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.ops.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

impl fmt::Debug for ExtensionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut types: Vec<&Name> = self.ops.keys().collect();
        types.sort();
        f.debug_struct("ExtensionRegistry")
            .field("types", &types)
            .field("operations", &self.len())
            .finish()
    }
}

fn out_of_bounds(index: usize, len: usize) -> EvalError {
    host_error(format!("index {index} out of bounds for length {len}"))
}

fn index_arg(call: &HostCall<'_, '_>, position: usize) -> Result<usize, EvalError> {
    let value = call.arg(position)?;
    value
        .as_index()
        .ok_or_else(|| host_error(format!("invalid index {value}")))
}

#[cfg(test)]
mod tests;
