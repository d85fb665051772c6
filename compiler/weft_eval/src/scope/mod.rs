//! Lexical scope chains.
//!
//! A scope is an `Rc` node pointing outward to its parent; parents never
//! change and nothing points inward, so chains cannot form cycles. Closures
//! keep the scope they were created in alive by holding a [`ScopeRef`].
//!
//! Kinds of node:
//! - `Local`: owns its bindings; created for every own-context call and for
//!   the top level of a script.
//! - `Overlay`: binds call parameters over the captured scope. Anything else
//!   the body defines is written through to the parent.
//! - `Combined`: two chains searched in order; writes go to the first.
//! - `External`: bindings supplied by the host through [`Bindings`].
//!
//! The engine's globals sit behind every chain and are consulted by the
//! interpreter once a chain reports [`Lookup::Missing`].

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use weft_ir::Name;

use crate::errors::{constant_reassignment, host_error, EvalError};
use crate::interop::HostObject;
use crate::{BoundMethod, Value};

/// A binding slot.
#[derive(Clone, Debug)]
pub enum Cell {
    /// Reassignable.
    Value(Value),
    /// Fixed after definition.
    Constant(Value),
    /// Declared but not yet given a value. Reading is an error; the first
    /// write replaces it with a value cell in place.
    Undefined,
}

/// Host-supplied bindings.
///
/// `get` returns `Ok(None)` for names this set does not bind, and an error
/// when reading a bound name fails. `assign` returns `Ok(false)` for unbound
/// names so the write can continue outward.
pub trait Bindings {
    fn get(&self, name: &str) -> Result<Option<Value>, EvalError>;

    fn define(&self, name: &Name, value: Value) -> Result<(), EvalError>;

    fn assign(&self, name: &Name, value: Value) -> Result<bool, EvalError>;
}

/// Plain key/value bindings.
#[derive(Default)]
pub struct MapBindings {
    entries: RefCell<FxHashMap<Name, Value>>,
}

impl MapBindings {
    pub fn new() -> Self {
        MapBindings::default()
    }

    #[must_use]
    pub fn with(self, name: &str, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&self, name: &str, value: impl Into<Value>) {
        self.entries.borrow_mut().insert(Name::new(name), value.into());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.borrow().contains_key(name)
    }

    pub fn value(&self, name: &str) -> Option<Value> {
        self.entries.borrow().get(name).cloned()
    }
}

impl Bindings for MapBindings {
    fn get(&self, name: &str) -> Result<Option<Value>, EvalError> {
        Ok(self.value(name))
    }

    fn define(&self, name: &Name, value: Value) -> Result<(), EvalError> {
        self.entries.borrow_mut().insert(name.clone(), value);
        Ok(())
    }

    fn assign(&self, name: &Name, value: Value) -> Result<bool, EvalError> {
        match self.entries.borrow_mut().get_mut(name.as_str()) {
            Some(slot) => {
                *slot = value;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// A host object viewed as bindings: one per property, and one bound
/// method per declared operation name.
pub struct HostBindings {
    object: HostObject,
}

impl HostBindings {
    pub fn new(object: HostObject) -> Self {
        HostBindings { object }
    }

    pub fn object(&self) -> &HostObject {
        &self.object
    }
}

impl Bindings for HostBindings {
    fn get(&self, name: &str) -> Result<Option<Value>, EvalError> {
        let info = self.object.info();
        if let Some(property) = info.property(name) {
            return property.get(&self.object).map(Some);
        }
        if info.has_instance_operation(name) {
            return Ok(Some(Value::Method(Rc::new(BoundMethod {
                receiver: Value::Host(self.object.clone()),
                name: Name::new(name),
            }))));
        }
        Ok(None)
    }

    fn define(&self, name: &Name, _value: Value) -> Result<(), EvalError> {
        Err(host_error(format!(
            "cannot define `{name}` on {}",
            self.object.info().name
        )))
    }

    fn assign(&self, name: &Name, value: Value) -> Result<bool, EvalError> {
        match self.object.info().property(name) {
            Some(property) => property.set(&self.object, value).map(|()| true),
            None => Ok(false),
        }
    }
}

/// Result of looking a name up along a chain.
#[derive(Debug)]
pub enum Lookup {
    Found(Value),
    /// Declared with `def` but never written.
    Undefined,
    Missing,
}

enum ScopeKind {
    Local,
    Overlay,
    Combined { first: ScopeRef, second: ScopeRef },
    External(Rc<dyn Bindings>),
}

struct Scope {
    kind: ScopeKind,
    cells: RefCell<FxHashMap<Name, Cell>>,
    parent: Option<ScopeRef>,
}

/// Shared handle to a scope node.
#[derive(Clone)]
pub struct ScopeRef(Rc<Scope>);

impl ScopeRef {
    fn make(kind: ScopeKind, parent: Option<ScopeRef>) -> Self {
        ScopeRef(Rc::new(Scope {
            kind,
            cells: RefCell::new(FxHashMap::default()),
            parent,
        }))
    }

    /// A fresh root scope.
    pub fn new() -> Self {
        ScopeRef::make(ScopeKind::Local, None)
    }

    /// A local scope over `parent`.
    pub fn local(parent: &ScopeRef) -> Self {
        ScopeRef::make(ScopeKind::Local, Some(parent.clone()))
    }

    /// A parameter overlay over `parent`.
    pub fn overlay(parent: &ScopeRef) -> Self {
        ScopeRef::make(ScopeKind::Overlay, Some(parent.clone()))
    }

    /// Search `first`, then `second`; definitions land in `first`.
    pub fn combined(first: &ScopeRef, second: &ScopeRef) -> Self {
        ScopeRef::make(
            ScopeKind::Combined {
                first: first.clone(),
                second: second.clone(),
            },
            None,
        )
    }

    pub fn external(bindings: Rc<dyn Bindings>) -> Self {
        ScopeRef::make(ScopeKind::External(bindings), None)
    }

    pub fn from_map(bindings: &Rc<MapBindings>) -> Self {
        ScopeRef::external(Rc::clone(bindings) as Rc<dyn Bindings>)
    }

    pub fn from_host(object: HostObject) -> Self {
        ScopeRef::external(Rc::new(HostBindings::new(object)))
    }

    pub fn parent(&self) -> Option<&ScopeRef> {
        self.0.parent.as_ref()
    }

    pub fn ptr_eq(&self, other: &ScopeRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Walk the chain for `name`.
    ///
    /// Fails only when host bindings fail to read a name they bind.
    pub fn lookup(&self, name: &str) -> Result<Lookup, EvalError> {
        let mut current = self;
        loop {
            match &current.0.kind {
                ScopeKind::Combined { first, second } => {
                    return match first.lookup(name)? {
                        Lookup::Missing => second.lookup(name),
                        found => Ok(found),
                    };
                }
                ScopeKind::External(bindings) => {
                    if let Some(value) = bindings.get(name)? {
                        return Ok(Lookup::Found(value));
                    }
                }
                ScopeKind::Local | ScopeKind::Overlay => {
                    match current.0.cells.borrow().get(name) {
                        Some(Cell::Value(v) | Cell::Constant(v)) => {
                            return Ok(Lookup::Found(v.clone()))
                        }
                        Some(Cell::Undefined) => return Ok(Lookup::Undefined),
                        None => {}
                    }
                }
            }
            match &current.0.parent {
                Some(parent) => current = parent,
                None => return Ok(Lookup::Missing),
            }
        }
    }

    /// Overwrite an existing binding found along the chain.
    ///
    /// Returns `Ok(false)` when no scope binds `name`.
    pub fn assign_existing(&self, name: &Name, value: Value) -> Result<bool, EvalError> {
        let mut current = self;
        loop {
            match &current.0.kind {
                ScopeKind::Combined { first, second } => {
                    if first.assign_existing(name, value.clone())? {
                        return Ok(true);
                    }
                    return second.assign_existing(name, value);
                }
                ScopeKind::External(bindings) => {
                    if bindings.assign(name, value.clone())? {
                        return Ok(true);
                    }
                }
                ScopeKind::Local | ScopeKind::Overlay => {
                    let mut cells = current.0.cells.borrow_mut();
                    if let Some(cell) = cells.get_mut(name.as_str()) {
                        if matches!(cell, Cell::Constant(_)) {
                            return Err(constant_reassignment(name));
                        }
                        *cell = Cell::Value(value);
                        return Ok(true);
                    }
                }
            }
            match &current.0.parent {
                Some(parent) => current = parent,
                None => return Ok(false),
            }
        }
    }

    /// The scope that receives new definitions made from here.
    pub fn definition_target(&self) -> ScopeRef {
        let mut current = self.clone();
        loop {
            let next = match &current.0.kind {
                ScopeKind::Overlay => current.0.parent.clone(),
                ScopeKind::Combined { first, .. } => Some(first.clone()),
                ScopeKind::Local | ScopeKind::External(_) => None,
            };
            match next {
                Some(next) => current = next,
                None => return current,
            }
        }
    }

    /// Define `name` in this scope's definition target.
    ///
    /// An undefined marker never replaces a concrete binding, and constants
    /// cannot be redefined.
    pub fn define(&self, name: &Name, cell: Cell) -> Result<(), EvalError> {
        let target = self.definition_target();
        if let ScopeKind::External(bindings) = &target.0.kind {
            return match cell {
                Cell::Value(v) | Cell::Constant(v) => bindings.define(name, v),
                Cell::Undefined => Ok(()),
            };
        }
        let mut cells = target.0.cells.borrow_mut();
        match cells.get(name.as_str()) {
            Some(Cell::Constant(_)) => return Err(constant_reassignment(name)),
            Some(Cell::Value(_)) if matches!(cell, Cell::Undefined) => return Ok(()),
            _ => {}
        }
        cells.insert(name.clone(), cell);
        Ok(())
    }

    /// Bind a call parameter directly in this node.
    pub fn bind_param(&self, name: &Name, value: Value) {
        self.0
            .cells
            .borrow_mut()
            .insert(name.clone(), Cell::Value(value));
    }

    /// Names bound directly in this node, sorted.
    pub fn local_names(&self) -> Vec<Name> {
        let mut names: Vec<Name> = self.0.cells.borrow().keys().cloned().collect();
        names.sort();
        names
    }

    /// Value bound directly in this node, ignoring the chain.
    pub fn get_local(&self, name: &str) -> Option<Value> {
        match self.0.cells.borrow().get(name) {
            Some(Cell::Value(v) | Cell::Constant(v)) => Some(v.clone()),
            _ => None,
        }
    }
}

impl Default for ScopeRef {
    fn default() -> Self {
        ScopeRef::new()
    }
}

impl fmt::Debug for ScopeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.0.kind {
            ScopeKind::Local => "Local",
            ScopeKind::Overlay => "Overlay",
            ScopeKind::Combined { .. } => "Combined",
            ScopeKind::External(_) => "External",
        };
        f.debug_struct("ScopeRef")
            .field("kind", &kind)
            .field("names", &self.local_names())
            .field("has_parent", &self.0.parent.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests;
