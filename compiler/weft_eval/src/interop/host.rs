//! Host type descriptions and host object handles.

use std::any::Any;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use weft_ir::Name;

use super::{HostCall, ParamType};
use crate::errors::{host_error, EvalError, EvalResult};
use crate::Value;

/// Body of a host operation.
pub type HostFn = dyn Fn(&mut HostCall<'_, '_>) -> EvalResult + Send + Sync;
pub type GetterFn = dyn Fn(&HostObject) -> EvalResult + Send + Sync;
pub type SetterFn = dyn Fn(&HostObject, Value) -> Result<(), EvalError> + Send + Sync;
pub type DisplayFn = dyn Fn(&dyn Any) -> String + Send + Sync;

/// A named operation a script can call: a constructor, an instance or
/// static method, or an extension.
pub struct HostOperation {
    pub name: Name,
    pub params: Vec<ParamType>,
    /// The last parameter is an array collecting trailing arguments.
    pub variadic: bool,
    pub is_static: bool,
    /// Type that declared the operation.
    pub origin: Name,
    body: Arc<HostFn>,
}

impl HostOperation {
    pub fn new<F>(origin: &str, name: &str, params: Vec<ParamType>, f: F) -> Self
    where
        F: Fn(&mut HostCall<'_, '_>) -> EvalResult + Send + Sync + 'static,
    {
        HostOperation {
            name: Name::new(name),
            params,
            variadic: false,
            is_static: false,
            origin: Name::new(origin),
            body: Arc::new(f),
        }
    }

    /// Mark the last parameter as collecting trailing arguments. It must be
    /// an array type.
    #[must_use]
    pub fn variadic(mut self) -> Self {
        debug_assert!(
            matches!(self.params.last(), Some(ParamType::Array(_))),
            "variadic operation `{}` must end with an array parameter",
            self.name
        );
        self.variadic = true;
        self
    }

    #[must_use]
    pub fn static_op(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn invoke(&self, call: &mut HostCall<'_, '_>) -> EvalResult {
        (self.body)(call)
    }

    /// Same parameter list and calling convention, so one overrides the
    /// other.
    pub fn same_signature(&self, other: &HostOperation) -> bool {
        self.params == other.params && self.variadic == other.variadic
    }

    /// `origin.name(p1, p2...)`.
    pub fn signature(&self) -> String {
        let mut out = format!("{}.{}(", self.origin, self.name);
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            match param {
                ParamType::Array(element) if self.variadic && i + 1 == self.params.len() => {
                    out.push_str(&format!("{element}..."));
                }
                other => out.push_str(&other.to_string()),
            }
        }
        out.push(')');
        out
    }
}

impl fmt::Debug for HostOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.signature())
    }
}

/// A readable, optionally writable, property of a host type.
#[derive(Clone)]
pub struct HostProperty {
    pub name: Name,
    getter: Arc<GetterFn>,
    setter: Option<Arc<SetterFn>>,
}

impl HostProperty {
    pub fn get(&self, object: &HostObject) -> EvalResult {
        (self.getter)(object)
    }

    pub fn set(&self, object: &HostObject, value: Value) -> Result<(), EvalError> {
        match &self.setter {
            Some(setter) => setter(object, value),
            None => Err(host_error(format!(
                "property `{}` of {} is read-only",
                self.name,
                object.info().name
            ))),
        }
    }

    pub fn is_writable(&self) -> bool {
        self.setter.is_some()
    }
}

/// Everything the interpreter may know about a host type.
pub struct HostTypeInfo {
    pub name: Name,
    supertypes: Vec<Arc<HostTypeInfo>>,
    operations: Vec<Arc<HostOperation>>,
    properties: FxHashMap<Name, HostProperty>,
    display: Option<Arc<DisplayFn>>,
}

impl HostTypeInfo {
    pub fn builder(name: &str) -> HostTypeInfoBuilder {
        HostTypeInfoBuilder {
            info: HostTypeInfo {
                name: Name::new(name),
                supertypes: Vec::new(),
                operations: Vec::new(),
                properties: FxHashMap::default(),
                display: None,
            },
        }
    }

    pub fn supertypes(&self) -> &[Arc<HostTypeInfo>] {
        &self.supertypes
    }

    pub fn operations(&self) -> &[Arc<HostOperation>] {
        &self.operations
    }

    /// This type followed by its supertypes, breadth first, without
    /// repeats.
    pub fn ancestors(self: &Arc<Self>) -> Vec<Arc<HostTypeInfo>> {
        let mut out: Vec<Arc<HostTypeInfo>> = vec![Arc::clone(self)];
        let mut next = 0;
        while next < out.len() {
            let supers: Vec<Arc<HostTypeInfo>> = out[next].supertypes.clone();
            for sup in supers {
                if !out.iter().any(|seen| Arc::ptr_eq(seen, &sup)) {
                    out.push(sup);
                }
            }
            next += 1;
        }
        out
    }

    pub fn is_subtype_of(self: &Arc<Self>, name: &str) -> bool {
        self.ancestors().iter().any(|t| &*t.name == name)
    }

    /// Property declared here or on a supertype.
    pub fn property(&self, name: &str) -> Option<&HostProperty> {
        self.properties.get(name).or_else(|| {
            self.supertypes
                .iter()
                .find_map(|sup| sup.property(name))
        })
    }

    pub fn has_instance_operation(&self, name: &str) -> bool {
        self.operations
            .iter()
            .any(|op| !op.is_static && &*op.name == name)
            || self
                .supertypes
                .iter()
                .any(|sup| sup.has_instance_operation(name))
    }

    pub fn has_static_operation(&self, name: &str) -> bool {
        self.operations
            .iter()
            .any(|op| op.is_static && &*op.name == name)
            || self
                .supertypes
                .iter()
                .any(|sup| sup.has_static_operation(name))
    }

    fn display_of(&self, data: &dyn Any) -> Option<String> {
        match &self.display {
            Some(display) => Some(display(data)),
            None => self.supertypes.iter().find_map(|sup| sup.display_of(data)),
        }
    }
}

impl fmt::Debug for HostTypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostTypeInfo")
            .field("name", &self.name)
            .field(
                "supertypes",
                &self.supertypes.iter().map(|s| &s.name).collect::<Vec<_>>(),
            )
            .field("operations", &self.operations)
            .finish_non_exhaustive()
    }
}

/// Builder for [`HostTypeInfo`].
#[must_use]
pub struct HostTypeInfoBuilder {
    info: HostTypeInfo,
}

impl HostTypeInfoBuilder {
    pub fn supertype(mut self, parent: &Arc<HostTypeInfo>) -> Self {
        self.info.supertypes.push(Arc::clone(parent));
        self
    }

    fn push(mut self, op: HostOperation) -> Self {
        self.info.operations.push(Arc::new(op));
        self
    }

    fn op<F>(&self, name: &str, params: Vec<ParamType>, f: F) -> HostOperation
    where
        F: Fn(&mut HostCall<'_, '_>) -> EvalResult + Send + Sync + 'static,
    {
        HostOperation::new(&self.info.name, name, params, f)
    }

    /// Constructor, callable as `Type(args)` or `Type.new(args)`.
    pub fn constructor<F>(self, params: Vec<ParamType>, f: F) -> Self
    where
        F: Fn(&mut HostCall<'_, '_>) -> EvalResult + Send + Sync + 'static,
    {
        let op = self.op("new", params, f).static_op();
        self.push(op)
    }

    pub fn method<F>(self, name: &str, params: Vec<ParamType>, f: F) -> Self
    where
        F: Fn(&mut HostCall<'_, '_>) -> EvalResult + Send + Sync + 'static,
    {
        let op = self.op(name, params, f);
        self.push(op)
    }

    /// Method whose last parameter (an array type) collects trailing
    /// arguments.
    pub fn variadic_method<F>(self, name: &str, params: Vec<ParamType>, f: F) -> Self
    where
        F: Fn(&mut HostCall<'_, '_>) -> EvalResult + Send + Sync + 'static,
    {
        let op = self.op(name, params, f).variadic();
        self.push(op)
    }

    pub fn static_method<F>(self, name: &str, params: Vec<ParamType>, f: F) -> Self
    where
        F: Fn(&mut HostCall<'_, '_>) -> EvalResult + Send + Sync + 'static,
    {
        let op = self.op(name, params, f).static_op();
        self.push(op)
    }

    pub fn static_variadic_method<F>(self, name: &str, params: Vec<ParamType>, f: F) -> Self
    where
        F: Fn(&mut HostCall<'_, '_>) -> EvalResult + Send + Sync + 'static,
    {
        let op = self.op(name, params, f).static_op().variadic();
        self.push(op)
    }

    pub fn property<G>(mut self, name: &str, getter: G) -> Self
    where
        G: Fn(&HostObject) -> EvalResult + Send + Sync + 'static,
    {
        self.info.properties.insert(
            Name::new(name),
            HostProperty {
                name: Name::new(name),
                getter: Arc::new(getter),
                setter: None,
            },
        );
        self
    }

    pub fn writable_property<G, S>(mut self, name: &str, getter: G, setter: S) -> Self
    where
        G: Fn(&HostObject) -> EvalResult + Send + Sync + 'static,
        S: Fn(&HostObject, Value) -> Result<(), EvalError> + Send + Sync + 'static,
    {
        self.info.properties.insert(
            Name::new(name),
            HostProperty {
                name: Name::new(name),
                getter: Arc::new(getter),
                setter: Some(Arc::new(setter)),
            },
        );
        self
    }

    pub fn display<D>(mut self, display: D) -> Self
    where
        D: Fn(&dyn Any) -> String + Send + Sync + 'static,
    {
        self.info.display = Some(Arc::new(display));
        self
    }

    pub fn build(self) -> Arc<HostTypeInfo> {
        Arc::new(self.info)
    }
}

/// A host value: its type description plus the host's own data.
#[derive(Clone)]
pub struct HostObject {
    info: Arc<HostTypeInfo>,
    data: Rc<dyn Any>,
}

impl HostObject {
    pub fn new<T: Any>(info: &Arc<HostTypeInfo>, data: T) -> Self {
        HostObject {
            info: Arc::clone(info),
            data: Rc::new(data),
        }
    }

    pub fn info(&self) -> &Arc<HostTypeInfo> {
        &self.info
    }

    pub fn downcast<T: Any>(&self) -> Option<&T> {
        self.data.downcast_ref::<T>()
    }

    pub fn same_object(&self, other: &HostObject) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.data), Rc::as_ptr(&other.data))
    }

    pub(crate) fn fmt_display(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.info.display_of(&*self.data) {
            Some(text) => f.write_str(&text),
            None => write!(f, "<{}>", self.info.name),
        }
    }
}

impl fmt::Debug for HostObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostObject({})", self.info.name)
    }
}
