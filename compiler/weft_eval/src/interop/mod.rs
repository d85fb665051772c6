//! Host interop: type descriptions, calls into host code, and overload
//! resolution.
//!
//! Host types are described once by a [`HostTypeInfo`] and shared behind
//! `Arc`. The evaluator never inspects host values directly; it asks the
//! [`Resolver`] which declared or extension operation a call binds to and
//! invokes it through a [`HostCall`].

mod call;
mod host;
mod registry;
mod resolver;

use std::fmt;

use weft_ir::Name;

use crate::numeric::NumericKind;

pub use call::HostCall;
pub use host::{
    DisplayFn, GetterFn, HostFn, HostObject, HostOperation, HostProperty, HostTypeInfo,
    HostTypeInfoBuilder, SetterFn,
};
pub use registry::TypeRegistry;
pub use resolver::{ArgBinding, CallShape, Resolution, Resolver, NARROW_PENALTY};

/// A declared parameter type, also used as the runtime type of an argument.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ParamType {
    /// A numeric kind, `boolean`, `Number` or `object`.
    Kind(NumericKind),
    Text,
    List,
    Map,
    Function,
    Tuple,
    Array(Box<ParamType>),
    Host(Name),
    /// A host type used as a value.
    Type(Name),
    Null,
    Void,
}

impl ParamType {
    pub const OBJECT: ParamType = ParamType::Kind(NumericKind::Object);
    pub const INT: ParamType = ParamType::Kind(NumericKind::Int);

    pub fn array(element: ParamType) -> ParamType {
        ParamType::Array(Box::new(element))
    }

    pub fn host(name: &str) -> ParamType {
        ParamType::Host(Name::new(name))
    }

    /// Names this type answers to when looking up extension operations,
    /// most specific first.
    pub fn ancestor_names(&self, types: &TypeRegistry) -> Vec<Name> {
        let mut names: Vec<Name> = match self {
            ParamType::Null | ParamType::Void | ParamType::Type(_) => return Vec::new(),
            ParamType::Kind(NumericKind::Object) => Vec::new(),
            ParamType::Kind(k @ (NumericKind::Boolean | NumericKind::Character)) => {
                vec![Name::new(k.name())]
            }
            ParamType::Kind(k) => vec![Name::new(k.name()), Name::new("number")],
            ParamType::Text => vec![Name::new("text")],
            ParamType::List => vec![Name::new("list"), Name::new("collection")],
            ParamType::Map => vec![Name::new("map")],
            ParamType::Function => vec![Name::new("function")],
            ParamType::Tuple => vec![Name::new("tuple")],
            ParamType::Array(_) => vec![Name::from(self.to_string()), Name::new("array")],
            ParamType::Host(name) => match types.get(name) {
                Some(info) => info.ancestors().iter().map(|t| t.name.clone()).collect(),
                None => vec![name.clone()],
            },
        };
        names.push(Name::new("object"));
        names
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::Kind(k) => f.write_str(k.name()),
            ParamType::Text => f.write_str("text"),
            ParamType::List => f.write_str("list"),
            ParamType::Map => f.write_str("map"),
            ParamType::Function => f.write_str("function"),
            ParamType::Tuple => f.write_str("tuple"),
            ParamType::Array(element) => write!(f, "{element}[]"),
            ParamType::Host(name) => write!(f, "{name}"),
            ParamType::Type(name) => write!(f, "type {name}"),
            ParamType::Null => f.write_str("null"),
            ParamType::Void => f.write_str("void"),
        }
    }
}
