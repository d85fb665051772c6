//! Host types known to an engine.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use weft_ir::Name;

use super::HostTypeInfo;

/// Registered host types by name. Supertypes are registered along with
/// their subtypes.
#[derive(Default, Debug)]
pub struct TypeRegistry {
    types: FxHashMap<Name, Arc<HostTypeInfo>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        TypeRegistry::default()
    }

    pub fn register(&mut self, info: &Arc<HostTypeInfo>) {
        for ancestor in info.ancestors() {
            self.types.entry(ancestor.name.clone()).or_insert(ancestor);
        }
    }

    pub fn get(&self, name: &str) -> Option<&Arc<HostTypeInfo>> {
        self.types.get(name)
    }

    /// `sub` is `sup` or one of its descendants. Unknown types are only
    /// related to themselves.
    pub fn is_subtype(&self, sub: &str, sup: &str) -> bool {
        sub == sup || self.get(sub).is_some_and(|info| info.is_subtype_of(sup))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<HostTypeInfo>> {
        self.types.values()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
