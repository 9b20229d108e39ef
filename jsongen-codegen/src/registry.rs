//! The per-pass table of built models.
use std::collections::BTreeMap;

use crate::model::TypeModel;

/// Models that built successfully in one generation pass, keyed by type name.
///
/// A registry is created empty for every pass and never shared between
/// passes.  Fields refer to other types by name only, so mutually recursive
/// types simply refer to each other's entries.
#[derive(Debug, Default)]
pub struct Registry {
    models: BTreeMap<String, TypeModel>,
}

impl Registry {
    pub fn new() -> Registry {
        Registry::default()
    }

    /// Adds a model.  Returns `false` if the name was already taken, in
    /// which case the registry is unchanged.
    pub fn insert(&mut self, model: TypeModel) -> bool {
        if self.models.contains_key(&model.type_name) {
            return false;
        }
        self.models.insert(model.type_name.clone(), model);
        true
    }

    pub fn get(&self, name: &str) -> Option<&TypeModel> {
        self.models.get(name)
    }

    /// Registered type names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(|x| x.as_str())
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
