//! Vindex construction from configuration.
//!
//! The registry is an explicit factory value: configuration loading
//! creates one, optionally registers extra vindex types, and asks it
//! to instantiate vindexes by type name. There is no process-wide
//! registry state.

use std::collections::HashMap;
use std::sync::Arc;

use super::lookup::{LookupNonUnique, LookupTable, LookupUnique};
use super::Vindex;
use crate::error::{RoutingError, RoutingResult};

/// Configuration mapping handed to a vindex builder.
pub type VindexParams = HashMap<String, String>;

/// Builds a vindex instance from its instance name and params.
pub type VindexBuilder = fn(&str, &VindexParams) -> RoutingResult<Arc<dyn Vindex>>;

/// Factory mapping vindex type names to builders.
pub struct VindexRegistry {
    builders: HashMap<String, VindexBuilder>,
}

impl VindexRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            builders: HashMap::new(),
        }
    }

    /// Creates a registry with the built-in lookup vindex types:
    /// `lookup` (non-unique) and `lookup_unique`.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("lookup", build_lookup);
        registry.register("lookup_unique", build_lookup_unique);
        registry
    }

    /// Registers a builder for a vindex type name, replacing any
    /// previous registration.
    pub fn register(&mut self, type_name: impl Into<String>, builder: VindexBuilder) {
        self.builders.insert(type_name.into(), builder);
    }

    /// Returns true if the type name has a registered builder.
    pub fn contains(&self, type_name: &str) -> bool {
        self.builders.contains_key(type_name)
    }

    /// Instantiates a vindex.
    ///
    /// # Errors
    ///
    /// [`RoutingError::UnknownVindexType`] if no builder is registered
    /// for `type_name`; otherwise whatever the builder raises, such as
    /// [`RoutingError::MissingParam`] for absent configuration keys.
    pub fn create(
        &self,
        type_name: &str,
        instance_name: &str,
        params: &VindexParams,
    ) -> RoutingResult<Arc<dyn Vindex>> {
        let builder = self
            .builders
            .get(type_name)
            .ok_or_else(|| RoutingError::UnknownVindexType(type_name.to_string()))?;
        builder(instance_name, params)
    }
}

impl Default for VindexRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

fn build_lookup(name: &str, params: &VindexParams) -> RoutingResult<Arc<dyn Vindex>> {
    let table = LookupTable::from_params("lookup", params)?;
    Ok(Arc::new(LookupNonUnique::new(name, table)))
}

fn build_lookup_unique(name: &str, params: &VindexParams) -> RoutingResult<Arc<dyn Vindex>> {
    let table = LookupTable::from_params("lookup_unique", params)?;
    Ok(Arc::new(LookupUnique::new(name, table)))
}
