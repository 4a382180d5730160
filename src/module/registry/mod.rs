//! Module registry
//!
//! Holds every module definition the host has declared, and computes
//! dependency closures over them.

pub mod definition;
pub mod dependencies;

pub use definition::{Declaration, Initializer, ModuleDefinition, ModuleHandle};
pub use dependencies::ModuleDependencies;

use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::module::traits::ModuleError;
use crate::module::validation::{ModuleNameValidator, ValidationResult};

/// Store of declared modules, looked up by name
#[derive(Debug, Default, Clone)]
pub struct ModuleRegistry {
    modules: HashMap<String, ModuleHandle>,
    validator: ModuleNameValidator,
}

impl ModuleRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a module definition
    ///
    /// The module name and every dependency name must be well formed.
    /// Redefining a module replaces the earlier definition.
    pub fn insert(&mut self, definition: ModuleDefinition) -> Result<ModuleHandle, ModuleError> {
        let names = std::iter::once(definition.name()).chain(
            definition.dependencies().iter().map(String::as_str),
        );
        for name in names {
            if let ValidationResult::Invalid(errors) = self.validator.validate(name) {
                return Err(ModuleError::InvalidModuleName(errors.join("; ")));
            }
        }

        let handle = Arc::new(definition);
        if self
            .modules
            .insert(handle.name().to_string(), Arc::clone(&handle))
            .is_some()
        {
            warn!("Module {} redefined", handle.name());
        } else {
            debug!("Module {} defined", handle.name());
        }
        Ok(handle)
    }

    /// Look up a module by name
    pub fn get(&self, name: &str) -> Result<ModuleHandle, ModuleError> {
        self.modules
            .get(name)
            .cloned()
            .ok_or_else(|| ModuleError::ModuleNotFound(name.to_string()))
    }

    /// Whether a module with this name is declared
    pub fn contains(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    /// Declared module names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.modules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
