//! Test utilities for module system testing
//!
//! Provides a fixture owning a registry and a capability table, plus helpers
//! for declaring modules and inspecting what was registered.

use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use module_loader::module::SharedCapabilityTable;
use module_loader::{
    CapabilityTable, LoaderConfig, ModuleDefinition, ModuleEngine, ModuleError, ModuleRegistry,
    ProviderKind,
};

/// Test fixture for module system tests
///
/// Starts with the base module `core` and the main module `app`, both treated
/// as pre-loaded once an engine is built.
pub struct ModuleTestFixture {
    /// Declared modules
    pub registry: ModuleRegistry,
}

impl ModuleTestFixture {
    /// Create a fixture with `core` and `app` declared
    pub fn new() -> Self {
        let mut registry = ModuleRegistry::new();
        registry
            .insert(ModuleDefinition::new("core").service("$log", json!({"level": "info"})))
            .expect("core module");
        registry
            .insert(ModuleDefinition::new("app").requires(["core"]))
            .expect("app module");
        Self { registry }
    }

    /// Declare a module that registers one controller named `<name>Ctrl`
    pub fn module(&mut self, name: &str, requires: &[&str]) -> &mut Self {
        self.define(
            ModuleDefinition::new(name)
                .requires(requires.iter().copied())
                .controller(format!("{}Ctrl", name), json!({"module": name})),
        )
    }

    /// Declare an arbitrary module definition
    pub fn define(&mut self, definition: ModuleDefinition) -> &mut Self {
        self.registry.insert(definition).expect("valid module definition");
        self
    }

    /// Build an engine over the declared modules with the default config
    pub fn engine(&self) -> ModuleEngine {
        ModuleEngine::new(self.registry.clone(), LoaderConfig::default())
            .expect("engine initialization")
    }
}

impl Default for ModuleTestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Names registered under `kind`, in replay order (overrides included)
pub fn registered(table: &SharedCapabilityTable, kind: ProviderKind) -> Vec<String> {
    table
        .read()
        .registrations()
        .iter()
        .filter(|r| r.kind == kind)
        .map(|r| r.name.clone())
        .collect()
}

/// Controllers registered, in replay order
pub fn controllers(engine: &ModuleEngine) -> Vec<String> {
    registered(&engine.capabilities(), ProviderKind::Controller)
}

/// Shared counter incremented by initializers
#[derive(Clone, Default)]
pub struct Counter(Arc<AtomicUsize>);

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initializer that bumps this counter
    pub fn initializer(
        &self,
    ) -> impl Fn(&module_loader::InitContext) -> Result<(), ModuleError> + Send + Sync + 'static
    {
        let counter = Arc::clone(&self.0);
        move |_: &module_loader::InitContext| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// Fresh capability table, for tests wiring their own providers
pub fn shared_table() -> SharedCapabilityTable {
    CapabilityTable::shared()
}
