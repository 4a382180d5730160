//! Initializer execution context
//!
//! Each initializer runs inside its own [`InitContext`]: a fresh capability
//! table holding only what the base module and its own dependencies declare.
//! Nothing registered into the live application is visible from it.

use tracing::debug;
use uuid::Uuid;

use crate::module::providers::{CapabilityTable, ProviderMap, Registration};
use crate::module::registry::{ModuleDependencies, ModuleRegistry};
use crate::module::traits::{ModuleError, ProviderKind};

/// Minimal execution context handed to initializers
#[derive(Debug)]
pub struct InitContext {
    id: Uuid,
    base_module: String,
    capabilities: CapabilityTable,
}

impl InitContext {
    /// Build a fresh context from the base module's declarations
    ///
    /// The base module and everything it requires are replayed, once each,
    /// into a private table through the standard providers.
    pub fn build(registry: &ModuleRegistry, base_module: &str) -> Result<Self, ModuleError> {
        let id = Uuid::new_v4();
        let table = CapabilityTable::shared();
        let mut providers = ProviderMap::standard(&table);

        // Base module first, then what it requires; no name repeats
        let order = ModuleDependencies::resolve(registry, base_module, base_module)?;
        for name in order {
            let module = registry.get(&name)?;
            for declaration in module.declarations() {
                providers
                    .replay(declaration)
                    .map_err(|e| ModuleError::registration(name.as_str(), e))?;
            }
        }
        drop(providers);

        let capabilities = std::mem::take(&mut *table.write());
        debug!(
            "Initializer context {} built from {} ({} registrations)",
            id,
            base_module,
            capabilities.len()
        );

        Ok(Self {
            id,
            base_module: base_module.to_string(),
            capabilities,
        })
    }

    /// Unique id of this context, for log correlation
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Base module the context was built from
    pub fn base_module(&self) -> &str {
        &self.base_module
    }

    /// Look up a base capability
    pub fn get(&self, kind: ProviderKind, name: &str) -> Option<&Registration> {
        self.capabilities.get(kind, name)
    }

    /// Whether a base capability is available
    pub fn has(&self, kind: ProviderKind, name: &str) -> bool {
        self.capabilities.contains(kind, name)
    }

    /// Every base capability, in registration order
    pub fn capabilities(&self) -> &[Registration] {
        self.capabilities.registrations()
    }
}
