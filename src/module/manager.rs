//! Module engine
//!
//! Bundles the registry, the loader and the host application's live
//! capability providers behind one handle.

use std::sync::Arc;
use tracing::info;

use crate::config::{ConfigureSettings, LoaderConfig};
use crate::module::loader::{ConfigCallback, ConfigPhase, LoadRequest, Loaded, ModuleLoader};
use crate::module::providers::{CapabilityTable, ProviderMap, SharedCapabilityTable};
use crate::module::registry::ModuleRegistry;
use crate::module::traits::ModuleError;

/// Module engine coordinating registry, loader and providers
pub struct ModuleEngine {
    /// Declared modules
    registry: ModuleRegistry,
    /// Loaded-set and activation
    loader: ModuleLoader,
    /// Live capability providers
    providers: ProviderMap,
    /// Capabilities registered through the standard providers
    capabilities: SharedCapabilityTable,
}

impl ModuleEngine {
    /// Create an engine with the standard providers and initialize it
    ///
    /// The closure of `config.main_module` is marked loaded without replaying
    /// anything: the host application has already applied it.
    ///
    /// # Arguments
    /// * `registry` - Every module the engine may be asked to load
    /// * `config` - Main and base module names
    ///
    /// # Example
    /// ```rust
    /// use module_loader::{LoaderConfig, ModuleDefinition, ModuleEngine, ModuleRegistry};
    ///
    /// let mut registry = ModuleRegistry::new();
    /// registry.insert(ModuleDefinition::new("core")).unwrap();
    /// registry.insert(ModuleDefinition::new("app").requires(["core"])).unwrap();
    ///
    /// let engine = ModuleEngine::new(registry, LoaderConfig::default()).unwrap();
    /// assert_eq!(engine.loaded_modules(), vec!["core", "app"]);
    /// ```
    pub fn new(registry: ModuleRegistry, config: LoaderConfig) -> Result<Self, ModuleError> {
        let capabilities = CapabilityTable::shared();
        let providers = ProviderMap::standard(&capabilities);
        Self::with_providers(registry, config, providers, capabilities)
    }

    /// Create an engine around host-supplied providers and initialize it
    ///
    /// `capabilities` is what [`Self::capabilities`] hands back; it should be
    /// the table the providers write into.
    pub fn with_providers(
        registry: ModuleRegistry,
        config: LoaderConfig,
        providers: ProviderMap,
        capabilities: SharedCapabilityTable,
    ) -> Result<Self, ModuleError> {
        let mut loader = ModuleLoader::new(config);
        loader.initialize(&registry)?;

        info!("Module engine started ({} modules declared)", registry.len());
        Ok(Self {
            registry,
            loader,
            providers,
            capabilities,
        })
    }

    /// Activate one or more modules
    pub fn load(&mut self, request: impl Into<LoadRequest>) -> Result<Loaded, ModuleError> {
        self.loader
            .load(&self.registry, &mut self.providers, request, None)
    }

    /// Activate modules, running `configure` as each requested module's
    /// configuration phase
    ///
    /// Dependencies pulled in along the way are activated without it.
    ///
    /// # Example
    /// ```rust
    /// use module_loader::{LoaderConfig, ModuleDefinition, ModuleEngine, ModuleRegistry, ProviderKind};
    /// use serde_json::json;
    ///
    /// let mut registry = ModuleRegistry::new();
    /// registry.insert(ModuleDefinition::new("core")).unwrap();
    /// registry.insert(ModuleDefinition::new("app")).unwrap();
    /// registry.insert(ModuleDefinition::new("reports")).unwrap();
    /// let mut engine = ModuleEngine::new(registry, LoaderConfig::default()).unwrap();
    ///
    /// engine
    ///     .load_with("reports", |phase| {
    ///         phase.register(ProviderKind::Constant, "constant", &[json!("pageSize"), json!(50)])
    ///     })
    ///     .unwrap();
    /// assert!(engine.capabilities().read().contains(ProviderKind::Constant, "pageSize"));
    /// ```
    pub fn load_with<F>(
        &mut self,
        request: impl Into<LoadRequest>,
        mut configure: F,
    ) -> Result<Loaded, ModuleError>
    where
        F: FnMut(&mut ConfigPhase<'_>) -> Result<(), ModuleError>,
    {
        let callback: &mut ConfigCallback<'_> = &mut configure;
        self.loader
            .load(&self.registry, &mut self.providers, request, Some(callback))
    }

    /// Merge settings into the loader configuration
    pub fn configure(&mut self, settings: ConfigureSettings) -> LoaderConfig {
        self.loader.configure(settings).clone()
    }

    /// Whether `name` has been fully registered
    pub fn is_loaded(&self, name: &str) -> bool {
        self.loader.is_loaded(name)
    }

    /// Loaded module names, in the order they were marked
    pub fn loaded_modules(&self) -> Vec<String> {
        self.loader.loaded().iter().map(str::to_string).collect()
    }

    /// Registered capabilities of the live application
    pub fn capabilities(&self) -> SharedCapabilityTable {
        Arc::clone(&self.capabilities)
    }

    /// Declared modules
    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    /// Declared modules, for hosts that declare more modules at runtime
    pub fn registry_mut(&mut self) -> &mut ModuleRegistry {
        &mut self.registry
    }

    /// Live capability providers
    pub fn providers_mut(&mut self) -> &mut ProviderMap {
        &mut self.providers
    }

    /// Loader configuration
    pub fn config(&self) -> &LoaderConfig {
        self.loader.config()
    }
}
