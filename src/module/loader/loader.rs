//! Module loader implementation
//!
//! Activates modules on demand: loads unloaded dependencies first, replays
//! each module's declaration queue against the capability providers, marks it
//! loaded, and finally runs every initializer collected during the call.

use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, info_span, warn};

use crate::config::{ConfigureSettings, LoaderConfig};
use crate::module::context::InitContext;
use crate::module::loader::loaded::LoadedSet;
use crate::module::loader::request::{LoadRequest, Loaded};
use crate::module::providers::ProviderMap;
use crate::module::registry::{Initializer, ModuleDependencies, ModuleHandle, ModuleRegistry};
use crate::module::traits::{ModuleError, ProviderKind};

/// Configuration phase of a module being activated
///
/// Handed to the configuration callback of a `load` call before the module's
/// declarations are replayed.
pub struct ConfigPhase<'a> {
    module: &'a str,
    providers: &'a mut ProviderMap,
}

impl<'a> ConfigPhase<'a> {
    /// Module being configured
    pub fn module(&self) -> &str {
        self.module
    }

    /// Live capability providers
    pub fn providers(&mut self) -> &mut ProviderMap {
        &mut *self.providers
    }

    /// Invoke a provider operation as part of this module's configuration
    pub fn register(
        &mut self,
        kind: ProviderKind,
        operation: &str,
        arguments: &[Value],
    ) -> Result<(), ModuleError> {
        self.providers.invoke(kind, operation, arguments)
    }
}

/// Configuration callback accepted by [`ModuleLoader::load`]
pub type ConfigCallback<'c> = dyn FnMut(&mut ConfigPhase<'_>) -> Result<(), ModuleError> + 'c;

/// Initializer waiting for the end of the top-level call
struct PendingInitializer {
    module: String,
    initializer: Initializer,
}

/// Module loader: owns the loaded-set and performs activation
#[derive(Debug, Clone)]
pub struct ModuleLoader {
    config: LoaderConfig,
    loaded: LoadedSet,
}

impl ModuleLoader {
    /// Create a loader with an empty loaded-set
    pub fn new(config: LoaderConfig) -> Self {
        Self {
            config,
            loaded: LoadedSet::new(),
        }
    }

    /// Current configuration
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Merge settings into the configuration
    ///
    /// Only future closure computations are affected; nothing already loaded
    /// is touched.
    pub fn configure(&mut self, settings: ConfigureSettings) -> &LoaderConfig {
        self.config.merge(settings)
    }

    /// Seed the loaded-set with the closure of the main module
    ///
    /// The main module's declarations are treated as already applied by the
    /// host and are not replayed.
    pub fn initialize(&mut self, registry: &ModuleRegistry) -> Result<(), ModuleError> {
        let preloaded = ModuleDependencies::resolve(
            registry,
            &self.config.base_module,
            &self.config.main_module,
        )?;
        self.loaded.extend(preloaded);
        info!(
            "Module loader initialized from {} ({} modules pre-loaded)",
            self.config.main_module,
            self.loaded.len()
        );
        Ok(())
    }

    /// Loaded-set
    pub fn loaded(&self) -> &LoadedSet {
        &self.loaded
    }

    /// Whether `name` has been fully registered
    pub fn is_loaded(&self, name: &str) -> bool {
        self.loaded.contains(name)
    }

    /// Activate one or more modules
    ///
    /// Returns [`Loaded::Single`] when exactly one module was requested.
    ///
    /// # Arguments
    /// * `registry` - Declared modules
    /// * `providers` - Live providers the declarations are replayed against
    /// * `request` - A module name or a list of names
    /// * `config_callback` - Configuration phase for the requested modules
    ///   that get activated by this call; never applied to their dependencies
    pub fn load(
        &mut self,
        registry: &ModuleRegistry,
        providers: &mut ProviderMap,
        request: impl Into<LoadRequest>,
        config_callback: Option<&mut ConfigCallback<'_>>,
    ) -> Result<Loaded, ModuleError> {
        let names = request.into().into_names();
        debug!("Load requested: {:?}", names);

        let mut handles = self.register(registry, providers, &names, config_callback)?;
        if handles.len() == 1 {
            if let Some(handle) = handles.pop() {
                return Ok(Loaded::Single(handle));
            }
        }
        Ok(Loaded::Many(handles))
    }

    /// Activate `names` and run the initializers they queue
    ///
    /// Returns one handle per requested name, in request order, including
    /// modules that were already loaded.
    ///
    /// # Errors
    /// Activation errors are returned annotated with every enclosing module.
    /// When activation fails part way, initializers of the modules that did
    /// finish loading still run; if one of those fails as well, it is
    /// attached to the activation error as
    /// [`ModuleError::InitializersAborted`].
    pub fn register(
        &mut self,
        registry: &ModuleRegistry,
        providers: &mut ProviderMap,
        names: &[String],
        config_callback: Option<&mut ConfigCallback<'_>>,
    ) -> Result<Vec<ModuleHandle>, ModuleError> {
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let mut run_blocks = Vec::new();
        let mut path = Vec::new();
        let activated = self.register_modules(
            registry,
            providers,
            names,
            config_callback,
            &mut run_blocks,
            &mut path,
        );

        match activated {
            Ok(handles) => {
                self.run_initializers(registry, run_blocks)?;
                Ok(handles)
            }
            Err(e) => {
                // Modules that did finish loading still get their initializers
                run_blocks.retain(|pending| self.loaded.contains(&pending.module));
                match self.run_initializers(registry, run_blocks) {
                    Ok(()) => Err(e),
                    Err(initializer) => {
                        warn!("Initializer failed after aborted load: {}", initializer);
                        Err(ModuleError::InitializersAborted {
                            source: Box::new(e),
                            initializer: Box::new(initializer),
                        })
                    }
                }
            }
        }
    }

    /// Register `names` last-first, each after its unloaded dependencies
    ///
    /// `path` holds the modules whose activation is in progress; reaching one
    /// of them again is a dependency cycle.
    fn register_modules(
        &mut self,
        registry: &ModuleRegistry,
        providers: &mut ProviderMap,
        names: &[String],
        mut config_callback: Option<&mut ConfigCallback<'_>>,
        run_blocks: &mut Vec<PendingInitializer>,
        path: &mut Vec<String>,
    ) -> Result<Vec<ModuleHandle>, ModuleError> {
        let mut handles = Vec::with_capacity(names.len());

        for name in names.iter().rev() {
            let module = registry.get(name)?;
            handles.push(Arc::clone(&module));

            if self.loaded.contains(name) {
                debug!("Module {} already loaded", name);
                continue;
            }
            if path.contains(name) {
                let mut cycle = path.clone();
                cycle.push(name.clone());
                return Err(ModuleError::CyclicDependency(cycle.join(" -> ")));
            }

            // Dependencies first; each recursive call loads its own before itself
            path.push(name.clone());
            let dependencies =
                self.register_dependencies(registry, providers, &module, run_blocks, path);
            path.pop();
            dependencies.map_err(|e| ModuleError::registration(name.as_str(), e))?;

            self.activate(&module, providers, config_callback.as_deref_mut(), run_blocks)?;
        }

        handles.reverse();
        Ok(handles)
    }

    /// Load the base module and the declared dependencies of `module`
    ///
    /// Walks direct dependencies only, so a module reachable along many paths
    /// is visited once and then skipped as loaded.
    fn register_dependencies(
        &mut self,
        registry: &ModuleRegistry,
        providers: &mut ProviderMap,
        module: &ModuleHandle,
        run_blocks: &mut Vec<PendingInitializer>,
        path: &mut Vec<String>,
    ) -> Result<(), ModuleError> {
        let base = self.config.base_module.clone();
        let implicit_base = (module.name() != base).then_some(base);

        for dependency in implicit_base.iter().chain(module.dependencies()) {
            if self.loaded.contains(dependency) {
                continue;
            }
            self.register_modules(
                registry,
                providers,
                std::slice::from_ref(dependency),
                None,
                run_blocks,
                path,
            )?;
        }
        Ok(())
    }

    /// Configure, queue initializers, replay declarations, mark loaded
    fn activate(
        &mut self,
        module: &ModuleHandle,
        providers: &mut ProviderMap,
        config_callback: Option<&mut ConfigCallback<'_>>,
        run_blocks: &mut Vec<PendingInitializer>,
    ) -> Result<(), ModuleError> {
        let name = module.name();

        // Configuration phase, before anything of this module is replayed
        if let Some(callback) = config_callback {
            let mut phase = ConfigPhase {
                module: name,
                providers: &mut *providers,
            };
            callback(&mut phase).map_err(|e| ModuleError::registration(name, e))?;
        }

        // Queued now, run by the top-level call once everything is replayed
        run_blocks.extend(module.initializers().iter().map(|initializer| PendingInitializer {
            module: name.to_string(),
            initializer: Arc::clone(initializer),
        }));

        for declaration in module.declarations() {
            debug!(
                "Replaying {}.{} for module {}",
                declaration.provider, declaration.operation, name
            );
            providers.replay(declaration).map_err(|e| {
                warn!("Module {} failed to register: {}", name, e);
                ModuleError::registration(name, e)
            })?;
        }

        // Only a fully replayed queue marks the module loaded
        self.loaded.insert(name);
        info!(
            "Module {} loaded ({} declarations)",
            name,
            module.declarations().len()
        );
        Ok(())
    }

    /// Run initializers in collection order, each in a fresh context
    fn run_initializers(
        &self,
        registry: &ModuleRegistry,
        run_blocks: Vec<PendingInitializer>,
    ) -> Result<(), ModuleError> {
        for pending in run_blocks {
            let failed = |e: ModuleError| ModuleError::InitializerFailed {
                module: pending.module.clone(),
                source: Box::new(e),
            };

            let context = InitContext::build(registry, &self.config.base_module).map_err(failed)?;
            let span = info_span!("initializer", module = %pending.module, context = %context.id());
            let _enter = span.enter();
            (pending.initializer)(&context).map_err(failed)?;
        }
        Ok(())
    }
}

impl Default for ModuleLoader {
    fn default() -> Self {
        Self::new(LoaderConfig::default())
    }
}
