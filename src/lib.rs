//! Module Loader - runtime module activation and dependency registration
//!
//! An application is composed of independently declared modules. Each module
//! names the modules it depends on and queues declarations (controllers,
//! directives, filters, factories, services, values, constants) plus
//! initializers. This crate activates modules on demand:
//!
//! 1. computes the dependency closure of each requested module,
//! 2. activates unloaded dependencies first, leaf-most first,
//! 3. replays each module's declarations against the capability providers,
//! 4. marks it loaded so it is never replayed again,
//! 5. runs every queued initializer once, in an isolated base context.
//!
//! ## Example
//!
//! ```rust
//! use module_loader::{LoaderConfig, ModuleDefinition, ModuleEngine, ModuleRegistry, ProviderKind};
//! use serde_json::json;
//!
//! let mut registry = ModuleRegistry::new();
//! registry.insert(ModuleDefinition::new("core"))?;
//! registry.insert(ModuleDefinition::new("app"))?;
//! registry.insert(
//!     ModuleDefinition::new("external")
//!         .controller("ExternalController", json!({"heading": "External"})),
//! )?;
//!
//! let mut engine = ModuleEngine::new(registry, LoaderConfig::default())?;
//! engine.load("external")?;
//!
//! assert!(engine.is_loaded("external"));
//! assert!(engine
//!     .capabilities()
//!     .read()
//!     .contains(ProviderKind::Controller, "ExternalController"));
//! # Ok::<(), module_loader::ModuleError>(())
//! ```

pub mod config;
pub mod module;
pub mod routes;
pub mod utils;

pub use config::{ConfigureSettings, EngineConfig, LoaderConfig, LoggingConfig};
pub use module::{
    CapabilityProvider, CapabilityTable, ConfigPhase, Declaration, InitContext, LoadRequest,
    Loaded, ModuleDefinition, ModuleEngine, ModuleError, ModuleHandle, ModuleLoader,
    ModuleRegistry, ProviderKind, ProviderMap, Registration,
};
pub use routes::{RouteActivation, RouteDefinition, RouteError, RouteOutcome, RouteResolver, RouteTable};
