//! Module system
//!
//! Modules are declared by the host with their dependencies, a queue of
//! declarations and a queue of initializers. Activating a module loads its
//! unloaded dependencies first, replays its declarations against the
//! capability providers, and runs its initializers in an isolated context.
//!
//! ## Architecture
//!
//! - **Registry**: declared modules, looked up by name; dependency closures
//! - **Loader**: loaded-set, activation order, declaration replay
//! - **Providers**: closed set of provider kinds with fixed operations
//! - **Context**: per-initializer capability view built from the base module

pub mod context;
pub mod loader;
pub mod manager;
pub mod providers;
pub mod registry;
pub mod traits;
pub mod validation;

pub use context::InitContext;
pub use loader::{ConfigCallback, ConfigPhase, LoadRequest, Loaded, LoadedSet, ModuleLoader};
pub use manager::ModuleEngine;
pub use providers::{CapabilityTable, ProviderMap, Registration, SharedCapabilityTable, TableProvider};
pub use registry::{Declaration, Initializer, ModuleDefinition, ModuleDependencies, ModuleHandle, ModuleRegistry};
pub use traits::{CapabilityProvider, ModuleError, ProviderKind};
