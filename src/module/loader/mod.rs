//! Module loading system
//!
//! Resolves, registers and initializes modules on demand.

pub mod loaded;
pub mod loader;
pub mod request;

pub use loaded::LoadedSet;
pub use loader::{ConfigCallback, ConfigPhase, ModuleLoader};
pub use request::{LoadRequest, Loaded};
