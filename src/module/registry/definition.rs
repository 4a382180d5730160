//! Module definitions
//!
//! A definition is what the host declares for a module: its dependencies,
//! the declarations to replay on activation and the initializers to run
//! afterwards.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::module::context::InitContext;
use crate::module::traits::{ModuleError, ProviderKind};

/// Declaration record: a provider kind, one of its operations, and opaque
/// arguments forwarded verbatim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Declaration {
    /// Provider kind wire name (kept as a string; unknown kinds fail on replay)
    pub provider: String,
    /// Operation to invoke on the provider
    pub operation: String,
    /// Arguments, in order
    #[serde(default)]
    pub arguments: Vec<Value>,
}

impl Declaration {
    /// Create a declaration record
    pub fn new(
        provider: impl Into<String>,
        operation: impl Into<String>,
        arguments: Vec<Value>,
    ) -> Self {
        Self {
            provider: provider.into(),
            operation: operation.into(),
            arguments,
        }
    }

    fn named(kind: ProviderKind, name: impl Into<String>, body: Value) -> Self {
        Self::new(
            kind.as_str(),
            kind.operations()[0],
            vec![Value::String(name.into()), body],
        )
    }
}

/// Zero-argument initializer run once after activation
pub type Initializer = Arc<dyn Fn(&InitContext) -> Result<(), ModuleError> + Send + Sync>;

/// Handle to a registered module
pub type ModuleHandle = Arc<ModuleDefinition>;

/// Module definition
#[derive(Clone)]
pub struct ModuleDefinition {
    name: String,
    requires: Vec<String>,
    declarations: Vec<Declaration>,
    initializers: Vec<Initializer>,
}

impl ModuleDefinition {
    /// Start a definition with no dependencies and empty queues
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            requires: Vec::new(),
            declarations: Vec::new(),
            initializers: Vec::new(),
        }
    }

    /// Append dependencies, keeping declaration order
    pub fn requires<I, S>(mut self, modules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.requires.extend(modules.into_iter().map(Into::into));
        self
    }

    /// Queue a raw declaration record
    pub fn declare(mut self, declaration: Declaration) -> Self {
        self.declarations.push(declaration);
        self
    }

    pub fn controller(self, name: impl Into<String>, body: Value) -> Self {
        self.declare(Declaration::named(ProviderKind::Controller, name, body))
    }

    pub fn directive(self, name: impl Into<String>, body: Value) -> Self {
        self.declare(Declaration::named(ProviderKind::Directive, name, body))
    }

    pub fn filter(self, name: impl Into<String>, body: Value) -> Self {
        self.declare(Declaration::named(ProviderKind::Filter, name, body))
    }

    pub fn factory(self, name: impl Into<String>, body: Value) -> Self {
        self.declare(Declaration::named(ProviderKind::Factory, name, body))
    }

    pub fn service(self, name: impl Into<String>, body: Value) -> Self {
        self.declare(Declaration::named(ProviderKind::Service, name, body))
    }

    pub fn value(self, name: impl Into<String>, value: Value) -> Self {
        self.declare(Declaration::named(ProviderKind::Value, name, value))
    }

    pub fn constant(self, name: impl Into<String>, value: Value) -> Self {
        self.declare(Declaration::named(ProviderKind::Constant, name, value))
    }

    /// Queue an initializer
    pub fn run<F>(mut self, initializer: F) -> Self
    where
        F: Fn(&InitContext) -> Result<(), ModuleError> + Send + Sync + 'static,
    {
        self.initializers.push(Arc::new(initializer));
        self
    }

    /// Module name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared dependencies, in declaration order
    pub fn dependencies(&self) -> &[String] {
        &self.requires
    }

    /// Declaration queue
    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    /// Initializer queue
    pub fn initializers(&self) -> &[Initializer] {
        &self.initializers
    }
}

impl fmt::Debug for ModuleDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleDefinition")
            .field("name", &self.name)
            .field("requires", &self.requires)
            .field("declarations", &self.declarations)
            .field("initializers", &self.initializers.len())
            .finish()
    }
}
