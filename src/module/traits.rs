//! Module system traits and interfaces
//!
//! Defines the provider kinds, the capability provider trait the loader
//! replays declarations against, and the module error type.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Kind of capability provider a declaration is replayed against
///
/// The set is closed: a declaration naming any other kind is rejected with
/// [`ModuleError::UnsupportedProvider`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ProviderKind {
    /// Controllers
    #[serde(rename = "controller-provider")]
    Controller,
    /// Directives
    #[serde(rename = "directive-provider")]
    Directive,
    /// Filters
    #[serde(rename = "filter-provider")]
    Filter,
    /// Factories
    #[serde(rename = "factory-provider")]
    Factory,
    /// Services
    #[serde(rename = "service-provider")]
    Service,
    /// Plain values
    #[serde(rename = "value-provider")]
    Value,
    /// Constants
    #[serde(rename = "constant-provider")]
    Constant,
}

impl ProviderKind {
    /// Every provider kind, in declaration order
    pub const ALL: [ProviderKind; 7] = [
        ProviderKind::Controller,
        ProviderKind::Directive,
        ProviderKind::Filter,
        ProviderKind::Factory,
        ProviderKind::Service,
        ProviderKind::Value,
        ProviderKind::Constant,
    ];

    /// Wire name of the kind as it appears in declaration records
    pub fn as_str(self) -> &'static str {
        match self {
            ProviderKind::Controller => "controller-provider",
            ProviderKind::Directive => "directive-provider",
            ProviderKind::Filter => "filter-provider",
            ProviderKind::Factory => "factory-provider",
            ProviderKind::Service => "service-provider",
            ProviderKind::Value => "value-provider",
            ProviderKind::Constant => "constant-provider",
        }
    }

    /// Fixed operation interface exposed by providers of this kind
    pub fn operations(self) -> &'static [&'static str] {
        match self {
            ProviderKind::Controller => &["register"],
            ProviderKind::Directive => &["directive"],
            ProviderKind::Filter => &["register"],
            ProviderKind::Factory => &["factory"],
            ProviderKind::Service => &["service"],
            ProviderKind::Value => &["value"],
            ProviderKind::Constant => &["constant"],
        }
    }

    /// Whether `operation` belongs to this kind's interface
    #[inline]
    pub fn supports(self, operation: &str) -> bool {
        self.operations().contains(&operation)
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = ModuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProviderKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ModuleError::UnsupportedProvider(s.to_string()))
    }
}

/// Capability provider trait
///
/// A provider performs the side-effecting registration for one declaration
/// kind into the live application. The loader has already checked that
/// `operation` is part of [`ProviderKind::operations`] for [`Self::kind`]
/// before calling [`Self::invoke`].
pub trait CapabilityProvider: Send + Sync {
    /// Kind this provider registers
    fn kind(&self) -> ProviderKind;

    /// Perform `operation` with the declaration's arguments, in order
    fn invoke(&mut self, operation: &str, arguments: &[Value]) -> Result<(), ModuleError>;
}

/// Module system errors
#[derive(Debug, Error)]
pub enum ModuleError {
    #[error("unsupported provider {0}")]
    UnsupportedProvider(String),

    #[error("provider {provider} has no operation {operation}")]
    UnsupportedOperation {
        provider: ProviderKind,
        operation: String,
    },

    #[error("Invalid declaration: {0}")]
    InvalidDeclaration(String),

    #[error("Module not found: {0}")]
    ModuleNotFound(String),

    #[error("Invalid module name: {0}")]
    InvalidModuleName(String),

    #[error("Circular dependency detected: {0}")]
    CyclicDependency(String),

    /// Failure while activating `module`; wrapped once per enclosing frame
    #[error("{source} from {module}")]
    Registration {
        module: String,
        #[source]
        source: Box<ModuleError>,
    },

    #[error("Initializer of module {module} failed: {source}")]
    InitializerFailed {
        module: String,
        #[source]
        source: Box<ModuleError>,
    },

    /// Activation failed, and an initializer queued before the failure
    /// failed too
    #[error("{source} (initializer also failed: {initializer})")]
    InitializersAborted {
        #[source]
        source: Box<ModuleError>,
        initializer: Box<ModuleError>,
    },

    #[error("Module operation failed: {0}")]
    OperationError(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ModuleError {
    /// Annotate an error with the module whose activation it interrupted
    pub fn registration(module: impl Into<String>, source: ModuleError) -> Self {
        ModuleError::Registration {
            module: module.into(),
            source: Box::new(source),
        }
    }

    /// Innermost error, with every module annotation peeled off
    pub fn root_cause(&self) -> &ModuleError {
        match self {
            ModuleError::Registration { source, .. }
            | ModuleError::InitializerFailed { source, .. }
            | ModuleError::InitializersAborted { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Modules named by the annotation chain, innermost first
    pub fn module_trace(&self) -> Vec<&str> {
        let mut trace = Vec::new();
        let mut current = self;
        while let ModuleError::Registration { module, source } = current {
            trace.push(module.as_str());
            current = source.as_ref();
        }
        trace.reverse();
        trace
    }
}

impl From<toml::de::Error> for ModuleError {
    fn from(e: toml::de::Error) -> Self {
        ModuleError::Config(e.to_string())
    }
}
