//! Capability providers
//!
//! [`ProviderMap`] is the capability-provider map the loader replays
//! declarations against. The standard providers write every registration into
//! a shared [`CapabilityTable`], which stands in for the live application's
//! registered controllers, directives, services and so on.

use parking_lot::RwLock;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::module::registry::Declaration;
use crate::module::traits::{CapabilityProvider, ModuleError, ProviderKind};

/// One registration applied through a provider
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Registration {
    /// Provider kind that performed the registration
    pub kind: ProviderKind,
    /// Registered capability name (first declaration argument)
    pub name: String,
    /// Provider operation that was invoked
    pub operation: String,
    /// Remaining declaration arguments, forwarded verbatim
    pub payload: Vec<Value>,
}

/// Registered capabilities, in application order and by key
///
/// Registering the same `(kind, name)` twice keeps both entries in the log;
/// lookups return the latest one.
#[derive(Debug, Default)]
pub struct CapabilityTable {
    log: Vec<Registration>,
    latest: HashMap<(ProviderKind, String), usize>,
}

/// Capability table shared between the host and its providers
pub type SharedCapabilityTable = Arc<RwLock<CapabilityTable>>;

impl CapabilityTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty table ready to be shared with providers
    pub fn shared() -> SharedCapabilityTable {
        Arc::new(RwLock::new(Self::new()))
    }

    /// Record a registration
    pub fn register(&mut self, registration: Registration) {
        let key = (registration.kind, registration.name.clone());
        if self.latest.contains_key(&key) {
            debug!(
                "Overriding {} registration: {}",
                registration.kind, registration.name
            );
        }
        self.latest.insert(key, self.log.len());
        self.log.push(registration);
    }

    /// Latest registration for `name` under `kind`
    pub fn get(&self, kind: ProviderKind, name: &str) -> Option<&Registration> {
        self.latest
            .get(&(kind, name.to_string()))
            .map(|&index| &self.log[index])
    }

    /// Whether `name` is registered under `kind`
    pub fn contains(&self, kind: ProviderKind, name: &str) -> bool {
        self.latest.contains_key(&(kind, name.to_string()))
    }

    /// Every registration in the order it was applied
    pub fn registrations(&self) -> &[Registration] {
        &self.log
    }

    /// Names registered under `kind`, in first-registration order
    pub fn names(&self, kind: ProviderKind) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for registration in self.log.iter().filter(|r| r.kind == kind) {
            if !names.contains(&registration.name.as_str()) {
                names.push(&registration.name);
            }
        }
        names
    }

    /// Number of registrations applied (overrides included)
    pub fn len(&self) -> usize {
        self.log.len()
    }

    /// Whether nothing has been registered
    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }
}

/// Standard provider writing into a [`CapabilityTable`]
///
/// Expects the capability name as first argument; everything after it is the
/// opaque payload.
pub struct TableProvider {
    kind: ProviderKind,
    table: SharedCapabilityTable,
}

impl TableProvider {
    /// Create a provider of `kind` backed by `table`
    pub fn new(kind: ProviderKind, table: SharedCapabilityTable) -> Self {
        Self { kind, table }
    }
}

impl CapabilityProvider for TableProvider {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    fn invoke(&mut self, operation: &str, arguments: &[Value]) -> Result<(), ModuleError> {
        let name = arguments
            .first()
            .and_then(Value::as_str)
            .ok_or_else(|| {
                ModuleError::InvalidDeclaration(format!(
                    "{}.{} expects a capability name as its first argument",
                    self.kind, operation
                ))
            })?
            .to_string();

        debug!("{} {} {}", self.kind, operation, name);
        self.table.write().register(Registration {
            kind: self.kind,
            name,
            operation: operation.to_string(),
            payload: arguments[1..].to_vec(),
        });
        Ok(())
    }
}

/// Capability-provider map
pub struct ProviderMap {
    providers: HashMap<ProviderKind, Box<dyn CapabilityProvider>>,
}

impl ProviderMap {
    /// Create an empty map; every declaration replayed against it fails
    pub fn new() -> Self {
        Self {
            providers: HashMap::new(),
        }
    }

    /// Bind every provider kind to a [`TableProvider`] over `table`
    pub fn standard(table: &SharedCapabilityTable) -> Self {
        let mut map = Self::new();
        for kind in ProviderKind::ALL {
            map.insert(Box::new(TableProvider::new(kind, Arc::clone(table))));
        }
        map
    }

    /// Install a provider under its own kind, returning the one it replaces
    pub fn insert(
        &mut self,
        provider: Box<dyn CapabilityProvider>,
    ) -> Option<Box<dyn CapabilityProvider>> {
        self.providers.insert(provider.kind(), provider)
    }

    /// Remove the provider bound to `kind`
    pub fn remove(&mut self, kind: ProviderKind) -> Option<Box<dyn CapabilityProvider>> {
        self.providers.remove(&kind)
    }

    /// Whether a provider is bound to `kind`
    pub fn contains(&self, kind: ProviderKind) -> bool {
        self.providers.contains_key(&kind)
    }

    /// Bound kinds, sorted
    pub fn kinds(&self) -> Vec<ProviderKind> {
        let mut kinds: Vec<ProviderKind> = self.providers.keys().copied().collect();
        kinds.sort();
        kinds
    }

    /// Invoke `operation` on the provider bound to `kind`
    ///
    /// # Errors
    /// * [`ModuleError::UnsupportedOperation`] - `operation` is outside the kind's interface
    /// * [`ModuleError::UnsupportedProvider`] - nothing is bound to `kind`
    /// * whatever the provider itself returns
    pub fn invoke(
        &mut self,
        kind: ProviderKind,
        operation: &str,
        arguments: &[Value],
    ) -> Result<(), ModuleError> {
        if !kind.supports(operation) {
            return Err(ModuleError::UnsupportedOperation {
                provider: kind,
                operation: operation.to_string(),
            });
        }
        let provider = self
            .providers
            .get_mut(&kind)
            .ok_or_else(|| ModuleError::UnsupportedProvider(kind.as_str().to_string()))?;
        provider.invoke(operation, arguments)
    }

    /// Replay one declaration record
    pub fn replay(&mut self, declaration: &Declaration) -> Result<(), ModuleError> {
        // Unknown kind strings fail here with the name as written
        let kind: ProviderKind = declaration.provider.parse()?;
        self.invoke(kind, &declaration.operation, &declaration.arguments)
    }
}

impl Default for ProviderMap {
    fn default() -> Self {
        Self::new()
    }
}
