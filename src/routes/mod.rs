//! Route activation
//!
//! A route table maps paths to a template and the modules that must be active
//! before the template may render. [`RouteResolver`] is the asynchronous
//! gate the router awaits: it loads a route's dependencies through the
//! (synchronous) module engine and reports the outcome.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::module::registry::ModuleHandle;
use crate::module::traits::ModuleError;
use crate::module::ModuleEngine;

/// Route entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDefinition {
    /// Template rendered once the route is active
    #[serde(alias = "templateUrl")]
    pub template_url: String,

    /// Modules loaded before activation
    #[serde(default)]
    pub dependencies: Vec<String>,
}

/// Static route table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteTable {
    /// Path -> route
    #[serde(default)]
    pub routes: BTreeMap<String, RouteDefinition>,

    /// Redirect target for unknown paths
    #[serde(default, alias = "defaultRoutePaths")]
    pub default_route: Option<String>,
}

impl RouteTable {
    /// Parse a route table from JSON
    pub fn from_json_str(contents: &str) -> Result<Self, RouteError> {
        serde_json::from_str(contents).map_err(|e| RouteError::Parse(e.to_string()))
    }

    /// Parse a route table from TOML
    pub fn from_toml_str(contents: &str) -> Result<Self, RouteError> {
        toml::from_str(contents).map_err(|e| RouteError::Parse(e.to_string()))
    }

    /// Route registered for `path`
    pub fn get(&self, path: &str) -> Option<&RouteDefinition> {
        self.routes.get(path)
    }
}

/// Route activation errors
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("No route for path {0}")]
    NotFound(String),

    #[error("Route dependencies failed to load: {0}")]
    Module(#[from] ModuleError),

    #[error("Invalid route table: {0}")]
    Parse(String),
}

/// Route ready to render
#[derive(Debug, Clone)]
pub struct RouteActivation {
    pub path: String,
    pub template_url: String,
    /// Handles of the route's dependencies, in declaration order
    pub modules: Vec<ModuleHandle>,
}

/// Outcome of resolving a path
#[derive(Debug, Clone)]
pub enum RouteOutcome {
    /// Dependencies are loaded; the route may render
    Activated(RouteActivation),
    /// Unknown path; the router should navigate to `to`
    Redirect { to: String },
}

/// Gate between the router and the module engine
pub struct RouteResolver {
    table: RouteTable,
    engine: Arc<Mutex<ModuleEngine>>,
}

impl RouteResolver {
    pub fn new(table: RouteTable, engine: Arc<Mutex<ModuleEngine>>) -> Self {
        Self { table, engine }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Load the dependencies of the route at `path`
    pub async fn resolve(&self, path: &str) -> Result<RouteOutcome, RouteError> {
        let Some(route) = self.table.get(path) else {
            return match &self.table.default_route {
                Some(to) => {
                    debug!("No route for {}, redirecting to {}", path, to);
                    Ok(RouteOutcome::Redirect { to: to.clone() })
                }
                None => Err(RouteError::NotFound(path.to_string())),
            };
        };

        let modules = if route.dependencies.is_empty() {
            Vec::new()
        } else {
            let mut engine = self.engine.lock().await;
            engine
                .load(route.dependencies.clone())
                .map_err(|e| {
                    warn!("Route {} failed to activate: {}", path, e);
                    e
                })?
                .into_handles()
        };

        info!("Route {} activated ({} modules)", path, modules.len());
        Ok(RouteOutcome::Activated(RouteActivation {
            path: path.to_string(),
            template_url: route.template_url.clone(),
            modules,
        }))
    }
}
