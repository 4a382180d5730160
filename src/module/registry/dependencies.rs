//! Module dependency closure
//!
//! Computes the ordered set of modules a module transitively requires.

use std::collections::HashSet;
use tracing::debug;

use crate::module::registry::ModuleRegistry;
use crate::module::traits::ModuleError;

/// Dependency resolver
pub struct ModuleDependencies;

impl ModuleDependencies {
    /// Dependency closure of `module`
    ///
    /// Starts with `base_module` (implicitly required by every module, and not
    /// itself traversed), then lists `module` and its dependencies in
    /// depth-first pre-order. A module reachable along several paths appears
    /// once per path; callers deduplicate.
    ///
    /// Re-entering a module that is still on the traversal path is reported as
    /// [`ModuleError::CyclicDependency`].
    pub fn closure(
        registry: &ModuleRegistry,
        base_module: &str,
        module: &str,
    ) -> Result<Vec<String>, ModuleError> {
        let mut order = vec![base_module.to_string()];
        let mut path = Vec::new();
        Self::visit(registry, module, &mut path, &mut order)?;

        debug!("Dependency closure of {}: {:?}", module, order);
        Ok(order)
    }

    /// Deduplicated dependency closure of `module`
    ///
    /// Same order as [`Self::closure`] with every repeated name dropped. A
    /// module's dependencies are walked only the first time it is reached, so
    /// graphs with many paths to the same module stay linear in size.
    ///
    /// # Arguments
    /// * `registry` - Modules to resolve names against
    /// * `base_module` - Implicit first entry, not traversed
    /// * `module` - Module whose requirements are resolved
    ///
    /// # Example
    /// ```rust
    /// use module_loader::module::ModuleDependencies;
    /// use module_loader::{ModuleDefinition, ModuleRegistry};
    ///
    /// let mut registry = ModuleRegistry::new();
    /// registry.insert(ModuleDefinition::new("a").requires(["b", "c"])).unwrap();
    /// registry.insert(ModuleDefinition::new("b").requires(["c"])).unwrap();
    /// registry.insert(ModuleDefinition::new("c")).unwrap();
    ///
    /// let order = ModuleDependencies::resolve(&registry, "core", "a").unwrap();
    /// assert_eq!(order, vec!["core", "a", "b", "c"]);
    /// ```
    pub fn resolve(
        registry: &ModuleRegistry,
        base_module: &str,
        module: &str,
    ) -> Result<Vec<String>, ModuleError> {
        let mut walked = Vec::new();
        let mut seen = HashSet::new();
        let mut path = Vec::new();
        Self::visit_once(registry, module, &mut path, &mut seen, &mut walked)?;

        // The base module keeps its leading slot even when the walk reaches it
        let mut order = vec![base_module.to_string()];
        order.extend(walked.into_iter().filter(|name| name != base_module));

        debug!("Resolved {} modules for {}", order.len(), module);
        Ok(order)
    }

    fn visit_once(
        registry: &ModuleRegistry,
        name: &str,
        path: &mut Vec<String>,
        seen: &mut HashSet<String>,
        order: &mut Vec<String>,
    ) -> Result<(), ModuleError> {
        // Path check first: a module still being walked is a cycle, not a repeat
        if path.iter().any(|entry| entry == name) {
            path.push(name.to_string());
            return Err(ModuleError::CyclicDependency(path.join(" -> ")));
        }
        if !seen.insert(name.to_string()) {
            return Ok(());
        }

        let module = registry.get(name)?;
        order.push(name.to_string());

        path.push(name.to_string());
        for dependency in module.dependencies() {
            Self::visit_once(registry, dependency, path, seen, order)?;
        }
        path.pop();

        Ok(())
    }

    fn visit(
        registry: &ModuleRegistry,
        name: &str,
        path: &mut Vec<String>,
        order: &mut Vec<String>,
    ) -> Result<(), ModuleError> {
        if path.iter().any(|entry| entry == name) {
            path.push(name.to_string());
            return Err(ModuleError::CyclicDependency(path.join(" -> ")));
        }

        let module = registry.get(name)?;
        order.push(name.to_string());

        path.push(name.to_string());
        for dependency in module.dependencies() {
            Self::visit(registry, dependency, path, order)?;
        }
        path.pop();

        Ok(())
    }
}
