//! Load requests and their results

use crate::module::registry::ModuleHandle;

/// Modules requested by one `load` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadRequest {
    /// A single module name
    One(String),
    /// A list of module names
    Many(Vec<String>),
}

impl LoadRequest {
    /// Requested names, in input order
    pub fn into_names(self) -> Vec<String> {
        match self {
            LoadRequest::One(name) => vec![name],
            LoadRequest::Many(names) => names,
        }
    }
}

impl From<&str> for LoadRequest {
    fn from(name: &str) -> Self {
        LoadRequest::One(name.to_string())
    }
}

impl From<String> for LoadRequest {
    fn from(name: String) -> Self {
        LoadRequest::One(name)
    }
}

impl From<Vec<String>> for LoadRequest {
    fn from(names: Vec<String>) -> Self {
        LoadRequest::Many(names)
    }
}

impl From<&[String]> for LoadRequest {
    fn from(names: &[String]) -> Self {
        LoadRequest::Many(names.to_vec())
    }
}

impl From<Vec<&str>> for LoadRequest {
    fn from(names: Vec<&str>) -> Self {
        LoadRequest::Many(names.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for LoadRequest {
    fn from(names: &[&str]) -> Self {
        LoadRequest::Many(names.iter().map(|name| name.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for LoadRequest {
    fn from(names: [&str; N]) -> Self {
        LoadRequest::Many(names.iter().map(|name| name.to_string()).collect())
    }
}

/// Result of a `load` call
///
/// A request naming exactly one module yields [`Loaded::Single`], whatever
/// form the request took; anything else yields [`Loaded::Many`] in request
/// order.
#[derive(Debug, Clone)]
pub enum Loaded {
    Single(ModuleHandle),
    Many(Vec<ModuleHandle>),
}

impl Loaded {
    /// Handles, in request order
    pub fn handles(&self) -> &[ModuleHandle] {
        match self {
            Loaded::Single(handle) => std::slice::from_ref(handle),
            Loaded::Many(handles) => handles,
        }
    }

    /// Consume into handles, in request order
    pub fn into_handles(self) -> Vec<ModuleHandle> {
        match self {
            Loaded::Single(handle) => vec![handle],
            Loaded::Many(handles) => handles,
        }
    }

    /// The handle of a single-module load
    pub fn single(&self) -> Option<&ModuleHandle> {
        match self {
            Loaded::Single(handle) => Some(handle),
            Loaded::Many(_) => None,
        }
    }

    /// Names of the returned modules, in request order
    pub fn names(&self) -> Vec<&str> {
        self.handles().iter().map(|handle| handle.name()).collect()
    }
}
