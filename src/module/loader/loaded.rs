//! Loaded-set bookkeeping

use std::collections::HashSet;

/// Names of modules whose declarations have been fully replayed
///
/// Grows monotonically; there is no removal.
#[derive(Debug, Clone, Default)]
pub struct LoadedSet {
    order: Vec<String>,
    members: HashSet<String>,
}

impl LoadedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `name` is loaded
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.members.contains(name)
    }

    /// Mark `name` loaded; returns false if it already was
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.members.contains(&name) {
            return false;
        }
        self.members.insert(name.clone());
        self.order.push(name);
        true
    }

    /// Loaded names in the order they were marked
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl<S: Into<String>> Extend<S> for LoadedSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, names: I) {
        for name in names {
            self.insert(name);
        }
    }
}
