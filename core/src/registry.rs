use std::sync::Arc;

use hashbrown::HashMap;

use crate::error::{OrmaError, Result};

/// Anything that can be registered under a unique name.
pub trait Registered {
    fn type_name(&self) -> &str;
}

/// Append-only, name-keyed registry of built types.
///
/// A registry is an ordinary value: build it at start-up, then share it by
/// reference. Registering a name twice is rejected.
#[derive(Debug)]
pub struct Registry<T> {
    entries: Vec<Arc<T>>,
    index: HashMap<String, usize>,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T: Registered> Registry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, item: T) -> Result<Arc<T>> {
        let name = item.type_name();
        if self.index.contains_key(name) {
            return Err(OrmaError::DuplicateType(name.to_string()));
        }

        self.index.insert(name.to_string(), self.entries.len());
        let item = Arc::new(item);
        self.entries.push(Arc::clone(&item));
        Ok(item)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<T>> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|item| item.type_name())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<T>> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
