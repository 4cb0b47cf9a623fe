//! Ordered, deduplicated field plans.
//!
//! A plan is built once per type from its ancestors' plans (root to leaf) and
//! then its own declarations. Merging a name that is already present replaces
//! the descriptor in place; a new name is appended.
//!
//! ```
//! use orma_core::{Plan, PlanBuilder};
//!
//! let base: Plan<u8> = PlanBuilder::new().declare("a", 1).declare("b", 2).build();
//! let sub = PlanBuilder::new().inherit(&base).declare("b", 3).declare("c", 4).build();
//!
//! let order: Vec<_> = sub.iter().map(|(name, d)| (name, *d)).collect();
//! assert_eq!(order, [("a", 1), ("b", 3), ("c", 4)]);
//! ```

use hashbrown::HashMap;

/// Immutable ordered mapping `name → descriptor`.
#[derive(Debug, Clone)]
pub struct Plan<D> {
    entries: Vec<(String, D)>,
    index: HashMap<String, usize>,
}

impl<D> Default for Plan<D> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<D> Plan<D> {
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&D> {
        self.position(name).map(|i| &self.entries[i].1)
    }

    pub fn get_index(&self, index: usize) -> Option<(&str, &D)> {
        self.entries.get(index).map(|(name, d)| (name.as_str(), d))
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &D)> {
        self.entries.iter().map(|(name, d)| (name.as_str(), d))
    }

    pub fn names(&self) -> impl ExactSizeIterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }
}

impl<D: PartialEq> PartialEq for Plan<D> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

/// Accumulates declarations into a [`Plan`].
#[derive(Debug)]
pub struct PlanBuilder<D> {
    plan: Plan<D>,
}

impl<D> Default for PlanBuilder<D> {
    fn default() -> Self {
        Self {
            plan: Plan::default(),
        }
    }
}

impl<D: Clone> PlanBuilder<D> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges an ancestor's already-built plan.
    pub fn inherit(mut self, ancestor: &Plan<D>) -> Self {
        for (name, descriptor) in &ancestor.entries {
            self.merge(name.clone(), descriptor.clone());
        }
        self
    }

    /// Merges one of the current level's own declarations.
    pub fn declare(mut self, name: impl Into<String>, descriptor: D) -> Self {
        self.merge(name.into(), descriptor);
        self
    }

    pub fn merge(&mut self, name: String, descriptor: D) {
        match self.plan.index.get(&name) {
            Some(&i) => self.plan.entries[i].1 = descriptor,
            None => {
                self.plan.index.insert(name.clone(), self.plan.entries.len());
                self.plan.entries.push((name, descriptor));
            }
        }
    }

    pub fn build(self) -> Plan<D> {
        self.plan
    }
}
