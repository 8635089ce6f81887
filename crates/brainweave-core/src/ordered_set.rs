//! Insertion-ordered set used for reference accumulation.
//!
//! Outbound and inbound reference lists preserve first-occurrence order
//! while rejecting duplicates; membership checks are constant time.

use std::collections::HashSet;
use std::hash::Hash;

/// A set that remembers the order in which values were first inserted.
#[derive(Debug, Clone, Default)]
pub struct OrderedSet<T: Eq + Hash + Clone> {
    items: Vec<T>,
    seen: HashSet<T>,
}

impl<T: Eq + Hash + Clone> OrderedSet<T> {
    /// Create an empty set.
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            seen: HashSet::new(),
        }
    }

    /// Insert a value, keeping the first occurrence. Returns true if the
    /// value was not already present.
    pub fn insert(&mut self, value: T) -> bool {
        if self.seen.contains(&value) {
            return false;
        }
        self.seen.insert(value.clone());
        self.items.push(value);
        true
    }

    /// Whether the value has been inserted.
    pub fn contains(&self, value: &T) -> bool {
        self.seen.contains(value)
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    /// Number of distinct values.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Consume the set, yielding values in insertion order.
    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<T: Eq + Hash + Clone> FromIterator<T> for OrderedSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        for value in iter {
            set.insert(value);
        }
        set
    }
}
