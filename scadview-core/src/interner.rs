//! Insert-if-absent value table
//!
//! Assigns dense indices to values in first-seen order. The OFF parser uses it
//! to build the color palette and the glTF exporter uses it to remap polyhedron
//! vertex indices to packed per-primitive indices.

use std::collections::HashMap;
use std::hash::Hash;

/// A growable table of distinct values with a value -> index lookup
#[derive(Debug, Clone)]
pub struct Interner<T> {
    values: Vec<T>,
    lookup: HashMap<T, usize>,
}

impl<T: Eq + Hash + Clone> Interner<T> {
    /// Create a new empty table
    pub fn new() -> Self {
        Self {
            values: Vec::new(),
            lookup: HashMap::new(),
        }
    }

    /// Return the index of `value`, appending it first if it is new
    pub fn intern(&mut self, value: T) -> usize {
        if let Some(&index) = self.lookup.get(&value) {
            return index;
        }
        let index = self.values.len();
        self.lookup.insert(value.clone(), index);
        self.values.push(value);
        index
    }

    /// Index of an already interned value
    pub fn get(&self, value: &T) -> Option<usize> {
        self.lookup.get(value).copied()
    }

    /// Number of distinct values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Distinct values in first-seen order
    pub fn as_slice(&self) -> &[T] {
        &self.values
    }

    /// Consume the table, keeping the values in first-seen order
    pub fn into_vec(self) -> Vec<T> {
        self.values
    }
}

impl<T: Eq + Hash + Clone> Default for Interner<T> {
    fn default() -> Self {
        Self::new()
    }
}
