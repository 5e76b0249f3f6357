//! Insertion-ordered entry map for one collection.

use crate::Entry;
use std::collections::HashMap;

/// Entries of one collection, iterated in insertion order.
///
/// Overwriting an id keeps its original position.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Collection {
    entries: HashMap<String, Entry>,
    order: Vec<String>,
}

impl Collection {
    pub(crate) fn insert(&mut self, id: String, entry: Entry) {
        if !self.entries.contains_key(&id) {
            self.order.push(id.clone());
        }
        self.entries.insert(id, entry);
    }

    pub(crate) fn get(&self, id: &str) -> Option<&Entry> {
        self.entries.get(id)
    }

    pub(crate) fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub(crate) fn remove(&mut self, id: &str) -> Option<Entry> {
        let entry = self.entries.remove(id)?;
        if let Some(pos) = self.order.iter().position(|k| k == id) {
            self.order.remove(pos);
        }
        Some(entry)
    }

    pub(crate) fn ids(&self) -> impl Iterator<Item = &String> {
        self.order.iter()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&String, &Entry)> {
        self.order
            .iter()
            .filter_map(|id| self.entries.get(id).map(|entry| (id, entry)))
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
