//! Selection ledger for SelectView

use std::collections::HashSet;

use super::ItemId;

/// Ordered set of selected item ids.
///
/// Iteration follows selection order, which is the order bulk requests are
/// issued in.
#[derive(Debug, Clone, Default)]
pub struct SelectionSet {
    order: Vec<ItemId>,
    members: HashSet<ItemId>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.members.contains(id)
    }

    /// Add an id; returns false if it was already selected
    pub fn insert(&mut self, id: ItemId) -> bool {
        if self.members.insert(id.clone()) {
            self.order.push(id);
            true
        } else {
            false
        }
    }

    /// Remove an id; returns false if it was not selected
    pub fn remove(&mut self, id: &ItemId) -> bool {
        if self.members.remove(id) {
            self.order.retain(|i| i != id);
            true
        } else {
            false
        }
    }

    /// Flip membership; returns the new membership
    pub fn toggle(&mut self, id: &ItemId) -> bool {
        if self.remove(id) {
            false
        } else {
            self.insert(id.clone());
            true
        }
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.members.clear();
    }

    /// Keep only ids accepted by `keep`
    pub fn retain(&mut self, mut keep: impl FnMut(&ItemId) -> bool) {
        self.order.retain(|id| keep(id));
        self.members = self.order.iter().cloned().collect();
    }

    /// Selected ids in selection order
    pub fn iter(&self) -> impl Iterator<Item = &ItemId> {
        self.order.iter()
    }

    pub fn to_vec(&self) -> Vec<ItemId> {
        self.order.clone()
    }
}
