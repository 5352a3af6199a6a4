//! Reuse registry
//!
//! Maps `(owner, id)` keys to the node currently occupying that slot. At most
//! one node lives under a key; the scheduler stops and drops the previous
//! occupant whenever a new one is requested.

use crate::scheduler::NodeId;
use rustc_hash::FxHashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// Anything usable as an owner identity
pub trait OwnerKey: Copy + Eq + Hash + Debug + 'static {}

impl<K: Copy + Eq + Hash + Debug + 'static> OwnerKey for K {}

/// `(owner, id) -> NodeId` lookup with per-owner grouping
#[derive(Debug)]
pub struct ReuseRegistry<O: OwnerKey> {
    owners: FxHashMap<O, FxHashMap<String, NodeId>>,
}

impl<O: OwnerKey> ReuseRegistry<O> {
    pub fn new() -> Self {
        Self {
            owners: FxHashMap::default(),
        }
    }

    pub fn get(&self, owner: O, id: &str) -> Option<NodeId> {
        self.owners.get(&owner)?.get(id).copied()
    }

    pub fn contains(&self, owner: O, id: &str) -> bool {
        self.get(owner, id).is_some()
    }

    /// Store `node` under the key, returning the previous occupant
    pub fn insert(&mut self, owner: O, id: &str, node: NodeId) -> Option<NodeId> {
        self.owners
            .entry(owner)
            .or_default()
            .insert(id.to_owned(), node)
    }

    pub fn remove(&mut self, owner: O, id: &str) -> Option<NodeId> {
        let slots = self.owners.get_mut(&owner)?;
        let node = slots.remove(id);
        if slots.is_empty() {
            self.owners.remove(&owner);
        }
        node
    }

    /// Remove every key of `owner`, returning the nodes that held them
    pub fn take_owner(&mut self, owner: O) -> Vec<NodeId> {
        self.owners
            .remove(&owner)
            .map(|slots| slots.into_values().collect())
            .unwrap_or_default()
    }

    /// Ids registered for `owner`
    pub fn ids(&self, owner: O) -> impl Iterator<Item = &str> + '_ {
        self.owners
            .get(&owner)
            .into_iter()
            .flat_map(|slots| slots.keys().map(String::as_str))
    }

    pub fn owner_count(&self) -> usize {
        self.owners.len()
    }

    /// Total number of keys
    pub fn len(&self) -> usize {
        self.owners.values().map(|slots| slots.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}

impl<O: OwnerKey> Default for ReuseRegistry<O> {
    fn default() -> Self {
        Self::new()
    }
}
