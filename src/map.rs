// =====================================================================
// File: map.rs
//
//! A thin wrapper that picks between the B-tree and finger-tree engines
//! and forwards the operations they share. It contains no tree
//! algorithm of its own: callers who don't care which engine backs
//! their map can pick one constructor here and move on. Callers who
//! need finger-tree-specific operations (`push`, `pop`, `split`,
//! `concat`) should use [`crate::finger_tree::FingerTree`] directly.
// =====================================================================
use crate::btree::BTreeMap;
use crate::error::Result;
use crate::finger_tree::FingerTree;

/// An ordered map backed by either a persistent B-tree or a persistent
/// finger tree.
pub enum Map<K, V> {
    BTree(BTreeMap<K, V>),
    FingerTree(FingerTree<K, V>),
}

impl<K: Ord + Clone, V: Clone> Clone for Map<K, V> {
    fn clone(&self) -> Self {
        match self {
            Map::BTree(t) => Map::BTree(t.clone()),
            Map::FingerTree(t) => Map::FingerTree(t.clone()),
        }
    }
}

impl<K: Ord + Clone, V: Clone> Map<K, V> {
    /// A map backed by a B-tree of the given order.
    pub fn new_btree(order: usize) -> Self {
        Map::BTree(BTreeMap::new(order))
    }

    /// A map backed by a finger tree.
    pub fn new_finger_tree() -> Self {
        Map::FingerTree(FingerTree::empty())
    }

    pub fn size(&self) -> Result<usize> {
        match self {
            Map::BTree(t) => t.size(),
            Map::FingerTree(t) => t.size(),
        }
    }

    pub fn get(&self, key: &K) -> Result<Option<&V>> {
        match self {
            Map::BTree(t) => t.get(key),
            Map::FingerTree(t) => t.get(key),
        }
    }

    /// Inserts `key`/`value`, returning a new map and the previous value
    /// at `key` if one existed. `self` is left unchanged.
    pub fn insert(&self, key: K, value: V) -> Result<(Self, Option<V>)> {
        match self {
            Map::BTree(t) => {
                let (next, prev) = t.insert(key, value)?;
                Ok((Map::BTree(next), prev))
            }
            Map::FingerTree(t) => {
                let (next, prev) = t.insert(key, value)?;
                Ok((Map::FingerTree(next), prev))
            }
        }
    }

    /// Collects all entries in ascending key order.
    pub fn to_vec(&self) -> Result<Vec<(K, V)>> {
        match self {
            Map::BTree(t) => t.to_vec(),
            Map::FingerTree(t) => t.to_vec(),
        }
    }
}

impl<K: Ord + Clone + std::fmt::Debug, V: Clone + std::fmt::Debug> Map<K, V> {
    /// Writes a debug-only, indented dump of the underlying tree to
    /// `out`. Not a stable format.
    pub fn pretty_print(&self, out: &mut dyn std::io::Write, indent: usize) -> std::io::Result<()> {
        match self {
            Map::BTree(t) => t.pretty_print(out, indent),
            Map::FingerTree(t) => t.pretty_print(out, indent),
        }
    }
}
