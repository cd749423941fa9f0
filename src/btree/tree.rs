// =====================================================================
// File: btree/tree.rs
//
//! The persistent B-tree container.
//!
//! Every mutating operation takes `&self` and returns a new container;
//! the receiver is left untouched unless it is the unique owner of its
//! root, in which case `Arc::make_mut` elides the clone.
// =====================================================================
use std::sync::Arc;

use crate::btree::node::{child_index, Deep, Leaf, Node};
use crate::error::{Error, Result};
use crate::util::midpoint;

/// A persistent, copy-on-write ordered map backed by a B-tree of order N.
#[derive(Debug)]
pub struct BTreeMap<K, V> {
    repr: Option<Repr<K, V>>,
}

#[derive(Debug, Clone)]
struct Repr<K, V> {
    order: usize,
    root: Arc<Node<K, V>>,
}

enum InsertOutcome<K, V> {
    Inserted(Arc<Node<K, V>>),
    Split(Arc<Node<K, V>>, Arc<Node<K, V>>),
}

impl<K, V> Default for BTreeMap<K, V> {
    /// Produces an uninitialised handle (see [`Error::UninitializedHandle`]).
    /// Use [`BTreeMap::new`] to get a usable, empty tree.
    fn default() -> Self {
        Self { repr: None }
    }
}

impl<K: Clone, V: Clone> Clone for BTreeMap<K, V> {
    fn clone(&self) -> Self {
        Self {
            repr: self.repr.clone(),
        }
    }
}

impl<K: Ord + Clone, V: Clone> BTreeMap<K, V> {
    /// Creates an empty tree with the given order (maximum N-1 keys per
    /// leaf, maximum N children per internal node).
    pub fn new(order: usize) -> Self {
        assert!(order >= 3, "B-tree order must be >= 3");
        Self {
            repr: Some(Repr {
                order,
                root: Node::empty_leaf(),
            }),
        }
    }

    fn repr(&self) -> Result<&Repr<K, V>> {
        self.repr.as_ref().ok_or(Error::UninitializedHandle)
    }

    /// Number of key-value pairs in the tree, in O(1).
    pub fn size(&self) -> Result<usize> {
        Ok(self.repr()?.root.size())
    }

    /// Looks up the value stored at `key`, if any.
    pub fn get(&self, key: &K) -> Result<Option<&V>> {
        Ok(self.repr()?.root.get(key))
    }

    /// Collects all entries in ascending key order.
    pub fn to_vec(&self) -> Result<Vec<(K, V)>> {
        let mut out = Vec::with_capacity(self.size()?);
        self.repr()?.root.collect_into(&mut out);
        Ok(out)
    }

    /// Inserts `key`/`value`, returning a new tree and the previous value
    /// at `key` if one existed. `self` is left unchanged.
    pub fn insert(&self, key: K, value: V) -> Result<(Self, Option<V>)> {
        let repr = self.repr()?;
        let order = repr.order;
        let (outcome, old) = insert_into(repr.root.clone(), order, key, value);
        let root = match outcome {
            InsertOutcome::Inserted(node) => node,
            InsertOutcome::Split(left, right) => {
                let keys = vec![left.measure().clone(), right.measure().clone()];
                let size = left.size() + right.size();
                Arc::new(Node::Deep(Deep {
                    keys,
                    children: vec![left, right],
                    size,
                }))
            }
        };
        Ok((Self { repr: Some(Repr { order, root }) }, old))
    }

    /// Builds a tree from a sequence of pairs, inserted left to right
    /// (later duplicates of a key overwrite earlier ones).
    pub fn from_pairs(order: usize, pairs: impl IntoIterator<Item = (K, V)>) -> Result<Self> {
        let mut tree = Self::new(order);
        for (k, v) in pairs {
            let (next, _) = tree.insert(k, v)?;
            tree = next;
        }
        Ok(tree)
    }
}

impl<K: Ord + Clone + std::fmt::Debug, V: Clone + std::fmt::Debug> BTreeMap<K, V> {
    /// Writes a debug-only, indented dump of the tree's structure to
    /// `out`. Not a stable format; for inspection during development.
    pub fn pretty_print(&self, out: &mut dyn std::io::Write, indent: usize) -> std::io::Result<()> {
        match &self.repr {
            None => writeln!(out, "{}<uninitialised>", "  ".repeat(indent)),
            Some(repr) => crate::btree::node::show(&repr.root, out, indent),
        }
    }
}

#[cfg(test)]
impl<K: Ord + Clone + std::fmt::Debug, V: Clone> BTreeMap<K, V> {
    pub(crate) fn check_invariants(&self) {
        let repr = self.repr.as_ref().expect("initialised handle");
        repr.root.check_invariants(repr.order, true);
    }
}

/// Recursively inserts `key`/`value` under `node`, cloning only the spine
/// that is not uniquely owned.
fn insert_into<K, V>(
    mut node: Arc<Node<K, V>>,
    order: usize,
    key: K,
    value: V,
) -> (InsertOutcome<K, V>, Option<V>)
where
    K: Ord + Clone,
    V: Clone,
{
    let inner = Arc::make_mut(&mut node);
    match inner {
        Node::Leaf(leaf) => match leaf.pairs.binary_search_by(|(k, _)| k.cmp(&key)) {
            Ok(i) => {
                let old = std::mem::replace(&mut leaf.pairs[i].1, value);
                (InsertOutcome::Inserted(node), Some(old))
            }
            Err(i) => {
                leaf.pairs.insert(i, (key, value));
                if leaf.pairs.len() > order - 1 {
                    let mid = midpoint(leaf.pairs.len());
                    let right_pairs = leaf.pairs.split_off(mid);
                    let left_pairs = std::mem::take(&mut leaf.pairs);
                    let left = Arc::new(Node::Leaf(Leaf { pairs: left_pairs }));
                    let right = Arc::new(Node::Leaf(Leaf { pairs: right_pairs }));
                    (InsertOutcome::Split(left, right), None)
                } else {
                    (InsertOutcome::Inserted(node), None)
                }
            }
        },
        Node::Deep(deep) => {
            let idx = child_index(&deep.keys, &key);
            let child = deep.children[idx].clone();
            let old_child_size = child.size();
            let (outcome, old_value) = insert_into(child, order, key, value);
            match outcome {
                InsertOutcome::Inserted(new_child) => {
                    deep.size = deep.size - old_child_size + new_child.size();
                    deep.keys[idx] = new_child.measure().clone();
                    deep.children[idx] = new_child;
                    (InsertOutcome::Inserted(node), old_value)
                }
                InsertOutcome::Split(left, right) => {
                    deep.size = deep.size - old_child_size + left.size() + right.size();
                    deep.keys[idx] = right.measure().clone();
                    deep.children[idx] = right;
                    deep.keys.insert(idx, left.measure().clone());
                    deep.children.insert(idx, left);

                    if deep.children.len() > order {
                        let mid = midpoint(deep.children.len());
                        let right_children = deep.children.split_off(mid);
                        let right_keys = deep.keys.split_off(mid);
                        let left_children = std::mem::take(&mut deep.children);
                        let left_keys = std::mem::take(&mut deep.keys);
                        let left_size: usize = left_children.iter().map(|c| c.size()).sum();
                        let right_size: usize = right_children.iter().map(|c| c.size()).sum();
                        let left_node = Arc::new(Node::Deep(Deep {
                            keys: left_keys,
                            children: left_children,
                            size: left_size,
                        }));
                        let right_node = Arc::new(Node::Deep(Deep {
                            keys: right_keys,
                            children: right_children,
                            size: right_size,
                        }));
                        (InsertOutcome::Split(left_node, right_node), old_value)
                    } else {
                        (InsertOutcome::Inserted(node), old_value)
                    }
                }
            }
        }
    }
}
