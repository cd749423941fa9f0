// =====================================================================
// File: finger_tree/digit.rs
//
//! Digit groups: the 1..=4 element node sequences that sit at the left
//! and right ends of a `Deep` finger tree.
// =====================================================================
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::finger_tree::node::Node;

/// Which end of a digit group (or finger tree) an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone)]
pub(crate) struct Digits<K, V> {
    nodes: Vec<Arc<Node<K, V>>>,
}

impl<K: Ord + Clone, V: Clone> Digits<K, V> {
    pub(crate) fn one(node: Arc<Node<K, V>>) -> Self {
        Self { nodes: vec![node] }
    }

    pub(crate) fn from_nodes(nodes: Vec<Arc<Node<K, V>>>) -> Result<Self> {
        if nodes.len() > 4 {
            return Err(Error::OutOfRange { len: nodes.len() });
        }
        Ok(Self { nodes })
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn nodes(&self) -> &[Arc<Node<K, V>>] {
        &self.nodes
    }

    pub(crate) fn into_nodes(self) -> Vec<Arc<Node<K, V>>> {
        self.nodes
    }

    pub(crate) fn size(&self) -> usize {
        self.nodes.iter().map(|n| n.size()).sum()
    }

    /// The largest key in this digit group (i.e. its rightmost node's
    /// measure). Panics on an empty group; digit groups are never
    /// observably empty outside of transient intermediate states.
    pub(crate) fn measure(&self) -> &K {
        self.nodes.last().expect("digit group is empty").measure()
    }

    pub(crate) fn get(&self, key: &K) -> Option<&V> {
        for node in &self.nodes {
            if node.measure() >= key {
                return node.get(key);
            }
        }
        None
    }

    /// Prepends (`Left`) or appends (`Right`) `node`. Caller must ensure
    /// the group has fewer than 4 nodes before calling.
    pub(crate) fn push(&mut self, side: Side, node: Arc<Node<K, V>>) {
        debug_assert!(self.nodes.len() < 4, "digit group overflow");
        match side {
            Side::Left => self.nodes.insert(0, node),
            Side::Right => self.nodes.push(node),
        }
    }

    /// Removes and returns an end node. Caller must ensure the group is
    /// non-empty before calling.
    pub(crate) fn pop(&mut self, side: Side) -> Arc<Node<K, V>> {
        debug_assert!(!self.nodes.is_empty(), "digit group underflow");
        match side {
            Side::Left => self.nodes.remove(0),
            Side::Right => self.nodes.pop().expect("digit group is empty"),
        }
    }

    /// Removes three consecutive nodes from one end and packs them into
    /// a single 3-node. Caller must ensure the group has at least 3
    /// nodes before calling.
    pub(crate) fn pack(&mut self, side: Side) -> Arc<Node<K, V>> {
        debug_assert!(self.nodes.len() >= 3, "digit group too small to pack");
        let three: Vec<_> = match side {
            Side::Left => self.nodes.drain(0..3).collect(),
            Side::Right => {
                let len = self.nodes.len();
                self.nodes.drain(len - 3..len).collect()
            }
        };
        Node::branch3(three[0].clone(), three[1].clone(), three[2].clone())
    }

    /// Injects `deep_node`'s children at the given end, preserving their
    /// relative order. `deep_node` must be a 2-/3-node, never a leaf.
    pub(crate) fn unpack(&mut self, side: Side, deep_node: &Node<K, V>) -> Result<()> {
        let children = deep_node.children()?;
        match side {
            Side::Left => {
                for child in children.into_iter().rev() {
                    self.nodes.insert(0, child);
                }
            }
            Side::Right => {
                for child in children {
                    self.nodes.push(child);
                }
            }
        }
        Ok(())
    }

    /// Scans for the first node whose measure is >= `key`, returning the
    /// nodes before it, the node itself (if any), and the nodes after.
    pub(crate) fn split(
        &self,
        key: &K,
    ) -> (Vec<Arc<Node<K, V>>>, Option<Arc<Node<K, V>>>, Vec<Arc<Node<K, V>>>) {
        for (i, node) in self.nodes.iter().enumerate() {
            if node.measure() >= key {
                return (
                    self.nodes[..i].to_vec(),
                    Some(node.clone()),
                    self.nodes[i + 1..].to_vec(),
                );
            }
        }
        (self.nodes.clone(), None, Vec::new())
    }
}

#[cfg(test)]
impl<K: Ord + Clone, V: Clone> Digits<K, V> {
    /// Asserts the digit group holds between 1 and 4 nodes (property 10).
    pub(crate) fn check_bounds(&self) {
        assert!(
            !self.nodes.is_empty() && self.nodes.len() <= 4,
            "digit group length {} out of bounds [1, 4]",
            self.nodes.len()
        );
    }
}
