// =====================================================================
// File: btree/node.rs
//
//! Node representation for the persistent B-tree.
//!
//! A [`Node`] is either a `Leaf` holding key/value pairs directly, or a
//! `Deep` internal node holding separator keys and child subtrees. Every
//! separator key is redundant with its child's own measure (the maximum
//! key reachable under it) so a `Deep` node's last key always equals its
//! own measure.
// =====================================================================
use std::sync::Arc;

#[derive(Debug, Clone)]
pub(crate) enum Node<K, V> {
    Leaf(Leaf<K, V>),
    Deep(Deep<K, V>),
}

#[derive(Debug, Clone)]
pub(crate) struct Leaf<K, V> {
    pub(crate) pairs: Vec<(K, V)>,
}

#[derive(Debug, Clone)]
pub(crate) struct Deep<K, V> {
    pub(crate) keys: Vec<K>,
    pub(crate) children: Vec<Arc<Node<K, V>>>,
    pub(crate) size: usize,
}

impl<K: Ord + Clone, V: Clone> Node<K, V> {
    pub(crate) fn empty_leaf() -> Arc<Self> {
        Arc::new(Node::Leaf(Leaf { pairs: Vec::new() }))
    }

    pub(crate) fn size(&self) -> usize {
        match self {
            Node::Leaf(leaf) => leaf.pairs.len(),
            Node::Deep(deep) => deep.size,
        }
    }

    /// The largest key reachable under this node.
    pub(crate) fn measure(&self) -> &K {
        match self {
            Node::Leaf(leaf) => &leaf.pairs.last().expect("leaf node carries no keys").0,
            Node::Deep(deep) => deep.keys.last().expect("deep node carries no separators"),
        }
    }

    pub(crate) fn get(&self, key: &K) -> Option<&V> {
        match self {
            Node::Leaf(leaf) => leaf
                .pairs
                .binary_search_by(|(k, _)| k.cmp(key))
                .ok()
                .map(|i| &leaf.pairs[i].1),
            Node::Deep(deep) => {
                let idx = child_index(&deep.keys, key);
                deep.children[idx].get(key)
            }
        }
    }

    pub(crate) fn collect_into(&self, out: &mut Vec<(K, V)>) {
        match self {
            Node::Leaf(leaf) => out.extend(leaf.pairs.iter().cloned()),
            Node::Deep(deep) => {
                for child in &deep.children {
                    child.collect_into(out);
                }
            }
        }
    }
}

/// First index `i` such that `keys[i] >= key`, clamped to the last valid
/// child when `key` exceeds every separator (the rightmost child is
/// responsible for everything beyond the second-to-last separator).
pub(crate) fn child_index<K: Ord>(keys: &[K], key: &K) -> usize {
    let idx = keys.partition_point(|k| k < key);
    idx.min(keys.len() - 1)
}

#[cfg(test)]
impl<K: Ord + Clone + std::fmt::Debug, V: Clone> Node<K, V> {
    /// Asserts properties 2, 3, and 9: every `Deep` separator equals its
    /// child's own measure, every child's size is accounted for in the
    /// parent's cached size, and every non-root leaf/`Deep` stays within
    /// `[ceil(order/2) - 1, order - 1]` / `[ceil(order/2), order]`.
    pub(crate) fn check_invariants(&self, order: usize, is_root: bool) {
        let ceil_half = order.div_ceil(2);
        match self {
            Node::Leaf(leaf) => {
                if !is_root {
                    let min = ceil_half - 1;
                    let max = order - 1;
                    assert!(
                        leaf.pairs.len() >= min && leaf.pairs.len() <= max,
                        "leaf pair count {} out of bounds [{}, {}]",
                        leaf.pairs.len(),
                        min,
                        max
                    );
                }
            }
            Node::Deep(deep) => {
                if !is_root {
                    assert!(
                        deep.children.len() >= ceil_half && deep.children.len() <= order,
                        "deep child count {} out of bounds [{}, {}]",
                        deep.children.len(),
                        ceil_half,
                        order
                    );
                }
                assert_eq!(deep.keys.len(), deep.children.len(), "separator/child count mismatch");
                let mut total = 0;
                for (key, child) in deep.keys.iter().zip(deep.children.iter()) {
                    assert_eq!(key, child.measure(), "cached separator disagrees with child measure");
                    total += child.size();
                    child.check_invariants(order, false);
                }
                assert_eq!(total, deep.size, "cached size disagrees with sum of child sizes");
            }
        }
    }
}

pub(crate) fn show<K: std::fmt::Debug, V: std::fmt::Debug>(
    node: &Node<K, V>,
    out: &mut dyn std::io::Write,
    indent: usize,
) -> std::io::Result<()> {
    let pad = "  ".repeat(indent);
    match node {
        Node::Leaf(leaf) => writeln!(out, "{pad}leaf {:?}", leaf.pairs),
        Node::Deep(deep) => {
            writeln!(out, "{pad}deep size={} keys={:?}", deep.size, deep.keys)?;
            for child in &deep.children {
                show(child, out, indent + 1)?;
            }
            Ok(())
        }
    }
}
