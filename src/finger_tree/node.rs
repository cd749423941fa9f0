// =====================================================================
// File: finger_tree/node.rs
//
//! Node representation for the finger tree.
//!
//! The source's polymorphic recursion (`FingerTree<a>`, `FingerTree<Node<
//! a>>`, `FingerTree<Node<Node<a>>>`, ...) has no direct Rust equivalent,
//! since Rust lacks true parametric recursion. Instead a single
//! non-polymorphic `Node<K, V>` enum represents a leaf or a 2-/3-node of
//! child `Node<K, V>`s; "depth" is an invariant the engine maintains by
//! construction rather than something the type system tracks.
// =====================================================================
use std::sync::Arc;

use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub(crate) enum Node<K, V> {
    Leaf {
        key: K,
        value: V,
    },
    Branch2 {
        measure: K,
        size: usize,
        a: Arc<Node<K, V>>,
        b: Arc<Node<K, V>>,
    },
    Branch3 {
        measure: K,
        size: usize,
        a: Arc<Node<K, V>>,
        b: Arc<Node<K, V>>,
        c: Arc<Node<K, V>>,
    },
}

impl<K: Ord + Clone, V: Clone> Node<K, V> {
    pub(crate) fn leaf(key: K, value: V) -> Arc<Self> {
        Arc::new(Node::Leaf { key, value })
    }

    pub(crate) fn branch2(a: Arc<Node<K, V>>, b: Arc<Node<K, V>>) -> Arc<Self> {
        let measure = b.measure().clone();
        let size = a.size() + b.size();
        Arc::new(Node::Branch2 { measure, size, a, b })
    }

    pub(crate) fn branch3(a: Arc<Node<K, V>>, b: Arc<Node<K, V>>, c: Arc<Node<K, V>>) -> Arc<Self> {
        let measure = c.measure().clone();
        let size = a.size() + b.size() + c.size();
        Arc::new(Node::Branch3 { measure, size, a, b, c })
    }

    pub(crate) fn size(&self) -> usize {
        match self {
            Node::Leaf { .. } => 1,
            Node::Branch2 { size, .. } => *size,
            Node::Branch3 { size, .. } => *size,
        }
    }

    pub(crate) fn measure(&self) -> &K {
        match self {
            Node::Leaf { key, .. } => key,
            Node::Branch2 { measure, .. } => measure,
            Node::Branch3 { measure, .. } => measure,
        }
    }

    /// The node's immediate children, in ascending order. Errors on a
    /// leaf: callers only call this on a node already known to be a
    /// 2-/3-node (e.g. unpacking an underflow pulled from the middle
    /// tree, which by invariant never holds leaves).
    pub(crate) fn children(&self) -> Result<Vec<Arc<Node<K, V>>>> {
        match self {
            Node::Leaf { .. } => Err(Error::VariantMismatch {
                expected: "Branch2 or Branch3",
                found: "Leaf",
            }),
            Node::Branch2 { a, b, .. } => Ok(vec![a.clone(), b.clone()]),
            Node::Branch3 { a, b, c, .. } => Ok(vec![a.clone(), b.clone(), c.clone()]),
        }
    }

    pub(crate) fn get(&self, key: &K) -> Option<&V> {
        match self {
            Node::Leaf { key: k, value } => (k == key).then_some(value),
            Node::Branch2 { a, b, .. } => {
                if a.measure() >= key {
                    a.get(key)
                } else if b.measure() >= key {
                    b.get(key)
                } else {
                    None
                }
            }
            Node::Branch3 { a, b, c, .. } => {
                if a.measure() >= key {
                    a.get(key)
                } else if b.measure() >= key {
                    b.get(key)
                } else if c.measure() >= key {
                    c.get(key)
                } else {
                    None
                }
            }
        }
    }

    pub(crate) fn collect_into(&self, out: &mut Vec<(K, V)>) {
        match self {
            Node::Leaf { key, value } => out.push((key.clone(), value.clone())),
            Node::Branch2 { a, b, .. } => {
                a.collect_into(out);
                b.collect_into(out);
            }
            Node::Branch3 { a, b, c, .. } => {
                a.collect_into(out);
                b.collect_into(out);
                c.collect_into(out);
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
        Node::Leaf { key, value } => writeln!(out, "{pad}leaf {key:?} -> {value:?}"),
        Node::Branch2 { measure, a, b, .. } => {
            writeln!(out, "{pad}branch2 measure={measure:?}")?;
            show(a, out, indent + 1)?;
            show(b, out, indent + 1)
        }
        Node::Branch3 { measure, a, b, c, .. } => {
            writeln!(out, "{pad}branch3 measure={measure:?}")?;
            show(a, out, indent + 1)?;
            show(b, out, indent + 1)?;
            show(c, out, indent + 1)
        }
    }
}

/// Packs a sequence of same-depth nodes (length >= 2) into 2-/3-nodes
/// covering it exactly, preserving order. While 5 or more remain, emits
/// a 3-node; the tail is finished off as 2, 3, or two 2-nodes for 4.
pub(crate) fn pack_nodes<K: Ord + Clone, V: Clone>(
    nodes: Vec<Arc<Node<K, V>>>,
) -> Vec<Arc<Node<K, V>>> {
    let mut packed = Vec::new();
    let mut i = 0;
    while nodes.len() - i != 0 {
        match nodes.len() - i {
            2 => {
                packed.push(Node::branch2(nodes[i].clone(), nodes[i + 1].clone()));
                i += 2;
            }
            3 => {
                packed.push(Node::branch3(
                    nodes[i].clone(),
                    nodes[i + 1].clone(),
                    nodes[i + 2].clone(),
                ));
                i += 3;
            }
            4 => {
                packed.push(Node::branch2(nodes[i].clone(), nodes[i + 1].clone()));
                packed.push(Node::branch2(nodes[i + 2].clone(), nodes[i + 3].clone()));
                i += 4;
            }
            _ => {
                packed.push(Node::branch3(
                    nodes[i].clone(),
                    nodes[i + 1].clone(),
                    nodes[i + 2].clone(),
                ));
                i += 3;
            }
        }
    }
    packed
}

#[cfg(test)]
impl<K: Ord + Clone + std::fmt::Debug, V: Clone> Node<K, V> {
    /// Asserts a 2-/3-node's cached measure equals its last child's
    /// measure, recursively (property 2).
    pub(crate) fn check_invariants(&self) {
        match self {
            Node::Leaf { .. } => {}
            Node::Branch2 { measure, a, b, .. } => {
                assert_eq!(measure, b.measure(), "branch2 measure disagrees with rightmost child");
                a.check_invariants();
                b.check_invariants();
            }
            Node::Branch3 { measure, a, b, c, .. } => {
                assert_eq!(measure, c.measure(), "branch3 measure disagrees with rightmost child");
                a.check_invariants();
                b.check_invariants();
                c.check_invariants();
            }
        }
    }

    pub(crate) fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }
}
