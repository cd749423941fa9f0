// =====================================================================
// File: finger_tree/tree.rs
//
//! The persistent 2-3 finger tree container.
//!
//! Mirrors the B-tree's contract: public operations take `&self` and
//! return a new tree, leaving the receiver untouched. Internally,
//! recursive helpers consume `self` by value so a single top-level
//! clone of the handle is all copy-on-write ever pays for.
// =====================================================================
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::finger_tree::digit::{Digits, Side};
use crate::finger_tree::node::{pack_nodes, Node};

/// A persistent, copy-on-write ordered map backed by a 2-3 finger tree.
#[derive(Debug)]
pub struct FingerTree<K, V> {
    repr: Option<Repr<K, V>>,
}

#[derive(Debug, Clone)]
enum Repr<K, V> {
    Empty,
    Single(Arc<Node<K, V>>),
    Deep(Arc<DeepRepr<K, V>>),
}

#[derive(Debug, Clone)]
struct DeepRepr<K, V> {
    size: usize,
    left: Digits<K, V>,
    middle: FingerTree<K, V>,
    right: Digits<K, V>,
}

impl<K, V> Default for FingerTree<K, V> {
    /// Produces an uninitialised handle (see [`Error::UninitializedHandle`]).
    /// Use [`FingerTree::empty`] to get a usable, empty tree.
    fn default() -> Self {
        Self { repr: None }
    }
}

impl<K: Clone, V: Clone> Clone for FingerTree<K, V> {
    fn clone(&self) -> Self {
        Self { repr: self.repr.clone() }
    }
}

impl<K: Ord + Clone, V: Clone> FingerTree<K, V> {
    pub fn empty() -> Self {
        Self { repr: Some(Repr::Empty) }
    }

    fn repr(&self) -> Result<&Repr<K, V>> {
        self.repr.as_ref().ok_or(Error::UninitializedHandle)
    }

    /// Number of key-value pairs in the tree, in O(1).
    pub fn size(&self) -> Result<usize> {
        Ok(match self.repr()? {
            Repr::Empty => 0,
            Repr::Single(n) => n.size(),
            Repr::Deep(d) => d.size,
        })
    }

    /// Looks up the value stored at `key`, if any.
    pub fn get(&self, key: &K) -> Result<Option<&V>> {
        Ok(match self.repr()? {
            Repr::Empty => None,
            Repr::Single(n) => {
                if n.measure() >= key {
                    n.get(key)
                } else {
                    None
                }
            }
            Repr::Deep(d) => {
                if d.left.measure() >= key {
                    d.left.get(key)
                } else if middle_at_least(&d.middle, key)? {
                    d.middle.get(key)?
                } else if d.right.measure() >= key {
                    d.right.get(key)
                } else {
                    None
                }
            }
        })
    }

    /// Collects all entries in ascending key order.
    pub fn to_vec(&self) -> Result<Vec<(K, V)>> {
        let mut out = Vec::with_capacity(self.size()?);
        collect_repr(self.repr()?, &mut out);
        Ok(out)
    }

    /// Pushes `key`/`value` onto the given end.
    pub fn push(&self, side: Side, key: K, value: V) -> Result<Self> {
        self.clone().push_node(side, Node::leaf(key, value))
    }

    /// Pops a key-value pair off the given end.
    pub fn pop(&self, side: Side) -> Result<(Self, Option<(K, V)>)> {
        let (tree, node) = self.clone().pop_node(side)?;
        let pair = match node {
            None => None,
            Some(n) => Some(match Arc::try_unwrap(n) {
                Ok(Node::Leaf { key, value }) => (key, value),
                Ok(_) => unreachable!("pop_node always yields a leaf"),
                Err(n) => match &*n {
                    Node::Leaf { key, value } => (key.clone(), value.clone()),
                    _ => unreachable!("pop_node always yields a leaf"),
                },
            }),
        };
        Ok((tree, pair))
    }

    /// Inserts `key`/`value`, returning a new tree and the previous value
    /// at `key` if one existed.
    pub fn insert(&self, key: K, value: V) -> Result<(Self, Option<V>)> {
        let (left, found, right) = self.split(&key)?;
        let left = left.push_node(Side::Right, Node::leaf(key, value))?;
        let merged = FingerTree::concat(&left, &right)?;
        Ok((merged, found))
    }

    /// Removes `key`, returning a new tree and the removed value if it
    /// existed.
    pub fn remove(&self, key: &K) -> Result<(Self, Option<V>)> {
        let (left, found, right) = self.split(key)?;
        let merged = FingerTree::concat(&left, &right)?;
        Ok((merged, found))
    }

    /// Splits the tree at `key`: the left tree holds keys strictly less
    /// than `key`, the right tree keys strictly greater, and the middle
    /// optional is the value at `key` if present.
    pub fn split(&self, key: &K) -> Result<(Self, Option<V>, Self)> {
        let (left, node, right) = self.split_node(key)?;
        match node {
            None => Ok((left, None, right)),
            Some(node) => match &*node {
                Node::Leaf { key: k, value } if k == key => {
                    Ok((left, Some(value.clone()), right))
                }
                _ => {
                    let right = right.push_node(Side::Left, node)?;
                    Ok((left, None, right))
                }
            },
        }
    }

    /// Concatenates `left` and `right`. The caller guarantees every key
    /// in `left` is strictly less than every key in `right`.
    pub fn concat(left: &Self, right: &Self) -> Result<Self> {
        concat_inner(left.clone(), Vec::new(), right.clone())
    }

    fn from_nodes(nodes: Vec<Arc<Node<K, V>>>) -> Result<Self> {
        let mut tree = FingerTree::empty();
        tree = tree.append_nodes(Side::Right, nodes)?;
        Ok(tree)
    }

    /// Builds a `Deep` tree from possibly-empty digit sequences, pulling
    /// from `middle` to repair an empty side. Essential glue for `split`
    /// and `concat`, whose intermediate states would otherwise violate
    /// `Deep`'s non-empty-digit invariant.
    fn deep_smart(
        left: Vec<Arc<Node<K, V>>>,
        middle: Self,
        right: Vec<Arc<Node<K, V>>>,
    ) -> Result<Self> {
        let mut left = Digits::from_nodes(left)?;
        let mut middle = middle;
        let mut right = Digits::from_nodes(right)?;

        if left.is_empty() {
            if matches!(middle.repr()?, Repr::Empty) {
                return FingerTree::from_nodes(right.into_nodes());
            }
            let (new_middle, underflow) = middle.pop_node(Side::Left)?;
            middle = new_middle;
            let underflow = underflow.expect("non-empty middle must yield a node");
            left.unpack(Side::Right, &underflow)?;
        }

        if right.is_empty() {
            if matches!(middle.repr()?, Repr::Empty) {
                return FingerTree::from_nodes(left.into_nodes());
            }
            let (new_middle, underflow) = middle.pop_node(Side::Right)?;
            middle = new_middle;
            let underflow = underflow.expect("non-empty middle must yield a node");
            right.unpack(Side::Left, &underflow)?;
        }

        let size = left.size() + middle.size()? + right.size();
        Ok(FingerTree {
            repr: Some(Repr::Deep(Arc::new(DeepRepr { size, left, middle, right }))),
        })
    }

    pub(crate) fn push_node(self, side: Side, node: Arc<Node<K, V>>) -> Result<Self> {
        let repr = self.repr.ok_or(Error::UninitializedHandle)?;
        let new_repr = match repr {
            Repr::Empty => Repr::Single(node),
            Repr::Single(other) => {
                let (left, right) = match side {
                    Side::Left => (Digits::one(node), Digits::one(other)),
                    Side::Right => (Digits::one(other), Digits::one(node)),
                };
                let size = left.size() + right.size();
                Repr::Deep(Arc::new(DeepRepr {
                    size,
                    left,
                    middle: FingerTree::empty(),
                    right,
                }))
            }
            Repr::Deep(mut deep_arc) => {
                let node_size = node.size();
                let mut overflow = None;
                {
                    let deep = Arc::make_mut(&mut deep_arc);
                    match side {
                        Side::Left => {
                            if deep.left.len() == 4 {
                                overflow = Some(deep.left.pack(Side::Right));
                            }
                            deep.left.push(Side::Left, node);
                        }
                        Side::Right => {
                            if deep.right.len() == 4 {
                                overflow = Some(deep.right.pack(Side::Left));
                            }
                            deep.right.push(Side::Right, node);
                        }
                    }
                    deep.size += node_size;
                }
                if let Some(overflow_node) = overflow {
                    let deep = Arc::make_mut(&mut deep_arc);
                    let middle = std::mem::replace(&mut deep.middle, FingerTree::empty());
                    deep.middle = middle.push_node(side, overflow_node)?;
                }
                Repr::Deep(deep_arc)
            }
        };
        Ok(FingerTree { repr: Some(new_repr) })
    }

    pub(crate) fn pop_node(self, side: Side) -> Result<(Self, Option<Arc<Node<K, V>>>)> {
        let repr = self.repr.ok_or(Error::UninitializedHandle)?;
        match repr {
            Repr::Empty => Ok((FingerTree { repr: Some(Repr::Empty) }, None)),
            Repr::Single(n) => Ok((FingerTree { repr: Some(Repr::Empty) }, Some(n))),
            Repr::Deep(mut deep_arc) => {
                let middle_empty = matches!(deep_arc.middle.repr, Some(Repr::Empty));
                let left_len = deep_arc.left.len();
                let right_len = deep_arc.right.len();

                if middle_empty && left_len == 1 && right_len == 1 {
                    let deep = Arc::try_unwrap(deep_arc).unwrap_or_else(|a| (*a).clone());
                    let DeepRepr { mut left, mut right, .. } = deep;
                    return Ok(match side {
                        Side::Left => {
                            let popped = left.pop(Side::Left);
                            let remaining = right.pop(Side::Right);
                            (FingerTree { repr: Some(Repr::Single(remaining)) }, Some(popped))
                        }
                        Side::Right => {
                            let popped = right.pop(Side::Right);
                            let remaining = left.pop(Side::Left);
                            (FingerTree { repr: Some(Repr::Single(remaining)) }, Some(popped))
                        }
                    });
                }

                if middle_empty && side == Side::Left && left_len == 1 {
                    let deep = Arc::make_mut(&mut deep_arc);
                    let moved = deep.right.pop(Side::Left);
                    deep.left.push(Side::Right, moved);
                    let node = deep.left.pop(Side::Left);
                    deep.size -= node.size();
                    return Ok((FingerTree { repr: Some(Repr::Deep(deep_arc)) }, Some(node)));
                }

                if middle_empty && side == Side::Right && right_len == 1 {
                    let deep = Arc::make_mut(&mut deep_arc);
                    let moved = deep.left.pop(Side::Right);
                    deep.right.push(Side::Left, moved);
                    let node = deep.right.pop(Side::Right);
                    deep.size -= node.size();
                    return Ok((FingerTree { repr: Some(Repr::Deep(deep_arc)) }, Some(node)));
                }

                if side == Side::Left && left_len > 1 {
                    let deep = Arc::make_mut(&mut deep_arc);
                    let node = deep.left.pop(Side::Left);
                    deep.size -= node.size();
                    return Ok((FingerTree { repr: Some(Repr::Deep(deep_arc)) }, Some(node)));
                }

                if side == Side::Right && right_len > 1 {
                    let deep = Arc::make_mut(&mut deep_arc);
                    let node = deep.right.pop(Side::Right);
                    deep.size -= node.size();
                    return Ok((FingerTree { repr: Some(Repr::Deep(deep_arc)) }, Some(node)));
                }

                // Middle is non-empty and the target digit group has
                // exactly one node: pull a node from the middle tree and
                // unpack it into the depleted side.
                let deep = Arc::make_mut(&mut deep_arc);
                let middle = std::mem::replace(&mut deep.middle, FingerTree::empty());
                let (new_middle, underflow) = middle.pop_node(side)?;
                deep.middle = new_middle;
                let underflow = underflow.expect("non-empty middle must yield a node");
                let node = match side {
                    Side::Left => {
                        deep.left.unpack(Side::Right, &underflow)?;
                        deep.left.pop(Side::Left)
                    }
                    Side::Right => {
                        deep.right.unpack(Side::Left, &underflow)?;
                        deep.right.pop(Side::Right)
                    }
                };
                deep.size -= node.size();
                Ok((FingerTree { repr: Some(Repr::Deep(deep_arc)) }, Some(node)))
            }
        }
    }

    fn append_nodes(self, side: Side, nodes: Vec<Arc<Node<K, V>>>) -> Result<Self> {
        let mut tree = self;
        match side {
            Side::Left => {
                for node in nodes.into_iter().rev() {
                    tree = tree.push_node(Side::Left, node)?;
                }
            }
            Side::Right => {
                for node in nodes.into_iter() {
                    tree = tree.push_node(Side::Right, node)?;
                }
            }
        }
        Ok(tree)
    }

    fn split_node(&self, key: &K) -> Result<(Self, Option<Arc<Node<K, V>>>, Self)> {
        match self.repr()? {
            Repr::Empty => Ok((FingerTree::empty(), None, FingerTree::empty())),
            Repr::Single(n) => {
                if n.measure() >= key {
                    Ok((FingerTree::empty(), Some(n.clone()), FingerTree::empty()))
                } else {
                    Ok((self.clone(), None, FingerTree::empty()))
                }
            }
            Repr::Deep(deep) => {
                if deep.left.measure() >= key {
                    let (l, node, r) = deep.left.split(key);
                    let left_tree = FingerTree::from_nodes(l)?;
                    let right_tree =
                        FingerTree::deep_smart(r, deep.middle.clone(), deep.right.nodes().to_vec())?;
                    Ok((left_tree, node, right_tree))
                } else if middle_at_least(&deep.middle, key)? {
                    let (m_left, packed_node, m_right) = deep.middle.split_node(key)?;
                    let packed = packed_node.expect("middle hit must exist when middle_at_least holds");
                    let inner = Digits::from_nodes(packed.children()?)?;
                    let (inner_left, node, inner_right) = inner.split(key);
                    let left_tree = FingerTree::deep_smart(deep.left.nodes().to_vec(), m_left, inner_left)?;
                    let right_tree = FingerTree::deep_smart(inner_right, m_right, deep.right.nodes().to_vec())?;
                    Ok((left_tree, node, right_tree))
                } else {
                    let (l, node, r) = deep.right.split(key);
                    let left_tree = FingerTree::deep_smart(deep.left.nodes().to_vec(), deep.middle.clone(), l)?;
                    let right_tree = FingerTree::from_nodes(r)?;
                    Ok((left_tree, node, right_tree))
                }
            }
        }
    }
}

impl<K: Ord + Clone + std::fmt::Debug, V: Clone + std::fmt::Debug> FingerTree<K, V> {
    /// Writes a debug-only, indented dump of the tree's structure to
    /// `out`. Not a stable format; for inspection during development.
    pub fn pretty_print(&self, out: &mut dyn std::io::Write, indent: usize) -> std::io::Result<()> {
        let pad = "  ".repeat(indent);
        match &self.repr {
            None => writeln!(out, "{pad}<uninitialised>"),
            Some(Repr::Empty) => writeln!(out, "{pad}empty"),
            Some(Repr::Single(n)) => {
                writeln!(out, "{pad}single")?;
                crate::finger_tree::node::show(n, out, indent + 1)
            }
            Some(Repr::Deep(d)) => {
                writeln!(out, "{pad}deep size={}", d.size)?;
                writeln!(out, "{pad}  left:")?;
                for n in d.left.nodes() {
                    crate::finger_tree::node::show(n, out, indent + 2)?;
                }
                writeln!(out, "{pad}  middle:")?;
                d.middle.pretty_print(out, indent + 2)?;
                writeln!(out, "{pad}  right:")?;
                for n in d.right.nodes() {
                    crate::finger_tree::node::show(n, out, indent + 2)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
impl<K: Ord + Clone + std::fmt::Debug, V: Clone> FingerTree<K, V> {
    /// Asserts the structural invariants of properties 2 and 10: every
    /// digit group holds 1..=4 nodes, every interior node's cached
    /// measure matches its rightmost child, and the middle tree at any
    /// depth never holds a leaf directly in its own `Single`/`Deep`
    /// digits (leaves only ever live at the outermost level).
    pub(crate) fn check_invariants(&self) {
        self.check_invariants_at(true)
    }

    fn check_invariants_at(&self, allow_leaves: bool) {
        match self.repr.as_ref().expect("initialised handle") {
            Repr::Empty => {}
            Repr::Single(node) => {
                assert!(allow_leaves || !node.is_leaf(), "middle tree holds a leaf");
                node.check_invariants();
            }
            Repr::Deep(deep) => {
                deep.left.check_bounds();
                deep.right.check_bounds();
                for node in deep.left.nodes().iter().chain(deep.right.nodes().iter()) {
                    assert!(allow_leaves || !node.is_leaf(), "middle tree holds a leaf");
                    node.check_invariants();
                }
                deep.middle.check_invariants_at(false);
            }
        }
    }
}

fn middle_at_least<K: Ord + Clone, V: Clone>(middle: &FingerTree<K, V>, key: &K) -> Result<bool> {
    Ok(match middle.repr()? {
        Repr::Empty => false,
        Repr::Single(n) => n.measure() >= key,
        Repr::Deep(d) => d.right.measure() >= key,
    })
}

fn collect_repr<K: Ord + Clone, V: Clone>(repr: &Repr<K, V>, out: &mut Vec<(K, V)>) {
    match repr {
        Repr::Empty => {}
        Repr::Single(n) => n.collect_into(out),
        Repr::Deep(d) => {
            for n in d.left.nodes() {
                n.collect_into(out);
            }
            if let Ok(middle_repr) = d.middle.repr() {
                collect_repr(middle_repr, out);
            }
            for n in d.right.nodes() {
                n.collect_into(out);
            }
        }
    }
}

fn concat_inner<K: Ord + Clone, V: Clone>(
    left: FingerTree<K, V>,
    middle: Vec<Arc<Node<K, V>>>,
    right: FingerTree<K, V>,
) -> Result<FingerTree<K, V>> {
    let left_repr = left.repr.clone().ok_or(Error::UninitializedHandle)?;
    let right_repr = right.repr.clone().ok_or(Error::UninitializedHandle)?;

    match (left_repr, right_repr) {
        (Repr::Empty, _) => right.append_nodes(Side::Left, middle),
        (_, Repr::Empty) => left.append_nodes(Side::Right, middle),
        (Repr::Single(node), _) => {
            let tree = right.append_nodes(Side::Left, middle)?;
            tree.push_node(Side::Left, node)
        }
        (_, Repr::Single(node)) => {
            let tree = left.append_nodes(Side::Right, middle)?;
            tree.push_node(Side::Right, node)
        }
        (Repr::Deep(left_deep), Repr::Deep(right_deep)) => {
            let mut combined = Vec::with_capacity(
                left_deep.right.len() + middle.len() + right_deep.left.len(),
            );
            combined.extend(left_deep.right.nodes().iter().cloned());
            combined.extend(middle);
            combined.extend(right_deep.left.nodes().iter().cloned());
            let packed = pack_nodes(combined);

            let new_middle = concat_inner(left_deep.middle.clone(), packed, right_deep.middle.clone())?;
            let size = left_deep.left.size() + new_middle.size()? + right_deep.right.size();
            Ok(FingerTree {
                repr: Some(Repr::Deep(Arc::new(DeepRepr {
                    size,
                    left: left_deep.left.clone(),
                    middle: new_middle,
                    right: right_deep.right.clone(),
                }))),
            })
        }
    }
}
