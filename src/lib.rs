// =====================================================================
// File: lib.rs
//
//! `cowtree`: persistent, copy-on-write ordered maps.
//!
//! Two independent engines share the same keyed interface:
//!
//! - [`btree::BTreeMap`], a B-tree parameterised by order N.
//! - [`finger_tree::FingerTree`], a 2-3 finger tree with O(log n)
//!   split/concat and amortised O(1) push/pop at either end.
//!
//! Both structures are persistent: every mutating operation returns a
//! new handle and leaves the receiver observationally unchanged, using
//! `Arc`/`Arc::make_mut` to share untouched subtrees between snapshots
//! and to elide the clone when a handle is the unique owner of its
//! root. [`map::Map`] is a thin wrapper for callers who don't care
//! which engine backs their map.
// =====================================================================
pub mod btree;
pub mod error;
pub mod finger_tree;
pub mod map;
mod util;

pub use btree::BTreeMap;
pub use error::{Error, Result};
pub use finger_tree::{FingerTree, Side};
pub use map::Map;
