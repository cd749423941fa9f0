// =====================================================================
// File: util.rs
//
//! Small arithmetic helpers shared by the B-tree and finger tree engines.
// =====================================================================

/// Midpoint used when an overflowing sequence is split in half: the left
/// half gets `len / 2` elements (the shorter half when `len` is odd), the
/// right half gets the rest.
pub(crate) fn midpoint(len: usize) -> usize {
    len / 2
}
