// =====================================================================
// File: error.rs
//
//! Error taxonomy shared by both tree engines.
//!
//! None of these are ever produced for valid inputs on a properly
//! constructed handle: lookups return `Option::None` rather than an
//! error, and `insert`/`push`/`split`/`concat` cannot fail on their own
//! account. The variants here only fire when a handle was never given
//! a representation (see [`Error::UninitializedHandle`]) or when an
//! internal invariant the engines maintain themselves has broken.
// =====================================================================
use thiserror::Error;

/// Errors surfaced by [`crate::btree`] and [`crate::finger_tree`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A method was called on a handle that carries no representation
    /// (e.g. one produced by `Default::default()` or left behind by
    /// `std::mem::take`). Fatal to the call; construct a fresh handle
    /// with `empty()` or `new()` and retry.
    #[error("operation attempted on an uninitialised handle")]
    UninitializedHandle,

    /// An internal operation expected one node/tree variant but found
    /// another. This indicates a bug in the engine, not caller misuse.
    #[error("internal variant mismatch: expected {expected}, found {found}")]
    VariantMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// An internal operation tried to build a digit group with more
    /// than four elements. This indicates a bug in the engine.
    #[error("digit group out of range: {len} elements (maximum 4)")]
    OutOfRange { len: usize },
}

/// Convenience alias used throughout both engines.
pub type Result<T> = std::result::Result<T, Error>;
