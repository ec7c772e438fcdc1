//! Errors raised by tree addressing and edits.
//!
//! Every variant marks a caller bug (a stale or malformed path, an edit sent
//! to the wrong kind of node, an unknown layer id). None of them is retried.

use layertree_path::PathError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// A path step indexes past the end of the addressed `sublayers`.
    #[error("OUT_OF_RANGE: index {index} at depth {depth} (len {len})")]
    OutOfRange {
        depth: usize,
        index: usize,
        len: usize,
    },
    /// A path step descends into a leaf, which has no `sublayers`.
    ///
    /// `depth` is the index of that step in the path.
    #[error("NOT_A_GROUP: depth {depth}")]
    NotAGroup { depth: usize },
    /// A leaf-only edit addressed a group or the layer itself.
    #[error("NOT_A_LEAF")]
    NotALeaf,
    /// A group-only edit addressed a leaf.
    #[error("EXPECTED_GROUP")]
    ExpectedGroup,
    /// A leaf-only edit was given the root path.
    #[error("EMPTY_PATH")]
    EmptyPath,
    #[error("UNKNOWN_LAYER: {0}")]
    UnknownLayer(String),
    #[error(transparent)]
    Path(#[from] PathError),
}
