//! Error types returned by [`SkipList`](crate::SkipList).
use thiserror::Error;

/// Why an explicit-height insert was refused.
///
/// The rejected value is always handed back to the caller.
#[derive(Error, Debug, PartialEq)]
pub enum InsertError<T> {
    #[error("value is already present in the skiplist")]
    Duplicate(T),

    #[error("height {height} exceeds the configured max height {max_height}")]
    HeightOutOfRange {
        height: usize,
        max_height: usize,
        value: T,
    },
}

impl<T> InsertError<T> {
    /// Recover the value that could not be inserted.
    pub fn into_value(self) -> T {
        match self {
            InsertError::Duplicate(value) => value,
            InsertError::HeightOutOfRange { value, .. } => value,
        }
    }
}

/// A broken structural invariant, as reported by [`SkipList::validate`](crate::SkipList::validate).
///
/// Positions are ranks, i.e. zero-based offsets along level 0.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("element at position {position} is not strictly greater than its predecessor")]
    OutOfOrder { position: usize },

    #[error("head has height {height}, expected {max_height}")]
    HeadHeight { height: usize, max_height: usize },

    #[error("node at position {position} has height {height} above max height {max_height}")]
    NodeTooTall {
        position: usize,
        height: usize,
        max_height: usize,
    },

    #[error("width at position {position}, level {level} is {found}, measured {expected}")]
    Width {
        position: usize,
        level: usize,
        found: usize,
        expected: usize,
    },

    #[error("link at position {position}, level {level} skips a node that reaches that level")]
    SkippedLink { position: usize, level: usize },

    #[error("count is {count} but level 0 holds {reachable} nodes")]
    Count { count: usize, reachable: usize },
}
