//! Identifiers for block graph nodes and targets
//!
//! Blocks live in a flat arena and refer to each other by [`BlockId`];
//! targets are indexed by [`TargetId`]. An absent link is `None`, never a
//! sentinel index.

use std::fmt;

/// Index of a block in the [`BlockGraph`](super::BlockGraph) arena.
///
/// # Examples
///
/// ```
/// use scratch_vm::runtime::graph::BlockId;
///
/// let id = BlockId(42);
/// assert_eq!(id.value(), 42);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockId(pub usize);

impl BlockId {
    /// Returns the inner arena index.
    #[inline]
    pub fn value(&self) -> usize {
        self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "Block({})", self.0)
    }
}

/// Index of a target (stage, sprite or clone) in a program or runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TargetId(pub usize);

impl TargetId {
    /// Returns the inner index.
    #[inline]
    pub fn value(&self) -> usize {
        self.0
    }
}

impl fmt::Display for TargetId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "Target({})", self.0)
    }
}
