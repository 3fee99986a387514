//! Block graph arena

use super::block::{Block, BlockKind};
use super::node_id::{BlockId, TargetId};

/// Immutable arena of every block in a program.
///
/// Built once by [`ProgramBuilder`](super::ProgramBuilder) and shared by all
/// targets, clones included.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockGraph {
    blocks: Vec<Block>,
}

impl BlockGraph {
    pub(crate) fn from_blocks(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    /// Get a block by id.
    #[inline]
    pub fn get(
        &self,
        id: BlockId,
    ) -> Option<&Block> {
        self.blocks.get(id.0)
    }

    /// Number of blocks.
    #[inline]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Iterate blocks with their ids, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (BlockId, &Block)> {
        self.blocks.iter().enumerate().map(|(i, b)| (BlockId(i), b))
    }

    /// Entry triggers of `target`, in declaration order.
    pub fn entries_of(
        &self,
        target: TargetId,
    ) -> impl Iterator<Item = BlockId> + '_ {
        self.iter()
            .filter(move |(_, b)| b.target == target && b.kind == BlockKind::EntryTrigger)
            .map(|(id, _)| id)
    }

    /// Frames a stack needs to run the sequence starting at `first`.
    ///
    /// One frame for the sequence itself plus one per level of the deepest
    /// nested loop or If. The
    /// walk stops descending once `limit` is exceeded, so the result is exact
    /// up to `limit + 1`.
    pub fn frames_needed(
        &self,
        first: Option<BlockId>,
        limit: usize,
    ) -> usize {
        self.frames_from(first, 1, limit)
    }

    fn frames_from(
        &self,
        first: Option<BlockId>,
        level: usize,
        limit: usize,
    ) -> usize {
        if level > limit {
            return level;
        }
        let mut deepest = level;
        let mut cursor = first;
        while let Some(block) = cursor.and_then(|id| self.get(id)) {
            // An empty body still occupies a frame while it runs.
            if block.kind.has_body() {
                deepest = deepest.max(level + 1);
            }
            for child in block.children() {
                deepest = deepest.max(self.frames_from(Some(child), level + 1, limit));
                if deepest > limit {
                    return deepest;
                }
            }
            cursor = block.next;
        }
        deepest
    }
}
