//! Per-script program stack

use smallvec::SmallVec;

use crate::runtime::graph::BlockId;

/// Bounded stack of cursors for one running script.
///
/// Frame 0 is the script's top-level sequence; each loop or If that runs its
/// body pushes one frame. A frame whose cursor is `None` has run off the end
/// of its sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramStack {
    frames: SmallVec<[Option<BlockId>; 8]>,
    capacity: usize,
}

impl ProgramStack {
    /// Stack positioned at `first`, allowed to grow to `capacity` frames.
    pub fn new(
        first: Option<BlockId>,
        capacity: usize,
    ) -> Self {
        let mut frames = SmallVec::new();
        frames.push(first);
        Self {
            frames,
            capacity: capacity.max(1),
        }
    }

    /// Index of the top frame, `None` once the script has finished.
    #[inline]
    pub fn cursor_index(&self) -> Option<usize> {
        self.frames.len().checked_sub(1)
    }

    /// Whether the script has finished.
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.frames.is_empty()
    }

    /// Cursor of the top frame; `None` when idle.
    #[inline]
    pub fn top(&self) -> Option<Option<BlockId>> {
        self.frames.last().copied()
    }

    /// Block the top frame points at.
    #[inline]
    pub fn current(&self) -> Option<BlockId> {
        self.top().flatten()
    }

    /// Point the top frame at `next`.
    pub fn advance(
        &mut self,
        next: Option<BlockId>,
    ) {
        if let Some(top) = self.frames.last_mut() {
            *top = next;
        }
    }

    /// Push a frame for `body`. Returns `false` when the stack is full.
    pub fn push(
        &mut self,
        body: Option<BlockId>,
    ) -> bool {
        if self.frames.len() >= self.capacity {
            return false;
        }
        self.frames.push(body);
        true
    }

    pub fn pop(&mut self) -> Option<Option<BlockId>> {
        self.frames.pop()
    }

    /// Number of live frames.
    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
