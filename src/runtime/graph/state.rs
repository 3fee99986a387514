//! Mutable per-block run state
//!
//! The block graph itself never changes after build. Everything a block
//! remembers between visits (loop counters, timed latches) is kept here, one
//! table per target, so clones sharing the graph keep independent state.

use super::node_id::BlockId;
use crate::runtime::value::Number;

/// Clamped countdown shared by Wait and Glide.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Countdown {
    /// Whether an activation is in progress
    pub started: bool,
    /// Time accumulated in this activation, never above `timeout`
    pub elapsed: Number,
    /// Duration latched on the first visit of the activation
    pub timeout: Number,
}

impl Countdown {
    /// Start a new activation with `timeout`.
    ///
    /// NaN and negative durations latch as zero so the block completes on its
    /// first visit.
    pub fn start(
        &mut self,
        timeout: Number,
    ) {
        self.started = true;
        self.elapsed = 0.0;
        self.timeout = if timeout.is_nan() || timeout < 0.0 { 0.0 } else { timeout };
    }

    /// Add `dt`, clamped to the timeout. Returns `true` once complete, which
    /// also ends the activation.
    pub fn tick(
        &mut self,
        dt: Number,
    ) -> bool {
        self.elapsed = (self.elapsed + dt).min(self.timeout);
        if self.elapsed == self.timeout {
            self.started = false;
            true
        } else {
            false
        }
    }

    /// Completed fraction of the activation, in `[0, 1]`.
    pub fn progress(&self) -> Number {
        if self.timeout == 0.0 {
            1.0
        } else {
            self.elapsed / self.timeout
        }
    }
}

/// Latched endpoints of an active glide.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GlideState {
    pub countdown: Countdown,
    pub from: (Number, Number),
    pub to: (Number, Number),
}

impl GlideState {
    /// Interpolated position at the current progress.
    pub fn position(&self) -> (Number, Number) {
        let t = self.countdown.progress();
        (
            self.from.0 + (self.to.0 - self.from.0) * t,
            self.from.1 + (self.to.1 - self.from.1) * t,
        )
    }
}

/// Run state of a single block.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum BlockState {
    /// Stateless block
    #[default]
    None,
    /// Repeat iterations already started
    Repeat { iterations: u32 },
    Wait(Countdown),
    Glide(GlideState),
}

/// Per-target block state table, indexed by [`BlockId`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockStates {
    states: Vec<BlockState>,
}

impl BlockStates {
    /// Fresh table for a graph of `len` blocks.
    pub fn new(len: usize) -> Self {
        Self {
            states: vec![BlockState::None; len],
        }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn get(
        &self,
        id: BlockId,
    ) -> BlockState {
        self.states.get(id.0).copied().unwrap_or_default()
    }

    fn slot(
        &mut self,
        id: BlockId,
    ) -> &mut BlockState {
        if id.0 >= self.states.len() {
            self.states.resize(id.0 + 1, BlockState::None);
        }
        &mut self.states[id.0]
    }

    /// Iterations the Repeat block at `id` has started.
    pub fn iterations(
        &self,
        id: BlockId,
    ) -> u32 {
        match self.get(id) {
            BlockState::Repeat { iterations } => iterations,
            _ => 0,
        }
    }

    /// Mutable Repeat counter, created at zero on first use.
    pub fn iterations_mut(
        &mut self,
        id: BlockId,
    ) -> &mut u32 {
        let slot = self.slot(id);
        if !matches!(slot, BlockState::Repeat { .. }) {
            *slot = BlockState::Repeat { iterations: 0 };
        }
        match slot {
            BlockState::Repeat { iterations } => iterations,
            _ => unreachable!("slot was just set to Repeat"),
        }
    }

    /// Mutable Wait countdown, created idle on first use.
    pub fn countdown_mut(
        &mut self,
        id: BlockId,
    ) -> &mut Countdown {
        let slot = self.slot(id);
        if !matches!(slot, BlockState::Wait(_)) {
            *slot = BlockState::Wait(Countdown::default());
        }
        match slot {
            BlockState::Wait(countdown) => countdown,
            _ => unreachable!("slot was just set to Wait"),
        }
    }

    /// Mutable Glide latch, created idle on first use.
    pub fn glide_mut(
        &mut self,
        id: BlockId,
    ) -> &mut GlideState {
        let slot = self.slot(id);
        if !matches!(slot, BlockState::Glide(_)) {
            *slot = BlockState::Glide(GlideState::default());
        }
        match slot {
            BlockState::Glide(glide) => glide,
            _ => unreachable!("slot was just set to Glide"),
        }
    }
}
