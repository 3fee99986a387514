//! Running targets
//!
//! A target (the stage, a sprite or a clone) owns a position, a block state
//! table and one [`ProgramStack`] per entry-triggered script. Its variables
//! live in the runtime's store list at the same index.

pub mod stack;

pub use stack::ProgramStack;

use std::fmt;

use crate::runtime::graph::{BlockGraph, BlockStates, Script, TargetId};
use crate::runtime::value::Number;

/// Stage coordinates of a target.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Position {
    pub x: Number,
    pub y: Number,
}

impl Position {
    #[inline]
    pub fn new(
        x: Number,
        y: Number,
    ) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Runtime state of one target.
#[derive(Debug, Clone)]
pub struct Target {
    name: String,
    /// Original target whose blocks this one runs, set for clones
    prototype: Option<TargetId>,
    pub(crate) position: Position,
    pub(crate) stacks: Vec<ProgramStack>,
    pub(crate) states: BlockStates,
}

impl Target {
    /// Fresh target running `scripts` from their first block.
    pub fn new(
        name: impl Into<String>,
        prototype: Option<TargetId>,
        position: Position,
        scripts: &[Script],
        graph: &BlockGraph,
    ) -> Self {
        let stacks = scripts
            .iter()
            .map(|script| {
                let first = graph.get(script.entry).and_then(|b| b.next);
                ProgramStack::new(first, script.depth)
            })
            .collect();
        Self {
            name: name.into(),
            prototype,
            position,
            stacks,
            states: BlockStates::new(graph.len()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Original target for a clone, `None` for declared targets.
    pub fn prototype(&self) -> Option<TargetId> {
        self.prototype
    }

    pub fn is_clone(&self) -> bool {
        self.prototype.is_some()
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Program stacks in script declaration order.
    pub fn stacks(&self) -> &[ProgramStack] {
        &self.stacks
    }

    pub fn states(&self) -> &BlockStates {
        &self.states
    }

    /// Whether every script has finished.
    pub fn is_idle(&self) -> bool {
        self.stacks.iter().all(ProgramStack::is_idle)
    }
}

#[cfg(test)]
mod tests;
