//! Cooperative tick scheduler
//!
//! This module provides the [`Scheduler`], which advances one
//! [`ProgramStack`] through the block graph by a single time delta.
//!
//! # Tick algorithm
//!
//! 1. An empty stack is idle; nothing happens.
//! 2. When the top cursor is exhausted, a nested invocation returns to its
//!    caller; the outermost invocation pops the frame and retries.
//! 3. Otherwise the block is visited. `Continue` advances to `next` in the
//!    same tick, `Suspend` ends the tick with the cursor kept, and entering a
//!    body pushes a frame and runs one nested level on it before returning.
//!
//! InPlace blocks always continue, so any run of them costs no ticks.

pub mod context;

pub use context::ExecContext;

#[cfg(feature = "debug")]
use tracing::trace;
use tracing::error;

use crate::runtime::graph::{Block, BlockGraph, BlockId, BlockKind, BlockStates};
use crate::runtime::target::{Position, ProgramStack};
use crate::runtime::value::Number;

/// Outcome of visiting one block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Advance to `next` and keep going in this tick.
    Continue,
    /// Stop this script for the tick; the cursor stays on the block.
    Suspend,
    /// Set the current frame's cursor to `resume`, then run `body` on a new frame.
    Enter {
        body: Option<BlockId>,
        resume: Option<BlockId>,
    },
}

/// Scheduler counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    /// Completed `advance` calls
    pub ticks: u64,
    /// Blocks visited
    pub visits: u64,
    /// Visits that ended a script's tick
    pub suspensions: u64,
    /// Frames pushed for loop and If bodies
    pub frames_pushed: u64,
}

/// Drives program stacks through the block graph.
#[derive(Debug, Default)]
pub struct Scheduler {
    stats: SchedulerStats,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> SchedulerStats {
        self.stats
    }

    /// Count a completed tick.
    pub(crate) fn record_tick(&mut self) {
        self.stats.ticks += 1;
    }

    /// Advance `stack` by `dt`. `dt` must already be sanitized.
    pub fn step(
        &mut self,
        graph: &BlockGraph,
        stack: &mut ProgramStack,
        states: &mut BlockStates,
        ctx: &mut ExecContext<'_>,
        dt: Number,
    ) {
        self.run(graph, stack, states, ctx, dt, false);
    }

    fn run(
        &mut self,
        graph: &BlockGraph,
        stack: &mut ProgramStack,
        states: &mut BlockStates,
        ctx: &mut ExecContext<'_>,
        dt: Number,
        nested: bool,
    ) {
        // `top` is `None` when idle, `Some(None)` when the frame is exhausted.
        while let Some(top) = stack.top() {
            let Some(id) = top else {
                if nested {
                    return;
                }
                stack.pop();
                continue;
            };
            let Some(block) = graph.get(id) else {
                error!("Cursor points outside the block graph: {}", id);
                stack.advance(None);
                continue;
            };

            self.stats.visits += 1;
            match self.visit(id, block, states, ctx, dt) {
                Flow::Continue => stack.advance(block.next),
                Flow::Suspend => {
                    self.stats.suspensions += 1;
                    return;
                }
                Flow::Enter { body, resume } => {
                    stack.advance(resume);
                    if !stack.push(body) {
                        error!(
                            "Stack capacity {} exceeded entering body of {}",
                            stack.capacity(),
                            id
                        );
                        return;
                    }
                    self.stats.frames_pushed += 1;
                    self.run(graph, stack, states, ctx, dt, true);
                    return;
                }
            }
        }
    }

    /// Run one block and report how control proceeds.
    pub fn visit(
        &mut self,
        id: BlockId,
        block: &Block,
        states: &mut BlockStates,
        ctx: &mut ExecContext<'_>,
        dt: Number,
    ) -> Flow {
        #[cfg(feature = "debug")]
        trace!("{} visit {} ({})", ctx.target, id, block.kind.op_name());

        match &block.kind {
            // Scripts start after their trigger; reaching one means nothing to run.
            BlockKind::EntryTrigger => Flow::Continue,

            BlockKind::InPlace(statements) => {
                for statement in statements {
                    ctx.execute(statement);
                }
                Flow::Continue
            }

            BlockKind::Repeat { times } => {
                let iterations = states.iterations_mut(id);
                if *iterations < *times {
                    *iterations += 1;
                    Flow::Enter {
                        body: block.body,
                        resume: Some(id),
                    }
                } else {
                    Flow::Continue
                }
            }

            BlockKind::RepeatUntil { condition } => {
                if ctx.eval(condition).is_truthy() {
                    Flow::Continue
                } else {
                    Flow::Enter {
                        body: block.body,
                        resume: Some(id),
                    }
                }
            }

            BlockKind::Forever => Flow::Enter {
                body: block.body,
                resume: Some(id),
            },

            BlockKind::If { condition, else_body } => {
                let branch = if ctx.eval(condition).is_truthy() {
                    Some(block.body)
                } else {
                    else_body.map(Some)
                };
                match branch {
                    Some(body) => Flow::Enter {
                        body,
                        resume: block.next,
                    },
                    None => Flow::Continue,
                }
            }

            BlockKind::Wait { duration } => {
                if !states.countdown_mut(id).started {
                    let timeout = ctx.eval(duration).read_number();
                    states.countdown_mut(id).start(timeout);
                }
                if states.countdown_mut(id).tick(dt) {
                    Flow::Continue
                } else {
                    Flow::Suspend
                }
            }

            BlockKind::Glide { x, y, duration } => {
                if !states.glide_mut(id).countdown.started {
                    let to = (ctx.eval(x).read_number(), ctx.eval(y).read_number());
                    let timeout = ctx.eval(duration).read_number();
                    let glide = states.glide_mut(id);
                    glide.from = (ctx.position.x, ctx.position.y);
                    glide.to = to;
                    glide.countdown.start(timeout);
                }
                let glide = states.glide_mut(id);
                if glide.countdown.tick(dt) {
                    *ctx.position = Position::new(glide.to.0, glide.to.1);
                    Flow::Continue
                } else {
                    let (gx, gy) = glide.position();
                    *ctx.position = Position::new(gx, gy);
                    Flow::Suspend
                }
            }
        }
    }
}

#[cfg(test)]
mod tests;
