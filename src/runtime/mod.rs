//! Runtime system
//!
//! This module contains the value store, the block graph, per-target state
//! and the tick scheduler, tied together by [`Runtime`].
//!
//! A [`Runtime`] is created from a validated [`Program`] and advanced by the
//! host once per frame. All state lives in the runtime value; nothing is
//! global.

pub mod errors;
pub mod graph;
pub mod scheduler;
pub mod target;
pub mod value;

pub use errors::{ProgramError, ProgramResult};

use tracing::{debug, trace, warn};

use crate::runtime::graph::{BlockGraph, Program, Script, TargetId};
use crate::runtime::scheduler::{ExecContext, Scheduler, SchedulerStats};
use crate::runtime::target::{Position, Target};
use crate::runtime::value::{Number, Value, VariableStore};

/// Execution state of a running program.
///
/// # Examples
///
/// ```
/// use scratch_vm::runtime::graph::{BlockSpec, Expr, ProgramBuilder, Statement};
/// use scratch_vm::runtime::value::Value;
/// use scratch_vm::runtime::Runtime;
///
/// let mut builder = ProgramBuilder::new();
/// let stage = builder.target("Stage").unwrap();
/// let n = builder.variable(stage, "n", Value::number(0.0)).unwrap();
/// builder.script(
///     stage,
///     vec![BlockSpec::in_place(vec![Statement::change(n, Expr::number(1.0))])],
/// );
///
/// let mut runtime = Runtime::init(builder.build().unwrap());
/// runtime.advance(0.5);
/// assert_eq!(runtime.find_variable("Stage", "n"), Some(&Value::number(1.0)));
/// ```
#[derive(Debug)]
pub struct Runtime {
    graph: BlockGraph,
    /// Scripts of each declared target, indexed by [`TargetId`]
    scripts: Vec<Vec<Script>>,
    /// Declared targets, then clones in creation order
    targets: Vec<Target>,
    /// Variable store of each target, same indexing as `targets`
    variables: Vec<VariableStore>,
    scheduler: Scheduler,
    clock: Number,
}

impl Runtime {
    /// Build variable stores, block state and program stacks for `program`.
    pub fn init(program: Program) -> Self {
        let (graph, templates) = program.into_parts();
        let mut scripts = Vec::with_capacity(templates.len());
        let mut targets = Vec::with_capacity(templates.len());
        let mut variables = Vec::with_capacity(templates.len());
        for template in templates {
            targets.push(Target::new(
                template.name,
                None,
                template.position,
                &template.scripts,
                &graph,
            ));
            variables.push(template.variables);
            scripts.push(template.scripts);
        }

        debug!(
            "Runtime initialised: {} targets, {} scripts",
            targets.len(),
            scripts.iter().map(Vec::len).sum::<usize>()
        );
        Self {
            graph,
            scripts,
            targets,
            variables,
            scheduler: Scheduler::new(),
            clock: 0.0,
        }
    }

    /// Advance simulated time by `dt`.
    ///
    /// Targets run in order, each target's scripts in declaration order.
    /// Negative or NaN deltas are treated as zero.
    pub fn advance(
        &mut self,
        dt: Number,
    ) {
        let dt = if dt.is_nan() || dt < 0.0 {
            warn!("Ignoring invalid time delta {}; using 0", dt);
            0.0
        } else {
            dt
        };

        let Runtime {
            graph,
            targets,
            variables,
            scheduler,
            clock,
            ..
        } = self;
        for (index, target) in targets.iter_mut().enumerate() {
            let id = TargetId(index);
            let prototype = target.prototype();
            let mut ctx = ExecContext {
                variables: &mut variables[..],
                position: &mut target.position,
                target: id,
                prototype,
                clock: *clock,
            };
            for (script, stack) in target.stacks.iter_mut().enumerate() {
                if stack.is_idle() {
                    continue;
                }
                scheduler.step(graph, stack, &mut target.states, &mut ctx, dt);
                if stack.is_idle() {
                    debug!("{} script {} finished", id, script);
                }
            }
        }

        self.clock += dt;
        self.scheduler.record_tick();
        trace!(
            "Tick {} done: dt={}, clock={}",
            self.scheduler.stats().ticks,
            dt,
            self.clock
        );
    }

    /// Value of variable `name` in the target named `scope`.
    pub fn find_variable(
        &self,
        scope: &str,
        name: &str,
    ) -> Option<&Value> {
        let id = self.target_id(scope)?;
        self.variables.get(id.0)?.find(name)
    }

    /// Start a clone of target `id`.
    ///
    /// The clone copies the source's current variables and position, starts
    /// every script of the original target from the top, and runs after all
    /// existing targets.
    pub fn clone_target(
        &mut self,
        id: TargetId,
    ) -> Option<TargetId> {
        let source = self.targets.get(id.0)?;
        let root = source.prototype().unwrap_or(id);
        let root_name = self.targets.get(root.0)?.name();
        let count = self
            .targets
            .iter()
            .filter(|t| t.prototype() == Some(root))
            .count();
        let name = format!("{} (clone {})", root_name, count + 1);

        let clone = Target::new(
            name.clone(),
            Some(root),
            source.position(),
            self.scripts.get(root.0)?,
            &self.graph,
        );
        let store = self.variables.get(id.0)?.duplicate(name.as_str());

        let clone_id = TargetId(self.targets.len());
        self.targets.push(clone);
        self.variables.push(store);
        debug!("Cloned {} as {} ({})", id, clone_id, name);
        Some(clone_id)
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    pub fn target_id(
        &self,
        name: &str,
    ) -> Option<TargetId> {
        self.targets.iter().position(|t| t.name() == name).map(TargetId)
    }

    pub fn target(
        &self,
        name: &str,
    ) -> Option<&Target> {
        self.targets.iter().find(|t| t.name() == name)
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    /// Variables of target `id`.
    pub fn variables(
        &self,
        id: TargetId,
    ) -> Option<&VariableStore> {
        self.variables.get(id.0)
    }

    pub fn position(
        &self,
        name: &str,
    ) -> Option<Position> {
        self.target(name).map(Target::position)
    }

    /// Total time advanced so far.
    pub fn clock(&self) -> Number {
        self.clock
    }

    pub fn stats(&self) -> SchedulerStats {
        self.scheduler.stats()
    }

    pub fn graph(&self) -> &BlockGraph {
        &self.graph
    }

    /// Whether every script of every target has finished.
    pub fn is_idle(&self) -> bool {
        self.targets.iter().all(Target::is_idle)
    }
}

#[cfg(test)]
mod tests;
