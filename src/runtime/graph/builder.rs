//! Validating program builder
//!
//! Every way of producing a runnable [`Program`] goes through
//! [`ProgramBuilder`]: the Rust API directly, and JSON projects via
//! [`crate::project`]. [`ProgramBuilder::build`] is the only place a
//! malformed graph can be reported.

use tracing::debug;

use super::block::{Block, BlockKind, BlockSpec};
use super::expr::VarRef;
use super::graph::BlockGraph;
use super::node_id::{BlockId, TargetId};
use crate::runtime::errors::{ProgramError, ProgramResult};
use crate::runtime::target::Position;
use crate::runtime::value::{Value, VariableStore};

/// Default nesting limit for a single script.
pub const DEFAULT_MAX_STACK_DEPTH: usize = 32;

/// An entry-triggered script of a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Script {
    /// The script's entry trigger
    pub entry: BlockId,
    /// Stack frames the script needs
    pub depth: usize,
}

/// Initial state of a target, as declared.
#[derive(Debug, Clone)]
pub struct TargetTemplate {
    pub name: String,
    pub variables: VariableStore,
    pub position: Position,
    pub scripts: Vec<Script>,
}

/// A validated program: block graph plus target templates.
#[derive(Debug, Clone)]
pub struct Program {
    graph: BlockGraph,
    targets: Vec<TargetTemplate>,
}

impl Program {
    pub fn graph(&self) -> &BlockGraph {
        &self.graph
    }

    pub fn targets(&self) -> &[TargetTemplate] {
        &self.targets
    }

    /// Look up a target id by name.
    pub fn target_id(
        &self,
        name: &str,
    ) -> Option<TargetId> {
        self.targets.iter().position(|t| t.name == name).map(TargetId)
    }

    /// Total number of scripts across targets.
    pub fn script_count(&self) -> usize {
        self.targets.iter().map(|t| t.scripts.len()).sum()
    }

    /// Deepest stack any script needs.
    pub fn max_depth(&self) -> usize {
        self.targets
            .iter()
            .flat_map(|t| t.scripts.iter().map(|s| s.depth))
            .max()
            .unwrap_or(0)
    }

    pub fn into_parts(self) -> (BlockGraph, Vec<TargetTemplate>) {
        (self.graph, self.targets)
    }
}

/// Target under construction.
#[derive(Debug)]
struct TargetDraft {
    variables: VariableStore,
    position: Position,
}

/// Builder for [`Program`].
///
/// # Examples
///
/// ```
/// use scratch_vm::runtime::graph::{BlockSpec, Expr, ProgramBuilder, Statement};
/// use scratch_vm::runtime::value::Value;
///
/// let mut builder = ProgramBuilder::new();
/// let stage = builder.target("Stage").unwrap();
/// let n = builder.variable(stage, "n", Value::number(0.0)).unwrap();
/// builder.script(
///     stage,
///     vec![BlockSpec::in_place(vec![Statement::set(n, Expr::number(7.0))])],
/// );
/// let program = builder.build().unwrap();
/// assert_eq!(program.script_count(), 1);
/// ```
#[derive(Debug)]
pub struct ProgramBuilder {
    targets: Vec<TargetDraft>,
    blocks: Vec<Block>,
    max_depth: usize,
}

impl Default for ProgramBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgramBuilder {
    pub fn new() -> Self {
        Self {
            targets: Vec::new(),
            blocks: Vec::new(),
            max_depth: DEFAULT_MAX_STACK_DEPTH,
        }
    }

    /// Set the nesting limit enforced by [`build`](Self::build).
    pub fn with_max_depth(
        mut self,
        limit: usize,
    ) -> Self {
        self.max_depth = limit;
        self
    }

    // ========================================================================
    // Targets and variables
    // ========================================================================

    /// Declare a target. Targets run in declaration order.
    pub fn target(
        &mut self,
        name: &str,
    ) -> ProgramResult<TargetId> {
        if self.target_id(name).is_some() {
            return Err(ProgramError::DuplicateTarget(name.to_string()));
        }
        self.targets.push(TargetDraft {
            variables: VariableStore::new(name),
            position: Position::default(),
        });
        Ok(TargetId(self.targets.len() - 1))
    }

    /// Look up a declared target by name.
    pub fn target_id(
        &self,
        name: &str,
    ) -> Option<TargetId> {
        self.targets
            .iter()
            .position(|t| t.variables.scope() == name)
            .map(TargetId)
    }

    fn draft_mut(
        &mut self,
        target: TargetId,
    ) -> ProgramResult<&mut TargetDraft> {
        self.targets
            .get_mut(target.0)
            .ok_or_else(|| ProgramError::UnknownTarget(target.to_string()))
    }

    /// Declare a variable with its initial value.
    pub fn variable(
        &mut self,
        target: TargetId,
        name: &str,
        initial: Value,
    ) -> ProgramResult<VarRef> {
        let draft = self.draft_mut(target)?;
        match draft.variables.declare(name, initial) {
            Some(slot) => Ok(VarRef::new(target, slot)),
            None => Err(ProgramError::DuplicateVariable {
                target: draft.variables.scope().to_string(),
                name: name.to_string(),
            }),
        }
    }

    /// Look up a declared variable.
    pub fn lookup_variable(
        &self,
        target: TargetId,
        name: &str,
    ) -> Option<VarRef> {
        let draft = self.targets.get(target.0)?;
        draft.variables.slot_of(name).map(|slot| VarRef::new(target, slot))
    }

    /// Set a target's initial position.
    pub fn set_position(
        &mut self,
        target: TargetId,
        x: f64,
        y: f64,
    ) -> ProgramResult<()> {
        self.draft_mut(target)?.position = Position::new(x, y);
        Ok(())
    }

    // ========================================================================
    // Blocks
    // ========================================================================

    /// Id the next inserted block will receive.
    pub fn next_block_id(&self) -> BlockId {
        BlockId(self.blocks.len())
    }

    /// Insert a single unlinked block.
    pub fn block(
        &mut self,
        target: TargetId,
        spec: BlockSpec,
    ) -> BlockId {
        let id = self.next_block_id();
        self.blocks.push(Block {
            target,
            kind: spec.kind,
            next: None,
            body: spec.body,
        });
        id
    }

    /// Set `from.next = to`.
    pub fn link(
        &mut self,
        from: BlockId,
        to: BlockId,
    ) -> ProgramResult<()> {
        let block = self
            .blocks
            .get_mut(from.0)
            .ok_or(ProgramError::DanglingLink { from, to })?;
        block.next = Some(to);
        Ok(())
    }

    /// Insert `specs` as one linked sequence, returning its first block.
    pub fn sequence(
        &mut self,
        target: TargetId,
        specs: impl IntoIterator<Item = BlockSpec>,
    ) -> Option<BlockId> {
        let mut first = None;
        let mut prev: Option<BlockId> = None;
        for spec in specs {
            let id = self.block(target, spec);
            match prev {
                Some(p) => self.blocks[p.0].next = Some(id),
                None => first = Some(id),
            }
            prev = Some(id);
        }
        first
    }

    /// Insert an entry-triggered script, returning the entry trigger.
    pub fn script(
        &mut self,
        target: TargetId,
        specs: impl IntoIterator<Item = BlockSpec>,
    ) -> BlockId {
        let entry = self.block(target, BlockSpec::from(BlockKind::EntryTrigger));
        let first = self.sequence(target, specs);
        self.blocks[entry.0].next = first;
        entry
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Validate the graph and produce a [`Program`].
    pub fn build(self) -> ProgramResult<Program> {
        self.check_links()?;
        self.check_variables()?;

        let graph = BlockGraph::from_blocks(self.blocks);
        let mut targets = Vec::with_capacity(self.targets.len());
        for (index, draft) in self.targets.into_iter().enumerate() {
            let mut scripts = Vec::new();
            for entry in graph.entries_of(TargetId(index)) {
                let first = graph.get(entry).and_then(|b| b.next);
                let depth = graph.frames_needed(first, self.max_depth);
                if depth > self.max_depth {
                    return Err(ProgramError::DepthOverflow {
                        entry,
                        depth,
                        limit: self.max_depth,
                    });
                }
                scripts.push(Script { entry, depth });
            }
            targets.push(TargetTemplate {
                name: draft.variables.scope().to_string(),
                variables: draft.variables,
                position: draft.position,
                scripts,
            });
        }

        debug!(
            "Built program: {} targets, {} blocks",
            targets.len(),
            graph.len()
        );
        Ok(Program { graph, targets })
    }

    fn check_links(&self) -> ProgramResult<()> {
        let mut in_degree = vec![0usize; self.blocks.len()];
        for (index, block) in self.blocks.iter().enumerate() {
            let from = BlockId(index);
            if block.target.0 >= self.targets.len() {
                return Err(ProgramError::UnknownTarget(block.target.to_string()));
            }
            if block.body.is_some() && !block.kind.has_body() {
                return Err(ProgramError::UnexpectedBody(from));
            }
            for to in block.next.into_iter().chain(block.children()) {
                let linked = self
                    .blocks
                    .get(to.0)
                    .ok_or(ProgramError::DanglingLink { from, to })?;
                if linked.target != block.target {
                    return Err(ProgramError::CrossTargetLink { from, to });
                }
                if linked.kind == BlockKind::EntryTrigger {
                    return Err(ProgramError::MisplacedEntryTrigger(to));
                }
                in_degree[to.0] += 1;
                if in_degree[to.0] > 1 {
                    return Err(ProgramError::SharedBlock(to));
                }
            }
        }
        Ok(())
    }

    fn check_variables(&self) -> ProgramResult<()> {
        let mut invalid = None;
        let mut check = |var: VarRef| {
            let valid = self
                .targets
                .get(var.target.0)
                .is_some_and(|t| var.slot < t.variables.len());
            if !valid && invalid.is_none() {
                invalid = Some(var);
            }
        };
        for block in &self.blocks {
            if let BlockKind::InPlace(statements) = &block.kind {
                statements.iter().filter_map(|s| s.target_var()).for_each(&mut check);
            }
            for expr in block.kind.exprs() {
                expr.for_each_var(&mut check);
            }
        }
        match invalid {
            Some(var) => Err(ProgramError::InvalidVariableRef {
                target: var.target,
                slot: var.slot,
            }),
            None => Ok(()),
        }
    }
}
