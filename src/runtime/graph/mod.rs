//! Block graph for Scratch-style scripts
//!
//! This module provides the static structure the scheduler walks: an arena
//! of blocks linked by `next` and `body` ids, the expressions and statements
//! they embed, and the validating builder that produces a [`Program`].
//!
//! # Architecture
//!
//! - [`BlockId`](node_id::BlockId) / [`TargetId`](node_id::TargetId) - Arena indices
//! - [`Block`](block::Block) / [`BlockKind`](block::BlockKind) - Graph nodes
//! - [`Expr`](expr::Expr) / [`Statement`](expr::Statement) - Embedded code
//! - [`BlockGraph`](graph::BlockGraph) - The immutable arena
//! - [`BlockStates`](state::BlockStates) - Per-target mutable block state
//! - [`ProgramBuilder`](builder::ProgramBuilder) - Validating construction

pub mod block;
pub mod builder;
pub mod expr;
pub mod graph;
pub mod node_id;
pub mod state;

pub use block::{Block, BlockKind, BlockSpec};
pub use builder::{Program, ProgramBuilder, Script, TargetTemplate, DEFAULT_MAX_STACK_DEPTH};
pub use expr::{BinaryOp, Expr, Statement, UnaryOp, VarRef};
pub use graph::BlockGraph;
pub use node_id::{BlockId, TargetId};
pub use state::{BlockState, BlockStates, Countdown, GlideState};
