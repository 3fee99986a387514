//! Program construction errors

use thiserror::Error;

use crate::runtime::graph::{BlockId, TargetId};

/// Program construction result
pub type ProgramResult<T> = Result<T, ProgramError>;

/// Errors raised while building or validating a [`Program`](crate::runtime::graph::Program).
///
/// Nothing fails once a program is running; every malformed graph is
/// rejected here.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProgramError {
    #[error("Duplicate target: {0}")]
    DuplicateTarget(String),

    #[error("Duplicate variable '{name}' in target '{target}'")]
    DuplicateVariable { target: String, name: String },

    #[error("Unknown target: {0}")]
    UnknownTarget(String),

    #[error("Unknown variable '{name}' in target '{target}'")]
    UnknownVariable { target: String, name: String },

    #[error("Unknown block '{name}' in target '{target}'")]
    UnknownBlock { target: String, name: String },

    #[error("Invalid variable reference: slot {slot} of {target}")]
    InvalidVariableRef { target: TargetId, slot: usize },

    #[error("Dangling link from {from} to {to}")]
    DanglingLink { from: BlockId, to: BlockId },

    #[error("{from} links to {to}, which belongs to another target")]
    CrossTargetLink { from: BlockId, to: BlockId },

    #[error("{0} is linked from more than one block")]
    SharedBlock(BlockId),

    #[error("Entry trigger {0} is linked from another block")]
    MisplacedEntryTrigger(BlockId),

    #[error("{0} has a body but its kind does not run one")]
    UnexpectedBody(BlockId),

    #[error("Script starting at {entry} nests {depth} frames deep (limit {limit})")]
    DepthOverflow { entry: BlockId, depth: usize, limit: usize },
}
