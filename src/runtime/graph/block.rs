//! Block nodes of the execution graph
//!
//! A block is one script operation or control construct. Its links (`next`,
//! `body`, the If `else_body`) are fixed when the graph is built; the only
//! run-time state a block has lives in the per-target
//! [`BlockStates`](super::state::BlockStates) table.

use std::fmt;

use super::expr::{Expr, Statement};
use super::node_id::{BlockId, TargetId};

/// Kind of block and its per-kind payload.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockKind {
    /// First node of a script ("when flag clicked"); never executed.
    EntryTrigger,

    /// Runs every statement synchronously within the current tick.
    InPlace(Vec<Statement>),

    /// Runs `body` a fixed number of times, one pass per visit.
    Repeat {
        /// Target iteration count
        times: u32,
    },

    /// Runs `body` until the condition holds.
    RepeatUntil {
        /// Exit condition, evaluated on every visit
        condition: Expr,
    },

    /// Runs `body` on every visit; never falls through.
    Forever,

    /// Runs `body` when the condition holds, else `else_body` if present.
    If {
        /// Branch condition
        condition: Expr,
        /// Optional else branch
        else_body: Option<BlockId>,
    },

    /// Suspends the script until the latched duration has elapsed.
    Wait {
        /// Duration, evaluated once per activation
        duration: Expr,
    },

    /// Moves the target linearly to `(x, y)` over the latched duration.
    Glide {
        /// Destination x
        x: Expr,
        /// Destination y
        y: Expr,
        /// Duration, evaluated once per activation
        duration: Expr,
    },
}

impl BlockKind {
    /// Short operation name for logs and summaries.
    pub fn op_name(&self) -> &'static str {
        match self {
            BlockKind::EntryTrigger => "entry_trigger",
            BlockKind::InPlace(_) => "in_place",
            BlockKind::Repeat { .. } => "repeat",
            BlockKind::RepeatUntil { .. } => "repeat_until",
            BlockKind::Forever => "forever",
            BlockKind::If { .. } => "if",
            BlockKind::Wait { .. } => "wait",
            BlockKind::Glide { .. } => "glide",
        }
    }

    /// Whether this kind owns a nested body.
    #[inline]
    pub fn has_body(&self) -> bool {
        matches!(
            self,
            BlockKind::Repeat { .. } | BlockKind::RepeatUntil { .. } | BlockKind::Forever | BlockKind::If { .. }
        )
    }

    /// Every expression the block evaluates, statements included.
    pub fn exprs(&self) -> Vec<&Expr> {
        match self {
            BlockKind::EntryTrigger | BlockKind::Repeat { .. } | BlockKind::Forever => Vec::new(),
            BlockKind::InPlace(statements) => statements.iter().flat_map(Statement::exprs).collect(),
            BlockKind::RepeatUntil { condition } | BlockKind::If { condition, .. } => vec![condition],
            BlockKind::Wait { duration } => vec![duration],
            BlockKind::Glide { x, y, duration } => vec![x, y, duration],
        }
    }
}

/// A node of the block graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// Target whose scripts contain this block
    pub target: TargetId,
    /// Behavior and payload
    pub kind: BlockKind,
    /// Following block in the same sequence
    pub next: Option<BlockId>,
    /// First block of the nested sequence (loops and If)
    pub body: Option<BlockId>,
}

impl Block {
    /// Nested sequences owned by this block: `body`, then the If else branch.
    pub fn children(&self) -> impl Iterator<Item = BlockId> + '_ {
        let else_body = match &self.kind {
            BlockKind::If { else_body, .. } => *else_body,
            _ => None,
        };
        self.body.into_iter().chain(else_body)
    }
}

impl fmt::Display for Block {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}", self.kind.op_name())?;
        if let Some(body) = self.body {
            write!(f, " body={}", body)?;
        }
        if let Some(next) = self.next {
            write!(f, " -> {}", next)?;
        }
        Ok(())
    }
}

/// Block description handed to the builder: kind plus nested body.
///
/// `next` links are assigned by the builder when specs are sequenced.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockSpec {
    pub kind: BlockKind,
    pub body: Option<BlockId>,
}

impl BlockSpec {
    pub fn new(
        kind: BlockKind,
        body: Option<BlockId>,
    ) -> Self {
        Self { kind, body }
    }

    pub fn in_place(statements: Vec<Statement>) -> Self {
        Self::new(BlockKind::InPlace(statements), None)
    }

    pub fn repeat(
        times: u32,
        body: Option<BlockId>,
    ) -> Self {
        Self::new(BlockKind::Repeat { times }, body)
    }

    pub fn repeat_until(
        condition: Expr,
        body: Option<BlockId>,
    ) -> Self {
        Self::new(BlockKind::RepeatUntil { condition }, body)
    }

    pub fn forever(body: Option<BlockId>) -> Self {
        Self::new(BlockKind::Forever, body)
    }

    pub fn if_then(
        condition: Expr,
        body: Option<BlockId>,
    ) -> Self {
        Self::new(
            BlockKind::If {
                condition,
                else_body: None,
            },
            body,
        )
    }

    pub fn if_else(
        condition: Expr,
        body: Option<BlockId>,
        else_body: Option<BlockId>,
    ) -> Self {
        Self::new(BlockKind::If { condition, else_body }, body)
    }

    pub fn wait(duration: Expr) -> Self {
        Self::new(BlockKind::Wait { duration }, None)
    }

    pub fn glide(
        x: Expr,
        y: Expr,
        duration: Expr,
    ) -> Self {
        Self::new(BlockKind::Glide { x, y, duration }, None)
    }
}

impl From<BlockKind> for BlockSpec {
    fn from(kind: BlockKind) -> Self {
        Self::new(kind, None)
    }
}
