//! Lowering a [`ProjectDef`] into a validated [`Program`]

use indexmap::IndexMap;
use tracing::debug;

use super::def::{BlockDef, ExprDef, Literal, OpDef, ProjectDef, StatementDef, VarName};
use crate::runtime::errors::{ProgramError, ProgramResult};
use crate::runtime::graph::{
    BinaryOp, BlockId, BlockKind, BlockSpec, Expr, Program, ProgramBuilder, Statement, TargetId,
    UnaryOp, VarRef,
};
use crate::runtime::value::Value;

impl ProjectDef {
    /// Build the program described by this project.
    ///
    /// Block names resolve within their own target. Bare variable names
    /// resolve in the owning target first, then in the stage.
    pub fn compile(
        &self,
        max_depth: usize,
    ) -> ProgramResult<Program> {
        let mut builder = ProgramBuilder::new().with_max_depth(max_depth);

        let mut ids = Vec::with_capacity(self.targets.len());
        for def in &self.targets {
            let target = builder.target(&def.name)?;
            builder.set_position(target, def.x, def.y)?;
            for (name, literal) in &def.variables {
                let initial = match literal {
                    Literal::Number(n) => Value::number(*n),
                    Literal::Text(s) => Value::text(s.as_str()),
                };
                builder.variable(target, name, initial)?;
            }
            ids.push(target);
        }
        let stage = self
            .targets
            .iter()
            .position(|t| t.is_stage)
            .map(TargetId);

        // Block ids are handed out in declaration order, so they are known
        // before any block is inserted.
        let mut next_id = builder.next_block_id().0;
        let names: Vec<IndexMap<&str, BlockId>> = self
            .targets
            .iter()
            .map(|def| {
                def.blocks
                    .keys()
                    .map(|name| {
                        let id = BlockId(next_id);
                        next_id += 1;
                        (name.as_str(), id)
                    })
                    .collect()
            })
            .collect();

        for ((def, &target), blocks) in self.targets.iter().zip(&ids).zip(&names) {
            let scope = Scope {
                builder: &builder,
                target,
                target_name: &def.name,
                stage,
                blocks,
            };
            let specs = def
                .blocks
                .values()
                .map(|block| scope.spec(block))
                .collect::<ProgramResult<Vec<_>>>()?;
            for spec in specs {
                builder.block(target, spec);
            }
            for (name, block) in &def.blocks {
                if let Some(next) = &block.next {
                    let from = scope_block(blocks, &def.name, name)?;
                    let to = scope_block(blocks, &def.name, next)?;
                    builder.link(from, to)?;
                }
            }
        }

        debug!("Compiled project with {} targets", self.targets.len());
        builder.build()
    }
}

fn scope_block(
    blocks: &IndexMap<&str, BlockId>,
    target: &str,
    name: &str,
) -> ProgramResult<BlockId> {
    blocks
        .get(name)
        .copied()
        .ok_or_else(|| ProgramError::UnknownBlock {
            target: target.to_string(),
            name: name.to_string(),
        })
}

/// Name resolution context for one target's blocks.
struct Scope<'a> {
    builder: &'a ProgramBuilder,
    target: TargetId,
    target_name: &'a str,
    stage: Option<TargetId>,
    blocks: &'a IndexMap<&'a str, BlockId>,
}

impl Scope<'_> {
    fn block(
        &self,
        name: &Option<String>,
    ) -> ProgramResult<Option<BlockId>> {
        name.as_deref()
            .map(|n| scope_block(self.blocks, self.target_name, n))
            .transpose()
    }

    fn spec(
        &self,
        def: &BlockDef,
    ) -> ProgramResult<BlockSpec> {
        let kind = match &def.op {
            OpDef::WhenFlagClicked => BlockKind::EntryTrigger,
            OpDef::InPlace { statements } => BlockKind::InPlace(
                statements
                    .iter()
                    .map(|s| self.statement(s))
                    .collect::<ProgramResult<_>>()?,
            ),
            OpDef::Repeat { times } => BlockKind::Repeat { times: *times },
            OpDef::RepeatUntil { condition } => BlockKind::RepeatUntil {
                condition: self.expr(condition)?,
            },
            OpDef::Forever => BlockKind::Forever,
            OpDef::If { condition, else_body } => BlockKind::If {
                condition: self.expr(condition)?,
                else_body: self.block(else_body)?,
            },
            OpDef::Wait { duration } => BlockKind::Wait {
                duration: self.expr(duration)?,
            },
            OpDef::Glide { x, y, duration } => BlockKind::Glide {
                x: self.expr(x)?,
                y: self.expr(y)?,
                duration: self.expr(duration)?,
            },
        };
        Ok(BlockSpec::new(kind, self.block(&def.body)?))
    }

    fn variable(
        &self,
        name: &VarName,
    ) -> ProgramResult<VarRef> {
        match name {
            VarName::Local(name) => self
                .builder
                .lookup_variable(self.target, name)
                .or_else(|| {
                    self.stage
                        .and_then(|stage| self.builder.lookup_variable(stage, name))
                })
                .ok_or_else(|| ProgramError::UnknownVariable {
                    target: self.target_name.to_string(),
                    name: name.clone(),
                }),
            VarName::Scoped { target, name } => {
                let id = self
                    .builder
                    .target_id(target)
                    .ok_or_else(|| ProgramError::UnknownTarget(target.clone()))?;
                self.builder
                    .lookup_variable(id, name)
                    .ok_or_else(|| ProgramError::UnknownVariable {
                        target: target.clone(),
                        name: name.clone(),
                    })
            }
        }
    }

    fn statement(
        &self,
        def: &StatementDef,
    ) -> ProgramResult<Statement> {
        Ok(match def {
            StatementDef::SetVariable { variable, value } => {
                Statement::set(self.variable(variable)?, self.expr(value)?)
            }
            StatementDef::ChangeVariableBy { variable, value } => {
                Statement::change(self.variable(variable)?, self.expr(value)?)
            }
            StatementDef::GoTo { x, y } => Statement::GoTo {
                x: self.expr(x)?,
                y: self.expr(y)?,
            },
            StatementDef::SetX(e) => Statement::SetX(self.expr(e)?),
            StatementDef::SetY(e) => Statement::SetY(self.expr(e)?),
            StatementDef::ChangeXBy(e) => Statement::ChangeXBy(self.expr(e)?),
            StatementDef::ChangeYBy(e) => Statement::ChangeYBy(self.expr(e)?),
        })
    }

    fn expr(
        &self,
        def: &ExprDef,
    ) -> ProgramResult<Expr> {
        let binary = |op, a: &ExprDef, b: &ExprDef| -> ProgramResult<Expr> {
            Ok(Expr::binary(op, self.expr(a)?, self.expr(b)?))
        };
        Ok(match def {
            ExprDef::Number(n) => Expr::number(*n),
            ExprDef::Text(s) => Expr::text(s.as_str()),
            ExprDef::Variable(name) => Expr::var(self.variable(name)?),
            ExprDef::Timer => Expr::Timer,
            ExprDef::XPosition => Expr::XPosition,
            ExprDef::YPosition => Expr::YPosition,
            ExprDef::Add(a, b) => binary(BinaryOp::Add, a, b)?,
            ExprDef::Subtract(a, b) => binary(BinaryOp::Subtract, a, b)?,
            ExprDef::Multiply(a, b) => binary(BinaryOp::Multiply, a, b)?,
            ExprDef::Divide(a, b) => binary(BinaryOp::Divide, a, b)?,
            ExprDef::Modulo(a, b) => binary(BinaryOp::Modulo, a, b)?,
            ExprDef::Join(a, b) => binary(BinaryOp::Join, a, b)?,
            ExprDef::LessThan(a, b) => binary(BinaryOp::LessThan, a, b)?,
            ExprDef::GreaterThan(a, b) => binary(BinaryOp::GreaterThan, a, b)?,
            ExprDef::Equals(a, b) => binary(BinaryOp::Equals, a, b)?,
            ExprDef::And(a, b) => binary(BinaryOp::And, a, b)?,
            ExprDef::Or(a, b) => binary(BinaryOp::Or, a, b)?,
            ExprDef::Not(a) => Expr::unary(UnaryOp::Not, self.expr(a)?),
            ExprDef::Sqrt(a) => Expr::unary(UnaryOp::Sqrt, self.expr(a)?),
        })
    }
}
