//! Expressions and statements embedded in blocks
//!
//! Expressions are small trees evaluated on demand into fresh [`Value`]s.
//! Statements are the side-effecting operations an InPlace block runs.

use std::sync::Arc;

use super::node_id::TargetId;
use crate::runtime::value::Number;

/// Reference to a declared variable: owning target plus slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VarRef {
    /// Target whose store declares the variable
    pub target: TargetId,
    /// Slot in that store
    pub slot: usize,
}

impl VarRef {
    #[inline]
    pub fn new(
        target: TargetId,
        slot: usize,
    ) -> Self {
        Self { target, slot }
    }
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Join,
    LessThan,
    GreaterThan,
    Equals,
    And,
    Or,
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Sqrt,
    Not,
}

/// Expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Numeric literal
    Number(Number),
    /// Text literal, shared with every value read from it
    Text(Arc<str>),
    /// Copy of a variable's current value
    Variable(VarRef),
    /// Runtime clock before the current tick
    Timer,
    /// X position of the running target
    XPosition,
    /// Y position of the running target
    YPosition,
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    Unary(UnaryOp, Box<Expr>),
}

impl Expr {
    #[inline]
    pub fn number(n: Number) -> Self {
        Expr::Number(n)
    }

    #[inline]
    pub fn text(s: impl Into<Arc<str>>) -> Self {
        Expr::Text(s.into())
    }

    #[inline]
    pub fn var(var: VarRef) -> Self {
        Expr::Variable(var)
    }

    #[inline]
    pub fn binary(
        op: BinaryOp,
        lhs: Expr,
        rhs: Expr,
    ) -> Self {
        Expr::Binary(op, Box::new(lhs), Box::new(rhs))
    }

    #[inline]
    pub fn unary(
        op: UnaryOp,
        operand: Expr,
    ) -> Self {
        Expr::Unary(op, Box::new(operand))
    }

    pub fn join(
        lhs: Expr,
        rhs: Expr,
    ) -> Self {
        Expr::binary(BinaryOp::Join, lhs, rhs)
    }

    pub fn sum(
        lhs: Expr,
        rhs: Expr,
    ) -> Self {
        Expr::binary(BinaryOp::Add, lhs, rhs)
    }

    pub fn product(
        lhs: Expr,
        rhs: Expr,
    ) -> Self {
        Expr::binary(BinaryOp::Multiply, lhs, rhs)
    }

    pub fn sqrt(operand: Expr) -> Self {
        Expr::unary(UnaryOp::Sqrt, operand)
    }

    /// Visit every variable reference in the tree.
    pub fn for_each_var(
        &self,
        f: &mut impl FnMut(VarRef),
    ) {
        match self {
            Expr::Variable(var) => f(*var),
            Expr::Binary(_, lhs, rhs) => {
                lhs.for_each_var(f);
                rhs.for_each_var(f);
            }
            Expr::Unary(_, operand) => operand.for_each_var(f),
            Expr::Number(_) | Expr::Text(_) | Expr::Timer | Expr::XPosition | Expr::YPosition => {}
        }
    }
}

/// Side-effecting statement run by an InPlace block.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `data_setvariableto`
    SetVariable { variable: VarRef, value: Expr },
    /// `data_changevariableby`
    ChangeVariableBy { variable: VarRef, delta: Expr },
    /// `motion_gotoxy`
    GoTo { x: Expr, y: Expr },
    /// `motion_setx`
    SetX(Expr),
    /// `motion_sety`
    SetY(Expr),
    /// `motion_changexby`
    ChangeXBy(Expr),
    /// `motion_changeyby`
    ChangeYBy(Expr),
}

impl Statement {
    /// Shorthand for [`Statement::SetVariable`].
    pub fn set(
        variable: VarRef,
        value: Expr,
    ) -> Self {
        Statement::SetVariable { variable, value }
    }

    /// Shorthand for [`Statement::ChangeVariableBy`].
    pub fn change(
        variable: VarRef,
        delta: Expr,
    ) -> Self {
        Statement::ChangeVariableBy { variable, delta }
    }

    /// Variable written by this statement, if any.
    pub fn target_var(&self) -> Option<VarRef> {
        match self {
            Statement::SetVariable { variable, .. } | Statement::ChangeVariableBy { variable, .. } => {
                Some(*variable)
            }
            _ => None,
        }
    }

    /// Expressions read by this statement.
    pub fn exprs(&self) -> Vec<&Expr> {
        match self {
            Statement::SetVariable { value, .. } => vec![value],
            Statement::ChangeVariableBy { delta, .. } => vec![delta],
            Statement::GoTo { x, y } => vec![x, y],
            Statement::SetX(e) | Statement::SetY(e) | Statement::ChangeXBy(e) | Statement::ChangeYBy(e) => {
                vec![e]
            }
        }
    }
}
