//! Expression evaluation and statement execution

use tracing::error;

use crate::runtime::graph::{BinaryOp, Expr, Statement, TargetId, UnaryOp, VarRef};
use crate::runtime::target::Position;
use crate::runtime::value::{ops, Number, Text, Value, VariableStore};

/// Everything a block of one target may read or write during a tick.
#[derive(Debug)]
pub struct ExecContext<'a> {
    /// Variable stores of every target, indexed by [`TargetId`]
    pub variables: &'a mut [VariableStore],
    /// Position of the running target
    pub position: &'a mut Position,
    /// Running target
    pub target: TargetId,
    /// Original target when the running target is a clone
    pub prototype: Option<TargetId>,
    /// Runtime clock before the current tick
    pub clock: Number,
}

impl ExecContext<'_> {
    /// Redirect references to the prototype's variables to the clone's own.
    #[inline]
    pub fn resolve(
        &self,
        var: VarRef,
    ) -> VarRef {
        match self.prototype {
            Some(proto) if var.target == proto => VarRef::new(self.target, var.slot),
            _ => var,
        }
    }

    /// Current value of a variable; bare when the reference does not resolve.
    pub fn read(
        &self,
        var: VarRef,
    ) -> &Value {
        const BARE: &Value = &Value::Number(0.0);
        let resolved = self.resolve(var);
        match self
            .variables
            .get(resolved.target.0)
            .and_then(|store| store.get(resolved.slot))
        {
            Some(value) => value,
            None => {
                error!(
                    "{} read unresolved variable {} slot {}",
                    self.target, resolved.target, resolved.slot
                );
                BARE
            }
        }
    }

    fn slot_mut(
        &mut self,
        var: VarRef,
    ) -> Option<&mut Value> {
        let resolved = self.resolve(var);
        let slot = self
            .variables
            .get_mut(resolved.target.0)
            .and_then(|store| store.get_mut(resolved.slot));
        if slot.is_none() {
            error!(
                "{} wrote unresolved variable {} slot {}",
                self.target, resolved.target, resolved.slot
            );
        }
        slot
    }

    /// Evaluate `expr` into a fresh temporary.
    pub fn eval(
        &self,
        expr: &Expr,
    ) -> Value {
        match expr {
            Expr::Number(n) => Value::number(*n),
            Expr::Text(s) => Value::Text(Text::Literal(s.clone())),
            Expr::Variable(var) => self.read(*var).clone(),
            Expr::Timer => Value::number(self.clock),
            Expr::XPosition => Value::number(self.position.x),
            Expr::YPosition => Value::number(self.position.y),
            Expr::Binary(op, lhs, rhs) => {
                let a = self.eval(lhs);
                let b = self.eval(rhs);
                match op {
                    BinaryOp::Add => ops::add(&a, &b),
                    BinaryOp::Subtract => ops::subtract(&a, &b),
                    BinaryOp::Multiply => ops::multiply(&a, &b),
                    BinaryOp::Divide => ops::divide(&a, &b),
                    BinaryOp::Modulo => ops::modulo(&a, &b),
                    BinaryOp::Join => ops::join(&a, &b),
                    BinaryOp::LessThan => ops::less_than(&a, &b),
                    BinaryOp::GreaterThan => ops::greater_than(&a, &b),
                    BinaryOp::Equals => ops::equals(&a, &b),
                    BinaryOp::And => ops::and(&a, &b),
                    BinaryOp::Or => ops::or(&a, &b),
                }
            }
            Expr::Unary(op, operand) => {
                let a = self.eval(operand);
                match op {
                    UnaryOp::Sqrt => ops::sqrt(&a),
                    UnaryOp::Not => ops::not(&a),
                }
            }
        }
    }

    /// Run one statement.
    pub fn execute(
        &mut self,
        statement: &Statement,
    ) {
        match statement {
            Statement::SetVariable { variable, value } => {
                let value = self.eval(value);
                if let Some(slot) = self.slot_mut(*variable) {
                    slot.assign_owned(value);
                }
            }
            Statement::ChangeVariableBy { variable, delta } => {
                let delta = self.eval(delta).read_number();
                if let Some(slot) = self.slot_mut(*variable) {
                    let n = slot.read_number() + delta;
                    slot.assign_number(n);
                }
            }
            Statement::GoTo { x, y } => {
                let x = self.eval(x).read_number();
                let y = self.eval(y).read_number();
                *self.position = Position::new(x, y);
            }
            Statement::SetX(x) => {
                let x = self.eval(x).read_number();
                self.position.x = x;
            }
            Statement::SetY(y) => {
                let y = self.eval(y).read_number();
                self.position.y = y;
            }
            Statement::ChangeXBy(dx) => {
                let dx = self.eval(dx).read_number();
                self.position.x += dx;
            }
            Statement::ChangeYBy(dy) => {
                let dy = self.eval(dy).read_number();
                self.position.y += dy;
            }
        }
    }
}
