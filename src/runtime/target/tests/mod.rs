//! Program stack and target tests

use crate::runtime::graph::{BlockId, BlockSpec, ProgramBuilder};
use crate::runtime::target::{Position, ProgramStack, Target};

#[test]
fn test_new_stack_points_at_first_block() {
    let stack = ProgramStack::new(Some(BlockId(3)), 4);
    assert_eq!(stack.cursor_index(), Some(0));
    assert_eq!(stack.current(), Some(BlockId(3)));
    assert!(!stack.is_idle());
}

#[test]
fn test_push_advance_pop() {
    let mut stack = ProgramStack::new(Some(BlockId(1)), 2);
    assert!(stack.push(Some(BlockId(5))));
    assert_eq!(stack.cursor_index(), Some(1));
    stack.advance(None);
    assert_eq!(stack.top(), Some(None));
    assert_eq!(stack.current(), None);

    assert_eq!(stack.pop(), Some(None));
    assert_eq!(stack.current(), Some(BlockId(1)));
    stack.pop();
    assert!(stack.is_idle());
    assert_eq!(stack.cursor_index(), None);
    assert_eq!(stack.top(), None);
}

#[test]
fn test_push_beyond_capacity_refused() {
    let mut stack = ProgramStack::new(None, 1);
    assert!(!stack.push(Some(BlockId(0))));
    assert_eq!(stack.depth(), 1);
}

#[test]
fn test_empty_script_stack_starts_exhausted() {
    let stack = ProgramStack::new(None, 1);
    assert_eq!(stack.top(), Some(None));
    assert!(!stack.is_idle());
}

#[test]
fn test_target_gets_one_stack_per_script() {
    let mut b = ProgramBuilder::new();
    let stage = b.target("Stage").unwrap();
    b.script(stage, vec![BlockSpec::in_place(vec![])]);
    b.script(stage, vec![BlockSpec::forever(None)]);
    let program = b.build().unwrap();
    let template = &program.targets()[0];

    let target = Target::new(
        template.name.clone(),
        None,
        Position::new(1.0, 2.0),
        &template.scripts,
        program.graph(),
    );
    assert_eq!(target.name(), "Stage");
    assert_eq!(target.stacks().len(), 2);
    assert_eq!(target.stacks()[1].capacity(), 2);
    assert_eq!(target.position(), Position::new(1.0, 2.0));
    assert_eq!(target.states().len(), program.graph().len());
    assert!(!target.is_clone());
    assert!(!target.is_idle());
}

#[test]
fn test_position_display() {
    assert_eq!(Position::new(1.5, -2.0).to_string(), "(1.5, -2)");
}
