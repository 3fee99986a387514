//! Runtime tests: initialisation, lookup, clones and delta handling

use crate::runtime::graph::{BlockSpec, Expr, ProgramBuilder, Statement, TargetId};
use crate::runtime::target::Position;
use crate::runtime::value::Value;
use crate::runtime::Runtime;

fn counter_program() -> ProgramBuilder {
    let mut b = ProgramBuilder::new();
    let stage = b.target("Stage").unwrap();
    let sprite = b.target("Sprite1").unwrap();
    b.set_position(sprite, 10.0, 5.0).unwrap();
    b.variable(stage, "zero", Value::number(0.0)).unwrap();
    let n = b.variable(sprite, "n", Value::number(0.0)).unwrap();
    let body = b.sequence(
        sprite,
        vec![BlockSpec::in_place(vec![
            Statement::change(n, Expr::number(1.0)),
            Statement::ChangeXBy(Expr::number(1.0)),
        ])],
    );
    b.script(sprite, vec![BlockSpec::forever(body)]);
    b
}

#[test]
fn test_init_exposes_declared_state() {
    let rt = Runtime::init(counter_program().build().unwrap());
    assert_eq!(rt.targets().len(), 2);
    assert_eq!(rt.target_id("Sprite1"), Some(TargetId(1)));
    assert_eq!(rt.position("Sprite1"), Some(Position::new(10.0, 5.0)));
    assert_eq!(rt.clock(), 0.0);
    assert_eq!(rt.stats().ticks, 0);
    assert_eq!(rt.variables(TargetId(1)).unwrap().len(), 1);
}

#[test]
fn test_find_variable_miss_is_distinct_from_zero() {
    let rt = Runtime::init(counter_program().build().unwrap());
    assert_eq!(rt.find_variable("Stage", "zero"), Some(&Value::number(0.0)));
    assert_eq!(rt.find_variable("Stage", "n"), None);
    assert_eq!(rt.find_variable("Nobody", "zero"), None);
}

#[test]
fn test_invalid_delta_treated_as_zero() {
    let mut b = ProgramBuilder::new();
    let stage = b.target("Stage").unwrap();
    let done = b.variable(stage, "done", Value::number(0.0)).unwrap();
    b.script(
        stage,
        vec![
            BlockSpec::wait(Expr::number(1.0)),
            BlockSpec::in_place(vec![Statement::set(done, Expr::number(1.0))]),
        ],
    );
    let mut rt = Runtime::init(b.build().unwrap());

    rt.advance(-5.0);
    rt.advance(f64::NAN);
    assert_eq!(rt.clock(), 0.0);
    assert_eq!(rt.stats().ticks, 2);

    rt.advance(1.0);
    assert_eq!(rt.find_variable("Stage", "done"), Some(&Value::number(1.0)));
}

#[test]
fn test_clone_runs_with_independent_state() {
    let mut rt = Runtime::init(counter_program().build().unwrap());
    rt.advance(0.1);
    rt.advance(0.1);

    let clone = rt.clone_target(TargetId(1)).unwrap();
    assert_eq!(clone, TargetId(2));
    let name = rt.targets()[2].name().to_string();
    assert_eq!(name, "Sprite1 (clone 1)");
    assert!(rt.targets()[2].is_clone());
    assert_eq!(rt.find_variable(&name, "n"), Some(&Value::number(2.0)));
    assert_eq!(rt.position(&name), Some(Position::new(12.0, 5.0)));

    rt.advance(0.1);
    // The clone's script writes its own copy of `n` and its own position.
    assert_eq!(rt.find_variable("Sprite1", "n"), Some(&Value::number(3.0)));
    assert_eq!(rt.find_variable(&name, "n"), Some(&Value::number(3.0)));
    rt.advance(0.1);
    assert_eq!(rt.find_variable("Sprite1", "n"), Some(&Value::number(4.0)));
    assert_eq!(rt.find_variable(&name, "n"), Some(&Value::number(4.0)));
    assert_eq!(rt.position("Sprite1"), Some(Position::new(14.0, 5.0)));
    assert_eq!(rt.position(&name), Some(Position::new(14.0, 5.0)));
}

#[test]
fn test_clone_of_clone_shares_original_blocks() {
    let mut rt = Runtime::init(counter_program().build().unwrap());
    let first = rt.clone_target(TargetId(1)).unwrap();
    let second = rt.clone_target(first).unwrap();
    assert_eq!(rt.targets()[second.0].name(), "Sprite1 (clone 2)");
    assert_eq!(rt.targets()[second.0].prototype(), Some(TargetId(1)));

    rt.advance(0.1);
    assert_eq!(
        rt.find_variable("Sprite1 (clone 2)", "n"),
        Some(&Value::number(1.0))
    );
    assert_eq!(rt.clone_target(TargetId(9)), None);
}

#[test]
fn test_targets_run_in_declaration_order() {
    let mut b = ProgramBuilder::new();
    let stage = b.target("Stage").unwrap();
    let sprite = b.target("Sprite1").unwrap();
    let shared = b.variable(stage, "shared", Value::number(0.0)).unwrap();
    let seen = b.variable(sprite, "seen", Value::number(0.0)).unwrap();
    b.script(
        stage,
        vec![BlockSpec::in_place(vec![Statement::set(shared, Expr::number(5.0))])],
    );
    b.script(
        sprite,
        vec![BlockSpec::in_place(vec![Statement::set(seen, Expr::var(shared))])],
    );
    let mut rt = Runtime::init(b.build().unwrap());

    rt.advance(0.0);
    assert_eq!(rt.find_variable("Sprite1", "seen"), Some(&Value::number(5.0)));
}

#[test]
fn test_set_variable_copies_text_literal() {
    let mut b = ProgramBuilder::new();
    let stage = b.target("Stage").unwrap();
    let text = b.variable(stage, "Text", Value::number(1.0)).unwrap();
    b.script(
        stage,
        vec![BlockSpec::in_place(vec![Statement::set(text, Expr::text("chicken"))])],
    );
    let mut rt = Runtime::init(b.build().unwrap());
    rt.advance(0.0);

    let value = rt.find_variable("Stage", "Text").unwrap();
    assert_eq!(value.read_text(), "chicken");
    assert!(value.owns_buffer());

    // Overwriting with a number releases exactly that buffer
    let mut held = value.clone();
    assert!(held.assign_number(0.0));
    assert!(!held.assign_number(1.0));
}
