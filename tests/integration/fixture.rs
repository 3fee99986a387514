//! The variables fixture, built both from JSON and through the builder API

use std::path::Path;

use scratch_vm::runtime::graph::{BlockSpec, Expr, ProgramBuilder, Statement};
use scratch_vm::util::config::Config;
use scratch_vm::{load_file, Program, Runtime, Value};

const FINAL_TEXT: &str =
    "chicken banana chicken banana chicken banana banana banana banana";

fn fixture_from_json() -> Program {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/variables.json");
    load_file(&path, &Config::default()).unwrap()
}

fn fixture_from_builder() -> Program {
    let mut b = ProgramBuilder::new();
    let stage = b.target("Stage").unwrap();
    let number = b.variable(stage, "Number", Value::number(0.0)).unwrap();
    let another_number = b.variable(stage, "Another Number", Value::number(0.0)).unwrap();
    let text = b.variable(stage, "Text", Value::text("Text")).unwrap();
    let another_text = b
        .variable(stage, "Another Text", Value::text("Another Text"))
        .unwrap();

    let space_join = |lhs: Expr| Expr::join(lhs, Expr::text(" "));
    b.script(
        stage,
        vec![
            BlockSpec::in_place(vec![
                Statement::set(number, Expr::sum(Expr::number(3.0), Expr::number(4.0))),
                Statement::set(
                    another_number,
                    Expr::product(
                        Expr::sum(Expr::var(number), Expr::number(3.0)),
                        Expr::sqrt(Expr::number(9.0)),
                    ),
                ),
            ]),
            BlockSpec::wait(Expr::number(1.0)),
            BlockSpec::in_place(vec![
                Statement::set(another_text, Expr::text("chicken")),
                Statement::set(
                    text,
                    Expr::join(space_join(Expr::var(another_text)), Expr::text("banana")),
                ),
                Statement::set(text, Expr::join(space_join(Expr::var(text)), Expr::var(text))),
                Statement::set(
                    text,
                    Expr::join(
                        space_join(Expr::var(text)),
                        Expr::join(space_join(Expr::var(another_text)), Expr::text("banana")),
                    ),
                ),
                Statement::set(
                    text,
                    Expr::join(
                        Expr::var(text),
                        Expr::join(
                            Expr::join(Expr::text(" banana"), Expr::text(" banana")),
                            Expr::text(" banana"),
                        ),
                    ),
                ),
            ]),
        ],
    );
    b.build().unwrap()
}

fn check_fixture(program: Program) {
    let mut rt = Runtime::init(program);

    rt.advance(0.5);
    assert_eq!(rt.find_variable("Stage", "Number"), Some(&Value::number(7.0)));
    assert_eq!(
        rt.find_variable("Stage", "Another Number"),
        Some(&Value::number(30.0))
    );
    assert_eq!(rt.find_variable("Stage", "Text").unwrap().read_text(), "Text");

    rt.advance(0.4);
    assert_eq!(rt.find_variable("Stage", "Text").unwrap().read_text(), "Text");

    rt.advance(0.2);
    let text = rt.find_variable("Stage", "Text").unwrap();
    assert_eq!(text.read_text(), FINAL_TEXT);
    assert!(text.owns_buffer());
    let another = rt.find_variable("Stage", "Another Text").unwrap();
    assert_eq!(another.read_text(), "chicken");
    assert!(another.owns_buffer());
    assert!(rt.is_idle());
}

#[test]
fn test_fixture_from_json() {
    check_fixture(fixture_from_json());
}

#[test]
fn test_fixture_from_builder() {
    check_fixture(fixture_from_builder());
}

#[test]
fn test_fixture_both_forms_match() {
    let json = fixture_from_json();
    let built = fixture_from_builder();
    assert_eq!(json.graph().len(), built.graph().len());
    assert_eq!(json.script_count(), built.script_count());
    assert_eq!(json.max_depth(), built.max_depth());
}

#[test]
fn test_fixture_missing_variable_is_none() {
    let rt = Runtime::init(fixture_from_json());
    assert!(rt.find_variable("Stage", "Missing").is_none());
    assert!(rt.find_variable("Sprite1", "Number").is_none());
}
