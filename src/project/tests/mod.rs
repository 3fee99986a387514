//! Project parsing and compilation tests

use crate::project::{compile_project, parse_project, ExprDef, OpDef, ProjectError, VarName};
use crate::runtime::errors::ProgramError;
use crate::runtime::graph::{BlockKind, DEFAULT_MAX_STACK_DEPTH};
use crate::runtime::value::Value;
use crate::runtime::Runtime;

const VARIABLES: &str = include_str!("../../../demos/variables.json");

fn compile(json: &str) -> Result<crate::runtime::graph::Program, ProjectError> {
    compile_project(json, DEFAULT_MAX_STACK_DEPTH)
}

#[test]
fn test_parse_fixture_keeps_declaration_order() {
    let def = parse_project(VARIABLES).unwrap();
    let stage = &def.targets[0];
    assert!(stage.is_stage);
    let names: Vec<_> = stage.variables.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["Number", "Another Number", "Text", "Another Text"]);
    assert_eq!(stage.blocks["flag"].op, OpDef::WhenFlagClicked);
    assert_eq!(stage.blocks["flag"].next.as_deref(), Some("numbers"));
}

#[test]
fn test_parse_expression_forms() {
    let json = r#"[ "timer", { "number": 2 }, { "variable": "n" },
        { "variable": { "target": "Stage", "name": "n" } },
        { "join": [ { "text": "a" }, { "text": "b" } ] }, { "not": "x_position" } ]"#;
    let exprs: Vec<ExprDef> = serde_json::from_str(json).unwrap();
    assert_eq!(exprs[0], ExprDef::Timer);
    assert_eq!(exprs[1], ExprDef::Number(2.0));
    assert_eq!(exprs[2], ExprDef::Variable(VarName::Local("n".to_string())));
    assert_eq!(
        exprs[3],
        ExprDef::Variable(VarName::Scoped {
            target: "Stage".to_string(),
            name: "n".to_string()
        })
    );
    assert!(matches!(exprs[4], ExprDef::Join(..)));
    assert_eq!(exprs[5], ExprDef::Not(Box::new(ExprDef::XPosition)));
}

#[test]
fn test_compile_fixture_builds_one_script() {
    let program = compile(VARIABLES).unwrap();
    assert_eq!(program.script_count(), 1);
    assert_eq!(program.graph().len(), 4);
    assert_eq!(program.max_depth(), 1);

    let stage = &program.targets()[0];
    assert_eq!(stage.variables.find("Text"), Some(&Value::text("Text")));
    assert!(stage.variables.find("Text").unwrap().owns_buffer());
}

#[test]
fn test_compile_links_bodies_by_name() {
    let program = compile(include_str!("../../../demos/move_until_edge.json")).unwrap();
    let sprite = program.target_id("red_100x70").unwrap();
    let template = &program.targets()[sprite.0];
    assert_eq!((template.position.x, template.position.y), (51.0, 0.0));

    let entry = template.scripts[0].entry;
    let graph = program.graph();
    let until = graph.get(graph.get(entry).unwrap().next.unwrap()).unwrap();
    assert!(matches!(until.kind, BlockKind::RepeatUntil { .. }));
    assert!(until.body.is_some());
    assert!(until.next.is_some());
}

#[test]
fn test_bare_name_falls_back_to_stage() {
    let json = r#"{ "targets": [
        { "name": "Stage", "is_stage": true, "variables": { "shared": 0 } },
        { "name": "Sprite1", "blocks": {
            "flag": { "op": "when_flag_clicked", "next": "set" },
            "set": { "op": "in_place", "statements": [
                { "set_variable": { "variable": "shared", "value": { "number": 4 } } } ] } } } ] }"#;
    let mut rt = Runtime::init(compile(json).unwrap());
    rt.advance(0.0);
    assert_eq!(rt.find_variable("Stage", "shared"), Some(&Value::number(4.0)));
}

#[test]
fn test_local_name_shadows_stage() {
    let json = r#"{ "targets": [
        { "name": "Stage", "is_stage": true, "variables": { "n": 0 } },
        { "name": "Sprite1", "variables": { "n": 0 }, "blocks": {
            "flag": { "op": "when_flag_clicked", "next": "set" },
            "set": { "op": "in_place", "statements": [
                { "set_variable": { "variable": "n", "value": { "number": 1 } } },
                { "change_variable_by": { "variable": { "target": "Stage", "name": "n" },
                    "value": { "number": 2 } } } ] } } } ] }"#;
    let mut rt = Runtime::init(compile(json).unwrap());
    rt.advance(0.0);
    assert_eq!(rt.find_variable("Sprite1", "n"), Some(&Value::number(1.0)));
    assert_eq!(rt.find_variable("Stage", "n"), Some(&Value::number(2.0)));
}

#[test]
fn test_unknown_variable_reported() {
    let json = r#"{ "targets": [ { "name": "Stage", "blocks": {
        "set": { "op": "in_place", "statements": [
            { "set_variable": { "variable": "ghost", "value": { "number": 1 } } } ] } } } ] }"#;
    match compile(json) {
        Err(ProjectError::Program(ProgramError::UnknownVariable { target, name })) => {
            assert_eq!(target, "Stage");
            assert_eq!(name, "ghost");
        }
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_unknown_block_reported() {
    let json = r#"{ "targets": [ { "name": "Stage", "blocks": {
        "flag": { "op": "when_flag_clicked", "next": "missing" } } } ] }"#;
    assert!(matches!(
        compile(json),
        Err(ProjectError::Program(ProgramError::UnknownBlock { .. }))
    ));
}

#[test]
fn test_unknown_scoped_target_reported() {
    let json = r#"{ "targets": [ { "name": "Stage", "blocks": {
        "wait": { "op": "wait",
            "duration": { "variable": { "target": "Nobody", "name": "n" } } } } } ] }"#;
    assert!(matches!(
        compile(json),
        Err(ProjectError::Program(ProgramError::UnknownTarget(_)))
    ));
}

#[test]
fn test_shared_next_rejected() {
    let json = r#"{ "targets": [ { "name": "Stage", "blocks": {
        "a": { "op": "when_flag_clicked", "next": "c" },
        "b": { "op": "when_flag_clicked", "next": "c" },
        "c": { "op": "forever" } } } ] }"#;
    assert!(matches!(
        compile(json),
        Err(ProjectError::Program(ProgramError::SharedBlock(_)))
    ));
}

#[test]
fn test_malformed_json_is_parse_error() {
    assert!(matches!(
        compile(r#"{ "targets": [ { "name": 3 } ] }"#),
        Err(ProjectError::Parse(_))
    ));
    assert!(matches!(
        compile(r#"{ "targets": [ { "name": "S", "blocks": { "b": { "op": "teleport" } } } ] }"#),
        Err(ProjectError::Parse(_))
    ));
}

#[test]
fn test_load_missing_file_is_io_error() {
    let err = crate::project::load_project(
        std::path::Path::new("/definitely/not/here.json"),
        DEFAULT_MAX_STACK_DEPTH,
    )
    .unwrap_err();
    assert!(matches!(err, ProjectError::Io { .. }));
    assert!(err.to_string().contains("here.json"));
}
