//! Scheduler unit tests
//!
//! Control-flow behavior of each block kind, driven through a [`Runtime`].


use crate::runtime::graph::{ProgramBuilder, TargetId, VarRef};
use crate::runtime::value::Value;
use crate::runtime::Runtime;

/// Builder with a `Stage` target and the given numeric variables at zero.
fn stage_with(names: &[&str]) -> (ProgramBuilder, TargetId, Vec<VarRef>) {
    let mut builder = ProgramBuilder::new();
    let stage = builder.target("Stage").unwrap();
    let vars = names
        .iter()
        .map(|name| builder.variable(stage, name, Value::number(0.0)).unwrap())
        .collect();
    (builder, stage, vars)
}

fn number(
    runtime: &Runtime,
    name: &str,
) -> f64 {
    runtime.find_variable("Stage", name).unwrap().read_number()
}
