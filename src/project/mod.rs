//! Declarative JSON projects
//!
//! A project file describes targets, their variables and their blocks; it is
//! compiled into a [`Program`] through the same validating builder as the
//! Rust API.
//!
//! ```json
//! { "targets": [ { "name": "Stage", "is_stage": true,
//!     "variables": { "Number": 0 },
//!     "blocks": {
//!       "flag": { "op": "when_flag_clicked", "next": "set" },
//!       "set": { "op": "in_place", "statements": [
//!         { "set_variable": { "variable": "Number",
//!             "value": { "add": [ { "number": 3 }, { "number": 4 } ] } } } ] } } } ] }
//! ```

pub mod compile;
pub mod def;

pub use def::{BlockDef, ExprDef, Literal, OpDef, ProjectDef, StatementDef, TargetDef, VarName};

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::runtime::errors::ProgramError;
use crate::runtime::graph::Program;

/// Errors raised while loading a project.
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Failed to read project {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid project JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid program: {0}")]
    Program(#[from] ProgramError),
}

/// Parse a project document without compiling it.
pub fn parse_project(json: &str) -> Result<ProjectDef, ProjectError> {
    Ok(serde_json::from_str(json)?)
}

/// Parse and compile a project document.
pub fn compile_project(
    json: &str,
    max_depth: usize,
) -> Result<Program, ProjectError> {
    let def = parse_project(json)?;
    Ok(def.compile(max_depth)?)
}

/// Read, parse and compile a project file.
pub fn load_project(
    path: &Path,
    max_depth: usize,
) -> Result<Program, ProjectError> {
    debug!("Loading project {}", path.display());
    let json = fs::read_to_string(path).map_err(|source| ProjectError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    compile_project(&json, max_depth)
}

#[cfg(test)]
mod tests;
