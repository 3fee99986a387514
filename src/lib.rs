//! scratch-vm
//!
//! A tick-driven execution engine for transpiled Scratch block programs.
//!
//! Programs are built once, either through
//! [`ProgramBuilder`](runtime::graph::ProgramBuilder) or from a JSON project,
//! and then advanced by the host one time delta at a time.
//!
//! # Example
//!
//! ```no_run
//! use scratch_vm::{load_file, Result, Runtime};
//! use scratch_vm::util::config::Config;
//!
//! fn main() -> Result<()> {
//!     let program = load_file("demos/variables.json".as_ref(), &Config::default())?;
//!     let mut runtime = Runtime::init(program);
//!     runtime.advance(0.5);
//!     println!("{:?}", runtime.find_variable("Stage", "Number"));
//!     Ok(())
//! }
//! ```
//!
//! # Crate Features
//!
//! - `debug`: trace every block visit inside the scheduler

#![warn(rust_2018_idioms)]

pub mod project;
pub mod runtime;

// Utility modules
pub mod util;

// Re-exports
pub use anyhow::{Context, Result};
pub use project::ProjectError;
pub use runtime::errors::ProgramError;
pub use runtime::graph::{Program, ProgramBuilder};
pub use runtime::value::Value;
pub use runtime::Runtime;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use tracing::debug;

use crate::util::config::Config;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name
pub const NAME: &str = "scratch-vm";

/// Load and compile a JSON project using the limits in `config`.
pub fn load_file(
    path: &Path,
    config: &Config,
) -> Result<Program> {
    let program = project::load_project(path, config.scheduler.max_stack_depth)
        .with_context(|| format!("Failed to load project: {}", path.display()))?;
    debug!(
        "Loaded {}: {} targets, {} scripts",
        path.display(),
        program.targets().len(),
        program.script_count()
    );
    Ok(program)
}

/// A `TARGET:VAR` variable watch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Watch {
    pub target: String,
    pub variable: String,
}

impl Watch {
    /// Current value in `runtime`, if the variable exists.
    pub fn read<'a>(
        &self,
        runtime: &'a Runtime,
    ) -> Option<&'a Value> {
        runtime.find_variable(&self.target, &self.variable)
    }
}

impl FromStr for Watch {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.split_once(':') {
            Some((target, variable)) if !target.is_empty() && !variable.is_empty() => Ok(Watch {
                target: target.to_string(),
                variable: variable.to_string(),
            }),
            _ => anyhow::bail!("Watch must be TARGET:VAR, got '{}'", s),
        }
    }
}

impl fmt::Display for Watch {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}:{}", self.target, self.variable)
    }
}
