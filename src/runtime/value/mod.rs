//! Value store for scratch-vm
//!
//! This module provides the dynamically-typed [`Value`], the operators the
//! generated blocks evaluate over it, and the per-scope [`VariableStore`].

pub mod ops;
pub mod runtime_value;
pub mod variable;

pub use runtime_value::{Number, Text, Value};
pub use variable::VariableStore;

#[cfg(test)]
mod tests;
