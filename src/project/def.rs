//! Serde model of a JSON project
//!
//! Mirrors the subset of a Scratch `project.json` the runtime understands:
//! targets with variables and named blocks linked by name.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Root document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectDef {
    pub targets: Vec<TargetDef>,
}

/// A stage or sprite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetDef {
    pub name: String,
    /// Unqualified variable names fall back to the stage's variables
    #[serde(default)]
    pub is_stage: bool,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    /// Initial values in declaration order
    #[serde(default)]
    pub variables: IndexMap<String, Literal>,
    /// Blocks keyed by name; scripts start at `when_flag_clicked` blocks
    #[serde(default)]
    pub blocks: IndexMap<String, BlockDef>,
}

/// Initial variable value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    Number(f64),
    Text(String),
}

/// A block with its links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockDef {
    #[serde(flatten)]
    pub op: OpDef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// Block operation, tagged by `"op"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum OpDef {
    WhenFlagClicked,
    InPlace {
        statements: Vec<StatementDef>,
    },
    Repeat {
        times: u32,
    },
    RepeatUntil {
        condition: ExprDef,
    },
    Forever,
    If {
        condition: ExprDef,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        else_body: Option<String>,
    },
    Wait {
        duration: ExprDef,
    },
    Glide {
        x: ExprDef,
        y: ExprDef,
        duration: ExprDef,
    },
}

/// Variable reference: a bare name, or an explicit target and name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VarName {
    Local(String),
    Scoped { target: String, name: String },
}

/// Expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExprDef {
    Number(f64),
    Text(String),
    Variable(VarName),
    Timer,
    XPosition,
    YPosition,
    Add(Box<ExprDef>, Box<ExprDef>),
    Subtract(Box<ExprDef>, Box<ExprDef>),
    Multiply(Box<ExprDef>, Box<ExprDef>),
    Divide(Box<ExprDef>, Box<ExprDef>),
    Modulo(Box<ExprDef>, Box<ExprDef>),
    Join(Box<ExprDef>, Box<ExprDef>),
    LessThan(Box<ExprDef>, Box<ExprDef>),
    GreaterThan(Box<ExprDef>, Box<ExprDef>),
    Equals(Box<ExprDef>, Box<ExprDef>),
    And(Box<ExprDef>, Box<ExprDef>),
    Or(Box<ExprDef>, Box<ExprDef>),
    Not(Box<ExprDef>),
    Sqrt(Box<ExprDef>),
}

/// Statement of an `in_place` block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementDef {
    SetVariable { variable: VarName, value: ExprDef },
    ChangeVariableBy { variable: VarName, value: ExprDef },
    GoTo { x: ExprDef, y: ExprDef },
    SetX(ExprDef),
    SetY(ExprDef),
    ChangeXBy(ExprDef),
    ChangeYBy(ExprDef),
}
