//! scratch-vm configuration system
//!
//! # Configuration hierarchy
//!
//! ```text
//! Priority (high -> low):
//! 1. CLI arguments
//! 2. Environment variables (SCRATCH_VM_LOG, SCRATCH_VM_DT)
//! 3. --config file, or scratch-vm.toml in the working directory
//! 4. Default values
//! ```
//!
//! # Usage
//!
//! ```rust
//! use scratch_vm::util::config::Config;
//!
//! let config = Config::from_toml("[run]\nticks = 10").unwrap();
//! assert_eq!(config.run.ticks, 10);
//! assert_eq!(config.scheduler.max_stack_depth, 32);
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::runtime::graph::DEFAULT_MAX_STACK_DEPTH;
use crate::util::logger::LogLevel;

/// File looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "scratch-vm.toml";

/// Environment variable overriding `log.level`.
pub const ENV_LOG: &str = "SCRATCH_VM_LOG";

/// Environment variable overriding `run.dt`.
pub const ENV_DT: &str = "SCRATCH_VM_DT";

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub log: LogConfig,
}

/// Program construction limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Deepest nesting a script may have
    #[serde(default = "default_max_stack_depth")]
    pub max_stack_depth: usize,
}

fn default_max_stack_depth() -> usize {
    DEFAULT_MAX_STACK_DEPTH
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_stack_depth: DEFAULT_MAX_STACK_DEPTH,
        }
    }
}

/// Defaults for `scratch-vm run`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Time delta per tick
    #[serde(default = "default_dt")]
    pub dt: f64,
    /// Number of ticks to run
    #[serde(default = "default_ticks")]
    pub ticks: u64,
    /// Variables printed after each tick, as `TARGET:VAR`
    #[serde(default)]
    pub watch: Vec<String>,
}

fn default_dt() -> f64 {
    0.0333
}

fn default_ticks() -> u64 {
    120
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            dt: default_dt(),
            ticks: default_ticks(),
            watch: Vec::new(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value '{value}' for {name}")]
    InvalidEnv { name: &'static str, value: String },

    #[error("Unknown log level '{0}'")]
    UnknownLogLevel(String),
}

impl Config {
    /// Parse configuration from TOML text; missing keys take defaults.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load from `path`, or from [`DEFAULT_CONFIG_FILE`] when `path` is `None`.
    ///
    /// An explicit path must exist; a missing default file yields defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default.exists() {
                    return Ok(Config::default());
                }
                default
            }
        };
        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env_with(|name| std::env::var(name).ok())
    }

    /// Apply overrides using `lookup` to read variables.
    pub fn apply_env_with(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(level) = lookup(ENV_LOG) {
            self.log.level = level;
        }
        if let Some(dt) = lookup(ENV_DT) {
            self.run.dt = dt.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                name: ENV_DT,
                value: dt.clone(),
            })?;
        }
        Ok(())
    }

    /// Parsed `log.level`.
    ///
    /// Callers usually fall back to `info` on error, after the logger is up.
    pub fn log_level(&self) -> Result<LogLevel, ConfigError> {
        self.log
            .level
            .parse()
            .map_err(|_| ConfigError::UnknownLogLevel(self.log.level.clone()))
    }
}
