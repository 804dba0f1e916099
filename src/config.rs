//! Evaluation configuration.
//!
//! Configuration is plain data, loadable from JSON. Every field has a default,
//! so a config file only needs to mention what it changes:
//!
//! ```json
//! { "layout": { "char_size": 1, "int_size": 4, "long_size": 8, "pointer_size": 8 },
//!   "on_diagnostic": "collect" }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::DataLayout;

/// What to do once a diagnostic has been reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticPolicy {
    /// Stop at the first diagnostic.
    #[default]
    Abort,
    /// Record it and keep evaluating steps that do not depend on it.
    Collect,
}

/// Configuration for an evaluation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    /// Scalar sizes of the target.
    pub layout: DataLayout,
    /// How to handle diagnostics.
    pub on_diagnostic: DiagnosticPolicy,
    /// Stop after this many diagnostics (0 = unlimited).
    pub max_diagnostics: usize,
}

/// Abort at the first diagnostic, with no separate limit. Fields missing
/// from a config file take these values, so `"on_diagnostic": "collect"`
/// alone collects without bound.
impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            layout: DataLayout::default(),
            on_diagnostic: DiagnosticPolicy::Abort,
            max_diagnostics: 0,
        }
    }
}

impl EvalConfig {
    /// Strict mode: the first diagnostic ends the run.
    pub fn strict() -> Self {
        Self { max_diagnostics: 1, ..Self::default() }
    }

    /// Collecting mode: report everything that can be reported.
    pub fn collecting() -> Self {
        Self { on_diagnostic: DiagnosticPolicy::Collect, ..Self::default() }
    }

    pub fn with_layout(mut self, layout: DataLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }
}

/// Failure to load a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}
