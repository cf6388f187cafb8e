//! Configuration types for layer-lint.

use crate::predicate::MatchMode;
use crate::types::Severity;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Namespace family used when no configuration overrides it.
pub const DEFAULT_FORBIDDEN_NAMESPACE: &str = "Csla";

/// Ancestor walks longer than this are treated as malformed and fail closed.
pub const DEFAULT_MAX_ANCESTOR_DEPTH: usize = 64;

/// Top-level configuration for layer-lint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Preset to use (e.g., "recommended", "strict", "minimal").
    #[serde(default)]
    pub preset: Option<String>,

    /// Severity threshold at which the CLI exits with a failure status.
    #[serde(default)]
    pub fail_on: Option<Severity>,

    /// The layer boundary being enforced.
    #[serde(default)]
    pub boundary: BoundaryConfig,

    /// Analyzer configuration.
    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    /// Per-rule configurations, keyed by rule name or code.
    #[serde(default)]
    pub rules: HashMap<String, RuleConfig>,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Rejects configurations that cannot produce a meaningful pass.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] for an empty forbidden namespace
    /// (it would match every namespace) or a zero ancestor depth.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.boundary.forbidden_namespace.trim().is_empty() {
            return Err(ConfigError::Validation(
                "boundary.forbidden_namespace must not be empty".to_string(),
            ));
        }
        if self.boundary.max_ancestor_depth == 0 {
            return Err(ConfigError::Validation(
                "boundary.max_ancestor_depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    fn rule_config(&self, rule_name: &str, rule_code: &str) -> Option<&RuleConfig> {
        self.rules
            .get(rule_name)
            .or_else(|| self.rules.get(rule_code))
    }

    /// Returns the explicit enabled flag for a rule, if configured.
    #[must_use]
    pub fn rule_enabled(&self, rule_name: &str, rule_code: &str) -> Option<bool> {
        self.rule_config(rule_name, rule_code)
            .and_then(|c| c.enabled)
    }

    /// Gets the severity override for a rule.
    #[must_use]
    pub fn rule_severity(&self, rule_name: &str, rule_code: &str) -> Option<Severity> {
        self.rule_config(rule_name, rule_code)
            .and_then(|c| c.severity)
    }
}

/// The layer boundary: which namespace family must not leak.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundaryConfig {
    /// Namespace family whose types must not appear on the checked surface.
    #[serde(default = "default_forbidden_namespace")]
    pub forbidden_namespace: String,

    /// How a namespace is compared against the family.
    #[serde(default)]
    pub match_mode: MatchMode,

    /// Upper bound on inheritance-chain walks.
    #[serde(default = "default_max_ancestor_depth")]
    pub max_ancestor_depth: usize,
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self {
            forbidden_namespace: default_forbidden_namespace(),
            match_mode: MatchMode::default(),
            max_ancestor_depth: DEFAULT_MAX_ANCESTOR_DEPTH,
        }
    }
}

/// Analyzer-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Whether symbols from generated code are checked.
    #[serde(default)]
    pub include_generated: bool,

    /// Whether symbols are checked on the rayon thread pool.
    #[serde(default = "default_true")]
    pub parallel: bool,

    /// Number of worker threads (default: rayon's global pool).
    #[serde(default)]
    pub parallelism: Option<usize>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            include_generated: false,
            parallel: true,
            parallelism: None,
        }
    }
}

fn default_forbidden_namespace() -> String {
    DEFAULT_FORBIDDEN_NAMESPACE.to_string()
}

fn default_max_ancestor_depth() -> usize {
    DEFAULT_MAX_ANCESTOR_DEPTH
}

fn default_true() -> bool {
    true
}

/// Per-rule configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Whether this rule is enabled.
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Severity override for this rule.
    #[serde(default)]
    pub severity: Option<Severity>,
}

/// Configuration errors.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    #[diagnostic(code(layer_lint::config::io))]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    #[diagnostic(code(layer_lint::config::parse))]
    Parse {
        /// Parse error message.
        message: String,
    },

    /// Config parsed but cannot be used.
    #[error("Invalid config: {0}")]
    #[diagnostic(
        code(layer_lint::config::invalid),
        help("set [boundary] forbidden_namespace to the root namespace of the guarded layer")
    )]
    Validation(String),
}
