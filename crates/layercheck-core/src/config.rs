//! Configuration types for layercheck.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::Severity;

/// Default patterns identifying test modules by id.
pub const DEFAULT_TEST_MODULES: &[&str] =
    &["*.Tests", "*.Tests.*", "*.UnitTests", "*.IntegrationTests"];

/// Top-level configuration (`layercheck.toml`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Custom rule catalog path (default: the built-in catalog).
    #[serde(default)]
    pub catalog: Option<PathBuf>,

    /// Preset to use ("recommended", "strict", "architecture").
    #[serde(default)]
    pub preset: Option<String>,

    /// Analyzer configuration.
    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    /// Per-rule configurations, keyed by catalog rule id.
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

    /// Checks if a rule is enabled.
    #[must_use]
    pub fn is_rule_enabled(&self, rule_id: &str) -> bool {
        self.rules
            .get(rule_id)
            .map_or(true, |c| c.enabled.unwrap_or(true))
    }

    /// Gets the severity override for a rule.
    #[must_use]
    pub fn rule_severity(&self, rule_id: &str) -> Option<Severity> {
        self.rules.get(rule_id).and_then(|c| c.severity)
    }

    /// Gets the configuration block for a rule, if any.
    #[must_use]
    pub fn rule(&self, rule_id: &str) -> Option<&RuleConfig> {
        self.rules.get(rule_id)
    }

    /// Gets an integer option for a rule, falling back to `default`.
    #[must_use]
    pub fn rule_int(&self, rule_id: &str, key: &str, default: i64) -> i64 {
        self.rule(rule_id)
            .map_or(default, |c| c.get_int(key, default))
    }

    /// Returns the mutable configuration block for a rule, creating it.
    pub fn rule_mut(&mut self, rule_id: &str) -> &mut RuleConfig {
        self.rules.entry(rule_id.to_string()).or_default()
    }
}

/// Analyzer-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Module-id globs skipped by the pattern rules.
    ///
    /// Excluded modules stay in the dependency graph.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Module-id globs that mark a module as a test module.
    #[serde(default = "default_test_modules")]
    pub test_modules: Vec<String>,

    /// Worker thread count for the analysis pool (default: rayon's global pool).
    #[serde(default)]
    pub parallelism: Option<usize>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            exclude: Vec::new(),
            test_modules: default_test_modules(),
            parallelism: None,
        }
    }
}

impl AnalyzerConfig {
    /// Compiles the `exclude` globs.
    ///
    /// # Errors
    ///
    /// Returns an error if any pattern is not a valid glob.
    pub fn exclude_patterns(&self) -> Result<ModulePatterns, ConfigError> {
        ModulePatterns::new(&self.exclude)
    }

    /// Compiles the `test_modules` globs.
    ///
    /// # Errors
    ///
    /// Returns an error if any pattern is not a valid glob.
    pub fn test_module_patterns(&self) -> Result<ModulePatterns, ConfigError> {
        ModulePatterns::new(&self.test_modules)
    }
}

fn default_test_modules() -> Vec<String> {
    DEFAULT_TEST_MODULES.iter().map(|s| (*s).to_string()).collect()
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

    /// Rule-specific options as key-value pairs.
    #[serde(flatten)]
    pub options: HashMap<String, toml::Value>,
}

impl RuleConfig {
    /// Gets an integer option with a default value.
    #[must_use]
    pub fn get_int(&self, key: &str, default: i64) -> i64 {
        self.options
            .get(key)
            .and_then(toml::Value::as_integer)
            .unwrap_or(default)
    }

    /// Sets an integer option unless it is already set.
    pub fn default_int(&mut self, key: &str, value: i64) {
        self.options
            .entry(key.to_string())
            .or_insert(toml::Value::Integer(value));
    }
}

/// A compiled set of module-id glob patterns.
#[derive(Debug, Clone, Default)]
pub struct ModulePatterns {
    patterns: Vec<glob::Pattern>,
}

impl ModulePatterns {
    /// Compiles the given globs.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Pattern`] for the first invalid glob.
    pub fn new<S: AsRef<str>>(globs: &[S]) -> Result<Self, ConfigError> {
        let patterns = globs
            .iter()
            .map(|g| {
                glob::Pattern::new(g.as_ref()).map_err(|e| ConfigError::Pattern {
                    pattern: g.as_ref().to_string(),
                    message: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Returns true if any pattern matches the module id.
    #[must_use]
    pub fn matches(&self, module_id: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(module_id))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    #[diagnostic(code(layercheck::config::io))]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    #[diagnostic(code(layercheck::config::parse))]
    Parse {
        /// Parse error message.
        message: String,
    },

    /// Invalid module glob.
    #[error("Invalid module pattern `{pattern}`: {message}")]
    #[diagnostic(code(layercheck::config::pattern))]
    Pattern {
        /// The offending glob.
        pattern: String,
        /// Why it failed to compile.
        message: String,
    },
}
