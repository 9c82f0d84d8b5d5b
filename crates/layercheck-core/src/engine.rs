//! Run orchestration: `Loaded → Analyzed → Report`.
//!
//! Each transition consumes the previous state, so a run can only move
//! forward. The two analyzer families run as a fork/join over the same
//! immutable snapshot:
//!
//! ```text
//!            ┌─ model rules (dependency graph) ─┐
//! Loaded ────┤                                  ├── suppressions ── Analyzed ── Report
//!            └─ symbol rules (par_iter modules) ┘
//! ```

use std::sync::Arc;

use rayon::prelude::*;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::{Config, ConfigError, ModulePatterns};
use crate::context::{Cancelled, ModelContext, SymbolContext};
use crate::model::{Module, SymbolModel};
use crate::report::Report;
use crate::rule::{ModelRule, ModelRuleBox, SymbolRule, SymbolRuleBox};
use crate::types::{Finding, Severity};

/// Errors that can occur while building or running the engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The caller cancelled the run. No partial report is produced.
    #[error("analysis cancelled")]
    Cancelled,

    /// The dedicated worker pool could not be created.
    #[error("failed to build analysis thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl From<Cancelled> for EngineError {
    fn from(_: Cancelled) -> Self {
        Self::Cancelled
    }
}

/// Builder for configuring an [`Engine`].
#[derive(Default)]
pub struct EngineBuilder {
    symbol_rules: Vec<SymbolRuleBox>,
    model_rules: Vec<ModelRuleBox>,
    config: Option<Config>,
}

impl EngineBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a per-symbol rule.
    #[must_use]
    pub fn symbol_rule<R: SymbolRule + 'static>(mut self, rule: R) -> Self {
        self.symbol_rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed per-symbol rule.
    #[must_use]
    pub fn symbol_rule_box(mut self, rule: SymbolRuleBox) -> Self {
        self.symbol_rules.push(rule);
        self
    }

    /// Adds a model-wide rule.
    #[must_use]
    pub fn model_rule<R: ModelRule + 'static>(mut self, rule: R) -> Self {
        self.model_rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed model-wide rule.
    #[must_use]
    pub fn model_rule_box(mut self, rule: ModelRuleBox) -> Self {
        self.model_rules.push(rule);
        self
    }

    /// Sets the configuration (exclusions, test modules, parallelism).
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Builds the engine.
    ///
    /// # Errors
    ///
    /// Returns an error if a module pattern is invalid or the worker pool
    /// cannot be created.
    pub fn build(self) -> Result<Engine, EngineError> {
        let config = self.config.unwrap_or_default();
        let exclude = config.analyzer.exclude_patterns()?;
        let test_modules = config.analyzer.test_module_patterns()?;

        let pool = match config.analyzer.parallelism {
            Some(threads) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .thread_name(|i| format!("layercheck-{i}"))
                    .build()?,
            ),
            None => None,
        };

        Ok(Engine {
            symbol_rules: self.symbol_rules,
            model_rules: self.model_rules,
            exclude,
            test_modules,
            pool,
        })
    }
}

/// The engine: a fixed set of rules plus run settings.
///
/// Use [`Engine::builder()`] to construct an instance, then
/// [`Engine::load`] to start a run.
pub struct Engine {
    symbol_rules: Vec<SymbolRuleBox>,
    model_rules: Vec<ModelRuleBox>,
    exclude: ModulePatterns,
    test_modules: ModulePatterns,
    pool: Option<rayon::ThreadPool>,
}

impl Engine {
    /// Creates a new builder for configuring an engine.
    #[must_use]
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.symbol_rules.len() + self.model_rules.len()
    }

    /// Starts a run over a validated snapshot.
    #[must_use]
    pub fn load(&self, model: impl Into<Arc<SymbolModel>>) -> Loaded<'_> {
        Loaded {
            engine: self,
            model: model.into(),
        }
    }

    fn is_test_module(&self, module: &Module) -> bool {
        module.is_test() || self.test_modules.matches(module.id().as_str())
    }

    fn run_model_rules(
        &self,
        model: &SymbolModel,
        cancel: &CancellationToken,
    ) -> Result<Vec<Finding>, Cancelled> {
        let ctx = ModelContext::new(model, cancel);
        let mut findings = Vec::new();
        for rule in &self.model_rules {
            ctx.checkpoint()?;
            debug!("Running model rule: {}", rule.name());
            findings.extend(rule.check_model(&ctx)?);
        }
        Ok(findings)
    }

    fn run_symbol_rules(
        &self,
        model: &SymbolModel,
        cancel: &CancellationToken,
    ) -> Result<Vec<Finding>, Cancelled> {
        if self.symbol_rules.is_empty() {
            return Ok(Vec::new());
        }

        let modules: Vec<&Module> = model
            .modules()
            .filter(|m| {
                let excluded = self.exclude.matches(m.id().as_str());
                if excluded {
                    debug!("Excluding module: {}", m.id());
                }
                !excluded
            })
            .collect();

        let per_module = modules
            .par_iter()
            .map(|module| {
                if cancel.is_cancelled() {
                    return Err(Cancelled);
                }
                let ctx = SymbolContext::new(model, module, self.is_test_module(module));
                let mut findings = Vec::new();
                for symbol in module.symbols() {
                    for rule in &self.symbol_rules {
                        findings.extend(rule.evaluate(&ctx, symbol));
                    }
                }
                Ok(findings)
            })
            .collect::<Result<Vec<Vec<Finding>>, Cancelled>>()?;

        Ok(per_module.into_iter().flatten().collect())
    }
}

/// A run whose model and rules are in place, ready to analyze.
pub struct Loaded<'e> {
    engine: &'e Engine,
    model: Arc<SymbolModel>,
}

impl Loaded<'_> {
    /// Runs both analyzer families and applies suppressions.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Cancelled`] if `cancel` fires before the last
    /// module-level unit completes.
    pub fn analyze(self, cancel: &CancellationToken) -> Result<Analyzed, EngineError> {
        let engine = self.engine;
        let model = self.model.as_ref();
        info!(
            "Starting analysis: {} modules, {} symbols, {} rules",
            model.module_count(),
            model.symbol_count(),
            engine.rule_count()
        );

        let fan_out = || {
            rayon::join(
                || engine.run_model_rules(model, cancel),
                || engine.run_symbol_rules(model, cancel),
            )
        };
        let (model_findings, symbol_findings) = match &engine.pool {
            Some(pool) => pool.install(fan_out),
            None => fan_out(),
        };

        let mut findings = model_findings?;
        findings.extend(symbol_findings?);
        let findings = apply_suppressions(model, findings);

        info!("Analysis complete: {} findings", findings.len());

        Ok(Analyzed {
            model: self.model,
            findings,
        })
    }
}

/// A finished analysis, not yet ordered into a report.
pub struct Analyzed {
    model: Arc<SymbolModel>,
    findings: Vec<Finding>,
}

impl Analyzed {
    /// Findings in collection order.
    #[must_use]
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    /// The analyzed snapshot.
    #[must_use]
    pub fn model(&self) -> &SymbolModel {
        &self.model
    }

    /// Orders the findings into the final report.
    #[must_use]
    pub fn report(self) -> Report {
        Report::new(
            self.findings,
            self.model.module_count(),
            self.model.symbol_count(),
        )
    }
}

/// Drops findings silenced by a suppression on their subject symbol.
///
/// Suppressing a critical finding requires a reason; reasonless ones are
/// ignored.
fn apply_suppressions(model: &SymbolModel, findings: Vec<Finding>) -> Vec<Finding> {
    findings
        .into_iter()
        .filter(|finding| {
            let Some(suppression) = model
                .symbol(&finding.subject)
                .and_then(|s| s.suppression_for(&finding.rule))
            else {
                return true;
            };

            if finding.severity == Severity::Critical && suppression.reason().is_none() {
                warn!(
                    "Ignoring suppression of critical rule '{}' on {}: a reason is required",
                    finding.rule, finding.subject
                );
                return true;
            }

            debug!("Suppressed '{}' on {}", finding.rule, finding.subject);
            false
        })
        .collect()
}
