//! Assembles an [`Engine`] from configuration and a rule catalog.
//!
//! Resolution order for one run:
//!
//! 1. preset (`config.preset`, default `recommended`) fills unset options
//! 2. catalog: explicit, then `config.catalog`, then the built-in one
//! 3. every catalog id must have a built-in predicate
//! 4. per-rule config overrides, then the optional rule filter
//! 5. graph rules and symbol rules are registered with the engine

use std::path::PathBuf;

use layercheck_core::{
    Config, ConfigError, Engine, EngineError, LoadCatalogError, Report, RuleCatalog, SymbolModel,
};
use layercheck_graph::{DependencyAnalyzer, LayerPolicy};
use layercheck_rules::Preset;
use miette::Diagnostic;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::registry;

/// Errors raised while assembling or running a pipeline.
#[derive(Debug, Error, Diagnostic)]
pub enum PipelineError {
    /// `preset` names no known preset.
    #[error("unknown preset `{name}`")]
    #[diagnostic(
        code(layercheck::preset),
        help("valid presets: recommended, strict, architecture")
    )]
    UnknownPreset {
        /// The configured name.
        name: String,
    },

    /// The rule catalog failed to load or names unknown rules.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Catalog(#[from] LoadCatalogError),

    /// `--rules` names an id the catalog does not declare.
    #[error("unknown rule `{rule}` in rule filter")]
    #[diagnostic(
        code(layercheck::rule_filter),
        help("run `layercheck list-rules` to see the catalog ids")
    )]
    UnknownRuleFilter {
        /// The requested id.
        rule: String,
    },

    /// Invalid analyzer configuration.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    /// The engine could not be built or the run was cancelled.
    #[error(transparent)]
    #[diagnostic(code(layercheck::engine))]
    Engine(EngineError),
}

impl From<EngineError> for PipelineError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Config(e) => Self::Config(e),
            other => Self::Engine(other),
        }
    }
}

/// Builder for a [`Pipeline`].
#[derive(Debug, Default)]
pub struct PipelineBuilder {
    config: Option<Config>,
    catalog: Option<RuleCatalog>,
    catalog_path: Option<PathBuf>,
    only: Option<Vec<String>>,
}

impl PipelineBuilder {
    /// Creates a builder with default configuration and the built-in catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Uses an already loaded catalog instead of resolving one.
    #[must_use]
    pub fn catalog(mut self, catalog: RuleCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Loads the catalog from `path`, overriding `config.catalog`.
    #[must_use]
    pub fn catalog_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.catalog_path = Some(path.into());
        self
    }

    /// Restricts the run to the given catalog ids.
    #[must_use]
    pub fn only<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.only = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    /// Resolves preset, catalog and rules, and builds the engine.
    ///
    /// # Errors
    ///
    /// Returns an error if the preset is unknown, the catalog fails to load
    /// or names a rule without a predicate, the rule filter names an unknown
    /// id, or the engine cannot be built.
    pub fn build(self) -> Result<Pipeline, PipelineError> {
        let config = self.config.unwrap_or_default();
        let preset = resolve_preset(&config)?;
        debug!("Using preset: {}", preset.name());
        let config = preset.apply(config);

        let catalog = match (self.catalog, self.catalog_path.or_else(|| config.catalog.clone())) {
            (Some(catalog), _) => catalog,
            (None, Some(path)) => {
                info!("Loading rule catalog from {}", path.display());
                RuleCatalog::from_file(&path)?
            }
            (None, None) => RuleCatalog::builtin()?,
        };
        registry::validate(&catalog)?;

        let mut catalog = catalog.with_config(&config);
        if let Some(ids) = &self.only {
            if let Some(unknown) = ids.iter().find(|id| catalog.get(id).is_none()) {
                return Err(PipelineError::UnknownRuleFilter {
                    rule: unknown.clone(),
                });
            }
            catalog = catalog.only(ids);
        }

        let mut builder = Engine::builder();
        let graph = DependencyAnalyzer::from_catalog(LayerPolicy::standard(), &catalog);
        if graph.is_active() {
            builder = builder.model_rule(graph);
        } else {
            debug!("Skipping dependency graph: no graph rule enabled");
        }
        for rule in layercheck_rules::symbol_rules(&catalog, &config) {
            builder = builder.symbol_rule_box(rule);
        }
        let engine = builder.config(config).build()?;

        info!(
            "Pipeline ready: {} of {} catalog rules enabled",
            catalog.enabled().count(),
            catalog.len()
        );

        Ok(Pipeline { catalog, engine })
    }
}

/// A ready-to-run engine together with its effective catalog.
pub struct Pipeline {
    catalog: RuleCatalog,
    engine: Engine,
}

impl Pipeline {
    /// Creates a new builder.
    #[must_use]
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// Builds a pipeline from configuration alone.
    ///
    /// # Errors
    ///
    /// See [`PipelineBuilder::build`].
    pub fn from_config(config: Config) -> Result<Self, PipelineError> {
        Self::builder().config(config).build()
    }

    /// The effective catalog, with config overrides and filter applied.
    #[must_use]
    pub fn catalog(&self) -> &RuleCatalog {
        &self.catalog
    }

    /// The assembled engine.
    #[must_use]
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Analyzes one snapshot and returns the ordered report.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Engine`] if `cancel` fires mid-run.
    pub fn run(
        &self,
        model: SymbolModel,
        cancel: &CancellationToken,
    ) -> Result<Report, PipelineError> {
        let report = self.engine.load(model).analyze(cancel)?.report();
        info!("{}", report.summary());
        Ok(report)
    }
}

/// Resolves the configured preset, defaulting to `recommended`.
fn resolve_preset(config: &Config) -> Result<Preset, PipelineError> {
    match config.preset.as_deref() {
        None => Ok(Preset::default()),
        Some(name) => Preset::parse(name).ok_or_else(|| PipelineError::UnknownPreset {
            name: name.to_string(),
        }),
    }
}
