//! # layercheck-core
//!
//! Core framework for layered-architecture conformance checks over a
//! pre-extracted symbol model.
//!
//! This crate provides the foundational types and the run machinery:
//!
//! - [`SymbolModel`], the validated snapshot produced by a language front end
//! - [`RuleCatalog`], the versioned list of rule definitions
//! - [`SymbolRule`] and [`ModelRule`], the two rule traits
//! - [`Engine`], which fans rules out over the model and fans findings back in
//! - [`Report`], the ordered findings and the aggregate exit status
//!
//! ## Example
//!
//! ```ignore
//! use layercheck_core::{Engine, SymbolModel};
//! use tokio_util::sync::CancellationToken;
//!
//! let model = layercheck_core::model::from_file("model.json".as_ref())?;
//! let engine = Engine::builder()
//!     .symbol_rule(MyRule::new())
//!     .build()?;
//!
//! let report = engine.load(model).analyze(&CancellationToken::new())?.report();
//! std::process::exit(report.exit_status());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod context;
mod engine;
mod report;
mod rule;
mod types;

/// Rule catalog and its declarative TOML loader.
pub mod catalog;
/// Symbol model and its JSON loader.
pub mod model;

pub use catalog::{LoadCatalogError, MessageTemplate, RuleCatalog, RuleDef};
pub use config::{
    AnalyzerConfig, Config, ConfigError, ModulePatterns, RuleConfig, DEFAULT_TEST_MODULES,
};
pub use context::{Cancelled, ModelContext, SymbolContext};
pub use engine::{Analyzed, Engine, EngineBuilder, EngineError, Loaded};
pub use model::{
    BlockingWait, Layer, LoadModelError, Metrics, Module, ModuleId, Reference, Suppression, Symbol,
    SymbolId, SymbolKind, SymbolModel,
};
pub use report::{compare, Report, EXIT_CRITICAL, EXIT_OK};
pub use rule::{ModelRule, ModelRuleBox, SymbolRule, SymbolRuleBox};
pub use types::{Category, EdgeRef, Finding, ReviewPriority, Severity};
