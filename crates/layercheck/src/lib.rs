//! # layercheck
//!
//! Layered-architecture and code-quality conformance checks over a
//! pre-extracted symbol model.
//!
//! This is the facade crate: it re-exports the core types and wires the
//! dependency-graph analyzer and the built-in symbol rules into one
//! [`Pipeline`].
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use layercheck::{model, Config, Pipeline};
//! use tokio_util::sync::CancellationToken;
//!
//! let snapshot = model::from_file("model.json".as_ref())?;
//! let pipeline = Pipeline::from_config(Config::default())?;
//! let report = pipeline.run(snapshot, &CancellationToken::new())?;
//!
//! for finding in report.findings() {
//!     println!("{}: {}", finding.rule, finding.message);
//! }
//! std::process::exit(report.exit_status());
//! ```
//!
//! ## Suppressions
//!
//! A symbol may carry `{ "rule": "...", "reason": "..." }` suppressions in the
//! model. Suppressing a critical finding requires a reason.

#![forbid(unsafe_code)]

mod pipeline;
pub mod registry;

pub use layercheck_core::*;
pub use pipeline::{Pipeline, PipelineBuilder, PipelineError};

/// Module dependency graph analysis.
pub mod graph {
    pub use layercheck_graph::*;
}

/// Built-in symbol rules and presets.
pub mod rules {
    pub use layercheck_rules::*;
}
