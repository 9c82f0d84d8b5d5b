//! # layercheck-graph
//!
//! Module dependency graph analysis for layercheck.
//!
//! Derives a directed module graph from the symbol references of a
//! [`SymbolModel`](layercheck_core::SymbolModel) and checks it against a
//! layer policy:
//!
//! - [`LayerPolicy`] for the permitted layer order (static table)
//! - [`ModuleGraph`] for edge derivation and three-colour cycle detection
//! - [`DependencyAnalyzer`], a [`ModelRule`](layercheck_core::ModelRule)
//!   producing `architecture`, `architecture-cycle` and `clean-dependencies`
//!   findings

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod analyzer;
pub mod graph;
pub mod policy;

pub use analyzer::DependencyAnalyzer;
pub use graph::{Cycle, DependencyEdge, ModuleGraph};
pub use policy::LayerPolicy;
