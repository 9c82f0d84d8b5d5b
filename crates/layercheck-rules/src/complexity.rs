//! Rules limiting the size and nesting of methods.
//!
//! # Configuration
//!
//! - `complexity-length.max_lines`: maximum lines in a method (default: 50)
//! - `complexity-nesting.max_depth`: maximum block nesting depth (default: 3)
//!
//! A method exactly at a limit passes.

use layercheck_core::{Finding, RuleDef, Symbol, SymbolContext, SymbolKind, SymbolRule};

/// Rule id for method length.
pub const LENGTH: &str = "complexity-length";

/// Rule id for nesting depth.
pub const NESTING: &str = "complexity-nesting";

/// Default maximum lines per method.
pub const DEFAULT_MAX_LINES: u32 = 50;

/// Default maximum nesting depth per method.
pub const DEFAULT_MAX_DEPTH: u32 = 3;

/// Flags methods longer than a line limit.
#[derive(Debug, Clone)]
pub struct MethodLength {
    def: RuleDef,
    max_lines: u32,
}

impl MethodLength {
    /// Creates the rule with the default limit.
    #[must_use]
    pub fn new(def: RuleDef) -> Self {
        Self {
            def,
            max_lines: DEFAULT_MAX_LINES,
        }
    }

    /// Sets the maximum line count.
    #[must_use]
    pub fn max_lines(mut self, max: u32) -> Self {
        self.max_lines = max;
        self
    }
}

impl SymbolRule for MethodLength {
    fn id(&self) -> &str {
        self.def.id()
    }

    fn description(&self) -> &str {
        self.def.description()
    }

    fn evaluate(&self, ctx: &SymbolContext<'_>, symbol: &Symbol) -> Option<Finding> {
        let lines = symbol.metrics().line_count;
        if symbol.kind() != SymbolKind::Method || lines <= self.max_lines {
            return None;
        }

        Some(self.def.finding(
            symbol.id().as_str(),
            ctx.module.id().as_str(),
            &[
                ("symbol", symbol.name()),
                ("lines", &lines.to_string()),
                ("max", &self.max_lines.to_string()),
            ],
        ))
    }
}

/// Flags methods nested deeper than a limit.
#[derive(Debug, Clone)]
pub struct NestingDepth {
    def: RuleDef,
    max_depth: u32,
}

impl NestingDepth {
    /// Creates the rule with the default limit.
    #[must_use]
    pub fn new(def: RuleDef) -> Self {
        Self {
            def,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Sets the maximum nesting depth.
    #[must_use]
    pub fn max_depth(mut self, max: u32) -> Self {
        self.max_depth = max;
        self
    }
}

impl SymbolRule for NestingDepth {
    fn id(&self) -> &str {
        self.def.id()
    }

    fn description(&self) -> &str {
        self.def.description()
    }

    fn evaluate(&self, ctx: &SymbolContext<'_>, symbol: &Symbol) -> Option<Finding> {
        let depth = symbol.metrics().nesting_depth;
        if symbol.kind() != SymbolKind::Method || depth <= self.max_depth {
            return None;
        }

        Some(self.def.finding(
            symbol.id().as_str(),
            ctx.module.id().as_str(),
            &[
                ("symbol", symbol.name()),
                ("depth", &depth.to_string()),
                ("max", &self.max_depth.to_string()),
            ],
        ))
    }
}
