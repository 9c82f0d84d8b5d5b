//! Rule to forbid blocking on asynchronous work.
//!
//! # Rationale
//!
//! Blocking on a task (`.Result`, `.Wait()`, `.GetAwaiter().GetResult()`,
//! `Task.WaitAll`, `Task.WaitAny`) ties up a thread and can deadlock when a
//! synchronization context is present. Async work must be awaited.
//!
//! The front end reports the blocking call shapes per symbol; this rule only
//! reads that list. An empty list means non-blocking.

use layercheck_core::{BlockingWait, Finding, RuleDef, Symbol, SymbolContext, SymbolRule};

/// Rule id for async-blocking.
pub const ID: &str = "async-blocking";

/// Flags symbols that block on asynchronous operations.
#[derive(Debug, Clone)]
pub struct AsyncBlocking {
    def: RuleDef,
}

impl AsyncBlocking {
    /// Creates the rule from its catalog definition.
    #[must_use]
    pub fn new(def: RuleDef) -> Self {
        Self { def }
    }
}

impl SymbolRule for AsyncBlocking {
    fn id(&self) -> &str {
        self.def.id()
    }

    fn description(&self) -> &str {
        self.def.description()
    }

    fn evaluate(&self, ctx: &SymbolContext<'_>, symbol: &Symbol) -> Option<Finding> {
        if symbol.blocking_waits().is_empty() {
            return None;
        }

        let mut shapes: Vec<BlockingWait> = Vec::new();
        for wait in symbol.blocking_waits() {
            if !shapes.contains(wait) {
                shapes.push(*wait);
            }
        }
        let calls = shapes
            .iter()
            .map(|w| format!("`{}`", w.call_shape()))
            .collect::<Vec<_>>()
            .join(", ");

        Some(self.def.finding(
            symbol.id().as_str(),
            ctx.module.id().as_str(),
            &[("symbol", symbol.name()), ("calls", &calls)],
        ))
    }
}
