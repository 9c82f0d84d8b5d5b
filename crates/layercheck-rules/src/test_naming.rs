//! Rule requiring test method names to read as underscore-separated phrases.
//!
//! `returns_empty_list_when_no_orders_exist` passes. These fail:
//!
//! - `ReturnsEmptyList` (no underscores)
//! - `Should_return_empty_list` (`Should` prefix)
//! - `GetOrders_returns_empty` (compound segment)
//! - `returns__empty` (empty segment)

use layercheck_core::{Finding, RuleDef, Symbol, SymbolContext, SymbolKind, SymbolRule};

use crate::case::has_case_hump;

/// Rule id for test-naming.
pub const ID: &str = "test-naming";

/// Checks names of methods in test modules.
#[derive(Debug, Clone)]
pub struct TestNaming {
    def: RuleDef,
}

impl TestNaming {
    /// Creates the rule from its catalog definition.
    #[must_use]
    pub fn new(def: RuleDef) -> Self {
        Self { def }
    }
}

/// Why a test name does not read as a phrase, or `None` if it does.
#[must_use]
pub fn phrase_problem(name: &str) -> Option<String> {
    if name.starts_with("Should") {
        return Some("starts with `Should`".to_string());
    }
    if !name.contains('_') {
        return Some("no underscore separators".to_string());
    }
    if name.split('_').any(str::is_empty) {
        return Some("empty segment".to_string());
    }
    name.split('_')
        .find(|segment| has_case_hump(segment))
        .map(|segment| format!("segment `{segment}` is a compound word"))
}

impl SymbolRule for TestNaming {
    fn id(&self) -> &str {
        self.def.id()
    }

    fn description(&self) -> &str {
        self.def.description()
    }

    fn evaluate(&self, ctx: &SymbolContext<'_>, symbol: &Symbol) -> Option<Finding> {
        if !ctx.is_test || symbol.kind() != SymbolKind::Method || symbol.name().is_empty() {
            return None;
        }

        let reason = phrase_problem(symbol.name())?;
        Some(self.def.finding(
            symbol.id().as_str(),
            ctx.module.id().as_str(),
            &[("name", symbol.name()), ("reason", &reason)],
        ))
    }
}
