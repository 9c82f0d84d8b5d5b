//! Rule enforcing identifier casing conventions.
//!
//! # Rationale
//!
//! Consistent casing lets readers tell types, members and locals apart at a
//! glance and keeps generated documentation uniform.
//!
//! # Detected Patterns
//!
//! - Types, methods and properties not in `PascalCase`
//! - Interfaces not named `I` + `PascalCase`
//! - Parameters and locals not in `camelCase`
//!
//! Methods of test modules are exempt from the `PascalCase` check; their
//! names are governed by `test-naming`. Their parameters and locals are
//! still checked.
//!
//! All problems of one symbol are reported together in a single finding.

use layercheck_core::{Finding, RuleDef, Symbol, SymbolContext, SymbolKind, SymbolRule};

use crate::case::{is_camel_case, is_interface_name, is_pascal_case};

/// Rule id for naming.
pub const ID: &str = "naming";

/// Checks casing of symbol, parameter and local names.
#[derive(Debug, Clone)]
pub struct Naming {
    def: RuleDef,
}

impl Naming {
    /// Creates the rule from its catalog definition.
    #[must_use]
    pub fn new(def: RuleDef) -> Self {
        Self { def }
    }

    fn problems(ctx: &SymbolContext<'_>, symbol: &Symbol) -> Vec<String> {
        let mut problems = Vec::new();
        let name = symbol.name();

        if !name.is_empty() {
            match symbol.kind() {
                SymbolKind::Interface if !is_interface_name(name) => problems.push(format!(
                    "interface `{name}` should be `I` followed by PascalCase"
                )),
                SymbolKind::Method if ctx.is_test => {}
                SymbolKind::Type | SymbolKind::Method | SymbolKind::Property
                    if !is_pascal_case(name) =>
                {
                    problems.push(format!("{} `{name}` should be PascalCase", symbol.kind()));
                }
                _ => {}
            }
        }

        for parameter in symbol.parameters() {
            if !parameter.is_empty() && !is_camel_case(parameter) {
                problems.push(format!("parameter `{parameter}` should be camelCase"));
            }
        }
        for local in symbol.locals() {
            if !local.is_empty() && !is_camel_case(local) {
                problems.push(format!("local `{local}` should be camelCase"));
            }
        }

        problems
    }
}

impl SymbolRule for Naming {
    fn id(&self) -> &str {
        self.def.id()
    }

    fn description(&self) -> &str {
        self.def.description()
    }

    fn evaluate(&self, ctx: &SymbolContext<'_>, symbol: &Symbol) -> Option<Finding> {
        let problems = Self::problems(ctx, symbol);
        if problems.is_empty() {
            return None;
        }

        let problems = problems.join("; ");
        Some(self.def.finding(
            symbol.id().as_str(),
            ctx.module.id().as_str(),
            &[("symbol", symbol.name()), ("problems", &problems)],
        ))
    }
}
