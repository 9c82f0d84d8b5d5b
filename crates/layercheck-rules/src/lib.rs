//! # layercheck-rules
//!
//! Built-in per-symbol rules for layercheck.
//!
//! Each rule is a pure predicate over one symbol. Classification and wording
//! come from the rule's catalog definition, so the same predicate can be
//! reclassified by a custom catalog without code changes.
//!
//! ## Available Rules
//!
//! | Id | Default severity | Description |
//! |----|------------------|-------------|
//! | `naming` | suggestion | PascalCase types and members, `I`-prefixed interfaces, camelCase parameters and locals |
//! | `complexity-length` | suggestion | Methods within `max_lines` (default 50) |
//! | `complexity-nesting` | suggestion | Methods within `max_depth` (default 3) |
//! | `async-blocking` | critical | No blocking waits on asynchronous work |
//! | `test-naming` | suggestion | Test methods named as underscore-separated phrases |
//!
//! ## Usage
//!
//! ```ignore
//! use layercheck_core::{Config, Engine, RuleCatalog};
//!
//! let catalog = RuleCatalog::builtin()?;
//! let mut builder = Engine::builder();
//! for rule in layercheck_rules::symbol_rules(&catalog, &Config::default()) {
//!     builder = builder.symbol_rule_box(rule);
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod async_blocking;
pub mod case;
pub mod complexity;
pub mod naming;
mod presets;
pub mod test_naming;

pub use async_blocking::AsyncBlocking;
pub use complexity::{MethodLength, NestingDepth};
pub use naming::Naming;
pub use presets::Preset;
pub use test_naming::TestNaming;

use layercheck_core::{Config, RuleCatalog, RuleDef, SymbolRuleBox};
use tracing::{debug, warn};

/// All rule ids served by this crate.
pub const RULE_IDS: [&str; 5] = [
    naming::ID,
    complexity::LENGTH,
    complexity::NESTING,
    async_blocking::ID,
    test_naming::ID,
];

/// Builds every enabled symbol rule of `catalog`, with thresholds from `config`.
///
/// Rules are returned in catalog declaration order.
#[must_use]
pub fn symbol_rules(catalog: &RuleCatalog, config: &Config) -> Vec<SymbolRuleBox> {
    let mut rules: Vec<SymbolRuleBox> = Vec::new();

    for def in catalog.rules() {
        if !def.is_enabled() {
            debug!("Skipping disabled rule: {}", def.id());
            continue;
        }
        rules.extend(build(def.clone(), config));
    }

    rules
}

/// Builds the predicate for one definition, or `None` for ids served elsewhere.
fn build(def: RuleDef, config: &Config) -> Option<SymbolRuleBox> {
    let rule: SymbolRuleBox = match def.id() {
        naming::ID => Box::new(Naming::new(def)),
        complexity::LENGTH => {
            let max = limit(config, complexity::LENGTH, "max_lines", complexity::DEFAULT_MAX_LINES);
            Box::new(MethodLength::new(def).max_lines(max))
        }
        complexity::NESTING => {
            let max = limit(config, complexity::NESTING, "max_depth", complexity::DEFAULT_MAX_DEPTH);
            Box::new(NestingDepth::new(def).max_depth(max))
        }
        async_blocking::ID => Box::new(AsyncBlocking::new(def)),
        test_naming::ID => Box::new(TestNaming::new(def)),
        _ => return None,
    };
    Some(rule)
}

/// Reads a non-negative integer option, falling back to `default`.
fn limit(config: &Config, rule: &str, key: &str, default: u32) -> u32 {
    let value = config.rule_int(rule, key, i64::from(default));
    u32::try_from(value).unwrap_or_else(|_| {
        warn!("Ignoring out-of-range {rule}.{key} = {value}, using {default}");
        default
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builds_all_rules_in_catalog_order() {
        let catalog = RuleCatalog::builtin().unwrap();
        let rules = symbol_rules(&catalog, &Config::default());
        let ids: Vec<&str> = rules.iter().map(|r| r.id()).collect();
        assert_eq!(
            ids,
            vec![
                "naming",
                "complexity-length",
                "complexity-nesting",
                "async-blocking",
                "test-naming",
            ]
        );
    }

    #[test]
    fn test_skips_disabled_rules() {
        let config = Config::parse("[rules.naming]\nenabled = false\n").unwrap();
        let catalog = RuleCatalog::builtin().unwrap().with_config(&config);
        let rules = symbol_rules(&catalog, &config);
        assert_eq!(rules.len(), 4);
        assert!(rules.iter().all(|r| r.id() != "naming"));
    }

    #[test]
    fn test_limit_rejects_negative_values() {
        let config = Config::parse("[rules.complexity-length]\nmax_lines = -1\n").unwrap();
        assert_eq!(limit(&config, complexity::LENGTH, "max_lines", 50), 50);

        let config = Config::parse("[rules.complexity-length]\nmax_lines = 12\n").unwrap();
        assert_eq!(limit(&config, complexity::LENGTH, "max_lines", 50), 12);
    }
}
