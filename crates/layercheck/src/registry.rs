//! Registry of built-in rule predicates.
//!
//! A catalog may reclassify or reword rules, but every id it declares must
//! map to a predicate implemented by one of the analyzer crates.

use layercheck_core::catalog::CatalogError;
use layercheck_core::{LoadCatalogError, RuleCatalog};

/// Every rule id with a built-in predicate, graph rules first.
pub fn rule_ids() -> impl Iterator<Item = &'static str> {
    layercheck_graph::analyzer::RULE_IDS
        .into_iter()
        .chain(layercheck_rules::RULE_IDS)
}

/// Returns true if `id` has a built-in predicate.
#[must_use]
pub fn is_known(id: &str) -> bool {
    rule_ids().any(|known| known == id)
}

/// Checks that every catalog rule has a built-in predicate.
///
/// # Errors
///
/// Returns [`LoadCatalogError::Invalid`] listing every unknown id.
pub fn validate(catalog: &RuleCatalog) -> Result<(), LoadCatalogError> {
    let errors: Vec<CatalogError> = catalog
        .rules()
        .iter()
        .filter(|def| !is_known(def.id()))
        .map(|def| CatalogError::UnknownRule {
            rule: def.id().to_string(),
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(LoadCatalogError::Invalid { errors })
    }
}
