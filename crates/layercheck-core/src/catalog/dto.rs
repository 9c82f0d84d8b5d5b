//! TOML deserialization types (DTO layer) for the rule catalog.
//!
//! These types exist solely for serde deserialization.
//! They are converted to domain types via the loader.

use serde::Deserialize;

/// Raw TOML representation of a rule catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogDto {
    /// Catalog format version.
    pub version: u32,

    /// Rule definitions, in declaration order.
    #[serde(default)]
    pub rules: Vec<RuleDto>,
}

/// TOML representation of a single rule.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleDto {
    /// Rule id; selects the built-in predicate (e.g., "naming").
    pub id: String,
    /// Category label.
    pub category: String,
    /// Severity label.
    pub severity: String,
    /// Review priority label (default: derived from category).
    #[serde(default)]
    pub priority: Option<String>,
    /// One-line description.
    #[serde(default)]
    pub description: String,
    /// Message template with `{placeholder}` substitution.
    pub message: String,
    /// Fix hint.
    #[serde(default)]
    pub help: Option<String>,
    /// Document reference.
    #[serde(default)]
    pub doc: Option<String>,
    /// Whether the rule runs (default: true).
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_minimal_rule() {
        let toml_str = r#"
version = 1

[[rules]]
id = "naming"
category = "naming"
severity = "suggestion"
message = "bad name"
"#;
        let dto: CatalogDto = toml::from_str(toml_str).unwrap();
        assert_eq!(dto.version, 1);
        assert_eq!(dto.rules.len(), 1);
        assert!(dto.rules[0].enabled);
        assert!(dto.rules[0].priority.is_none());
    }

    #[test]
    fn version_is_required() {
        let result: Result<CatalogDto, _> = toml::from_str("rules = []");
        assert!(result.is_err());
    }
}
