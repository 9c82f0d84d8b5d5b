//! DTO → domain catalog conversion with validation.

use std::path::PathBuf;

use miette::Diagnostic;

use super::dto::{CatalogDto, RuleDto};
use super::{MessageTemplate, RuleCatalog, RuleDef};
use crate::types::{Category, ReviewPriority, Severity};

/// A single validation problem in a rule catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Diagnostic)]
pub enum CatalogError {
    /// Catalog `version` is not understood by this engine.
    #[error("unsupported catalog version {found} (supported: {supported})")]
    #[diagnostic(code(layercheck::catalog::version))]
    UnsupportedVersion {
        /// Version in the file.
        found: u32,
        /// Version this engine reads.
        supported: u32,
    },

    /// A rule has an empty id.
    #[error("rules[{index}]: id must not be empty")]
    #[diagnostic(code(layercheck::catalog::empty_id))]
    EmptyRuleId {
        /// Position in the `[[rules]]` array.
        index: usize,
    },

    /// Two rules share an id.
    #[error("rule `{rule}` is defined more than once")]
    #[diagnostic(code(layercheck::catalog::duplicate_rule))]
    DuplicateRule {
        /// Duplicated id.
        rule: String,
    },

    /// Category label is unknown.
    #[error("rule `{rule}`: unknown category `{value}`, expected: architecture, naming, complexity, async, testing")]
    #[diagnostic(code(layercheck::catalog::unknown_category))]
    UnknownCategory {
        /// Offending rule.
        rule: String,
        /// The invalid label.
        value: String,
    },

    /// Severity label is unknown.
    #[error("rule `{rule}`: unknown severity `{value}`, expected: critical, suggestion, well-done")]
    #[diagnostic(code(layercheck::catalog::unknown_severity))]
    UnknownSeverity {
        /// Offending rule.
        rule: String,
        /// The invalid label.
        value: String,
    },

    /// Priority label is unknown.
    #[error("rule `{rule}`: unknown priority `{value}`, expected: architecture, performance, correctness, maintainability")]
    #[diagnostic(code(layercheck::catalog::unknown_priority))]
    UnknownPriority {
        /// Offending rule.
        rule: String,
        /// The invalid label.
        value: String,
    },

    /// Message template is malformed.
    #[error("rule `{rule}`: invalid message template: {reason}")]
    #[diagnostic(code(layercheck::catalog::invalid_template))]
    InvalidTemplate {
        /// Offending rule.
        rule: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Rule id has no built-in predicate.
    #[error("rule `{rule}` has no built-in implementation")]
    #[diagnostic(
        code(layercheck::catalog::unknown_rule),
        help("a catalog may reclassify or reword built-in rules, but cannot add new ones")
    )]
    UnknownRule {
        /// Offending rule.
        rule: String,
    },
}

/// Fatal errors while loading a rule catalog.
#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum LoadCatalogError {
    /// Catalog file could not be read.
    #[error("failed to read rule catalog {path}: {source}")]
    #[diagnostic(code(layercheck::catalog::io))]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Catalog TOML is malformed.
    #[error("failed to parse rule catalog: {0}")]
    #[diagnostic(code(layercheck::catalog::toml))]
    Toml(#[from] toml::de::Error),

    /// Catalog content failed validation.
    #[error("rule catalog validation errors:\n{}", format_errors(.errors))]
    #[diagnostic(code(layercheck::catalog::invalid))]
    Invalid {
        /// Every problem found.
        #[related]
        errors: Vec<CatalogError>,
    },
}

fn format_errors(errors: &[CatalogError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {e}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Converts a `CatalogDto` into a validated [`RuleCatalog`].
///
/// # Errors
///
/// Returns [`LoadCatalogError::Invalid`] listing every problem found.
pub fn load(dto: CatalogDto) -> Result<RuleCatalog, LoadCatalogError> {
    let mut errors = Vec::new();
    let mut rules = Vec::with_capacity(dto.rules.len());

    for (index, rule) in dto.rules.into_iter().enumerate() {
        match convert_rule(index, rule) {
            Ok(def) => rules.push(def),
            Err(mut e) => errors.append(&mut e),
        }
    }

    match RuleCatalog::new(dto.version, rules) {
        Ok(catalog) if errors.is_empty() => Ok(catalog),
        Ok(_) => Err(LoadCatalogError::Invalid { errors }),
        Err(mut e) => {
            errors.append(&mut e);
            Err(LoadCatalogError::Invalid { errors })
        }
    }
}

fn convert_rule(index: usize, dto: RuleDto) -> Result<RuleDef, Vec<CatalogError>> {
    let mut errors = Vec::new();

    if dto.id.trim().is_empty() {
        errors.push(CatalogError::EmptyRuleId { index });
    }

    let category = Category::parse(&dto.category);
    if category.is_none() {
        errors.push(CatalogError::UnknownCategory {
            rule: dto.id.clone(),
            value: dto.category.clone(),
        });
    }

    let severity = Severity::parse(&dto.severity);
    if severity.is_none() {
        errors.push(CatalogError::UnknownSeverity {
            rule: dto.id.clone(),
            value: dto.severity.clone(),
        });
    }

    let priority = match &dto.priority {
        None => None,
        Some(label) => {
            let parsed = ReviewPriority::parse(label);
            if parsed.is_none() {
                errors.push(CatalogError::UnknownPriority {
                    rule: dto.id.clone(),
                    value: label.clone(),
                });
            }
            parsed
        }
    };

    let message = match MessageTemplate::parse(&dto.message) {
        Ok(m) => Some(m),
        Err(reason) => {
            errors.push(CatalogError::InvalidTemplate {
                rule: dto.id.clone(),
                reason,
            });
            None
        }
    };

    let (Some(category), Some(severity), Some(message), true) =
        (category, severity, message, errors.is_empty())
    else {
        return Err(errors);
    };

    let mut def = RuleDef::new(dto.id, category, severity, message)
        .with_description(dto.description)
        .with_help(dto.help)
        .with_doc_ref(dto.doc)
        .with_enabled(dto.enabled);
    if let Some(priority) = priority {
        def = def.with_priority(priority);
    }
    Ok(def)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invalid_errors(result: Result<RuleCatalog, LoadCatalogError>) -> Vec<CatalogError> {
        match result {
            Err(LoadCatalogError::Invalid { errors }) => errors,
            other => panic!("expected validation errors, got {other:?}"),
        }
    }

    #[test]
    fn explicit_priority_overrides_category_default() {
        let catalog = RuleCatalog::from_toml(
            r#"
version = 1

[[rules]]
id = "complexity-nesting"
category = "complexity"
severity = "suggestion"
priority = "performance"
message = "too deep"
"#,
        )
        .unwrap();
        assert_eq!(
            catalog.get("complexity-nesting").unwrap().priority(),
            ReviewPriority::Performance
        );
    }

    #[test]
    fn disabled_rule_is_kept_but_not_enabled() {
        let catalog = RuleCatalog::from_toml(
            r#"
version = 1

[[rules]]
id = "naming"
category = "naming"
severity = "suggestion"
message = "x"
enabled = false
"#,
        )
        .unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.enabled().count(), 0);
    }

    #[test]
    fn rejects_unsupported_version() {
        let errors = invalid_errors(RuleCatalog::from_toml("version = 2"));
        assert_eq!(
            errors,
            vec![CatalogError::UnsupportedVersion {
                found: 2,
                supported: 1
            }]
        );
    }

    #[test]
    fn collects_every_rule_error() {
        let errors = invalid_errors(RuleCatalog::from_toml(
            r#"
version = 1

[[rules]]
id = "naming"
category = "style"
severity = "error"
priority = "urgent"
message = "broken {"

[[rules]]
id = ""
category = "naming"
severity = "suggestion"
message = "x"
"#,
        ));
        assert_eq!(errors.len(), 5);
        assert!(errors
            .iter()
            .any(|e| matches!(e, CatalogError::EmptyRuleId { index: 1 })));
    }

    #[test]
    fn rejects_duplicate_ids_across_valid_rules() {
        let errors = invalid_errors(RuleCatalog::from_toml(
            r#"
version = 1

[[rules]]
id = "naming"
category = "naming"
severity = "suggestion"
message = "a"

[[rules]]
id = "naming"
category = "naming"
severity = "critical"
message = "b"
"#,
        ));
        assert_eq!(
            errors,
            vec![CatalogError::DuplicateRule {
                rule: "naming".to_string()
            }]
        );
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(matches!(
            RuleCatalog::from_toml("version = "),
            Err(LoadCatalogError::Toml(_))
        ));
    }
}
