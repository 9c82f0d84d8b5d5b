//! Rule catalog: the static, versioned list of rule definitions.
//!
//! The catalog decides which built-in predicates run and how their findings
//! are classified (severity, category, review priority) and worded.
//!
//! ```text
//! TOML text (built-in or custom)
//!   ↓ serde (DTO layer)
//! CatalogDto
//!   ↓ loader::load (all-or-nothing validation)
//! RuleCatalog
//!   ↓ with_config (per-rule enable / severity overrides)
//! effective catalog for one engine
//! ```

use std::path::Path;

use crate::config::Config;
use crate::types::{Category, Finding, ReviewPriority, Severity};

pub mod dto;
pub mod loader;

pub use loader::{CatalogError, LoadCatalogError};

/// Source text of the built-in catalog.
pub const BUILTIN_CATALOG: &str = include_str!("default.toml");

/// Catalog format version understood by this engine.
pub const SUPPORTED_VERSION: u32 = 1;

// ────────────────────────────────────────────
// Message templates
// ────────────────────────────────────────────

/// A validated message template with `{placeholder}` slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTemplate(String);

impl MessageTemplate {
    /// Validates a template.
    ///
    /// # Errors
    ///
    /// Returns a reason if the template is empty, has an unclosed or stray
    /// brace, or a placeholder that is not `[a-z_]+`.
    pub fn parse(template: &str) -> Result<Self, String> {
        if template.trim().is_empty() {
            return Err("message must not be empty".to_string());
        }

        let mut chars = template.chars();
        while let Some(c) = chars.next() {
            match c {
                '{' => {
                    let mut name = String::new();
                    let mut closed = false;
                    for c in chars.by_ref() {
                        if c == '}' {
                            closed = true;
                            break;
                        }
                        name.push(c);
                    }
                    if !closed {
                        return Err("unclosed `{`".to_string());
                    }
                    if name.is_empty() || !name.chars().all(|c| c.is_ascii_lowercase() || c == '_')
                    {
                        return Err(format!("invalid placeholder `{{{name}}}`"));
                    }
                }
                '}' => return Err("unmatched `}`".to_string()),
                _ => {}
            }
        }

        Ok(Self(template.to_string()))
    }

    /// Substitutes placeholders. Unknown placeholders are kept verbatim.
    #[must_use]
    pub fn render(&self, vars: &[(&str, &str)]) -> String {
        let mut out = String::with_capacity(self.0.len());
        let mut rest = self.0.as_str();

        while let Some(start) = rest.find('{') {
            out.push_str(&rest[..start]);
            let after = &rest[start + 1..];
            // Validated at parse time: every `{` has a matching `}`.
            let Some(end) = after.find('}') else {
                out.push_str(&rest[start..]);
                return out;
            };
            let name = &after[..end];
            match vars.iter().find(|(key, _)| *key == name) {
                Some((_, value)) => out.push_str(value),
                None => {
                    out.push('{');
                    out.push_str(name);
                    out.push('}');
                }
            }
            rest = &after[end + 1..];
        }
        out.push_str(rest);
        out
    }

    /// Returns the raw template text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// ────────────────────────────────────────────
// Rule definitions
// ────────────────────────────────────────────

/// A validated rule definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleDef {
    id: String,
    category: Category,
    severity: Severity,
    priority: ReviewPriority,
    description: String,
    message: MessageTemplate,
    help: Option<String>,
    doc_ref: Option<String>,
    enabled: bool,
}

impl RuleDef {
    /// Creates a rule definition with the category's default priority.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        category: Category,
        severity: Severity,
        message: MessageTemplate,
    ) -> Self {
        Self {
            id: id.into(),
            category,
            severity,
            priority: category.default_priority(),
            description: String::new(),
            message,
            help: None,
            doc_ref: None,
            enabled: true,
        }
    }

    /// Sets the review priority.
    #[must_use]
    pub fn with_priority(mut self, priority: ReviewPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the help text.
    #[must_use]
    pub fn with_help(mut self, help: Option<String>) -> Self {
        self.help = help;
        self
    }

    /// Sets the document reference.
    #[must_use]
    pub fn with_doc_ref(mut self, doc_ref: Option<String>) -> Self {
        self.doc_ref = doc_ref;
        self
    }

    /// Sets whether the rule runs.
    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Rule id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Category.
    #[must_use]
    pub fn category(&self) -> Category {
        self.category
    }

    /// Severity.
    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Review priority.
    #[must_use]
    pub fn priority(&self) -> ReviewPriority {
        self.priority
    }

    /// One-line description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Message template.
    #[must_use]
    pub fn message(&self) -> &MessageTemplate {
        &self.message
    }

    /// Fix hint.
    #[must_use]
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Document reference.
    #[must_use]
    pub fn doc_ref(&self) -> Option<&str> {
        self.doc_ref.as_deref()
    }

    /// Whether the rule runs.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Builds a finding for `subject`, rendering the message with `vars`.
    #[must_use]
    pub fn finding(&self, subject: &str, module: &str, vars: &[(&str, &str)]) -> Finding {
        let mut finding = Finding::new(
            self.id.as_str(),
            self.severity,
            self.category,
            subject,
            module,
            self.message.render(vars),
        )
        .with_priority(self.priority);
        if let Some(help) = &self.help {
            finding = finding.with_help(help.as_str());
        }
        if let Some(doc_ref) = &self.doc_ref {
            finding = finding.with_doc_ref(doc_ref.as_str());
        }
        finding
    }
}

// ────────────────────────────────────────────
// Aggregate root
// ────────────────────────────────────────────

/// Validated rule catalog. Rule ids are unique; order is declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleCatalog {
    version: u32,
    rules: Vec<RuleDef>,
}

impl RuleCatalog {
    /// Creates a catalog with validation.
    ///
    /// # Errors
    ///
    /// Returns every problem found: unsupported version, duplicate ids.
    pub fn new(version: u32, rules: Vec<RuleDef>) -> Result<Self, Vec<CatalogError>> {
        let mut errors = Vec::new();
        if version != SUPPORTED_VERSION {
            errors.push(CatalogError::UnsupportedVersion {
                found: version,
                supported: SUPPORTED_VERSION,
            });
        }

        let mut seen = std::collections::BTreeSet::new();
        for rule in &rules {
            if !seen.insert(rule.id.as_str()) {
                errors.push(CatalogError::DuplicateRule {
                    rule: rule.id.clone(),
                });
            }
        }

        if errors.is_empty() {
            Ok(Self { version, rules })
        } else {
            Err(errors)
        }
    }

    /// Loads the built-in catalog.
    ///
    /// # Errors
    ///
    /// Only fails if the embedded catalog text is itself invalid.
    pub fn builtin() -> Result<Self, LoadCatalogError> {
        Self::from_toml(BUILTIN_CATALOG)
    }

    /// Parses and validates a catalog from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or any rule is invalid.
    pub fn from_toml(content: &str) -> Result<Self, LoadCatalogError> {
        let dto: dto::CatalogDto = toml::from_str(content)?;
        loader::load(dto)
    }

    /// Reads and validates a catalog file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is invalid.
    pub fn from_file(path: &Path) -> Result<Self, LoadCatalogError> {
        let content = std::fs::read_to_string(path).map_err(|source| LoadCatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Catalog format version.
    #[must_use]
    pub fn version(&self) -> u32 {
        self.version
    }

    /// All rules in declaration order.
    #[must_use]
    pub fn rules(&self) -> &[RuleDef] {
        &self.rules
    }

    /// Enabled rules in declaration order.
    pub fn enabled(&self) -> impl Iterator<Item = &RuleDef> {
        self.rules.iter().filter(|r| r.enabled)
    }

    /// Looks up a rule by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&RuleDef> {
        self.rules.iter().find(|r| r.id == id)
    }

    /// Looks up an enabled rule by id.
    #[must_use]
    pub fn get_enabled(&self, id: &str) -> Option<&RuleDef> {
        self.get(id).filter(|r| r.enabled)
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if the catalog has no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Applies per-rule `enabled` and `severity` overrides from configuration.
    #[must_use]
    pub fn with_config(mut self, config: &Config) -> Self {
        for rule in &mut self.rules {
            if !config.is_rule_enabled(&rule.id) {
                rule.enabled = false;
            }
            if let Some(severity) = config.rule_severity(&rule.id) {
                rule.severity = severity;
            }
        }
        self
    }

    /// Disables every rule whose id is not in `ids`.
    #[must_use]
    pub fn only<S: AsRef<str>>(mut self, ids: &[S]) -> Self {
        for rule in &mut self.rules {
            if !ids.iter().any(|id| id.as_ref() == rule.id) {
                rule.enabled = false;
            }
        }
        self
    }
}
