//! Core types for findings and their classification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Review severity of a finding.
///
/// Declaration order is the report order: critical findings first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Severity {
    /// Must be fixed. Any critical finding fails the run.
    Critical,
    /// Should be addressed, does not fail the run.
    Suggestion,
    /// Recognition of code that already follows the conventions.
    WellDone,
}

impl Severity {
    /// Sort rank used by the reporter (lower sorts first).
    #[must_use]
    pub fn rank(self) -> u8 {
        match self {
            Self::Critical => 0,
            Self::Suggestion => 1,
            Self::WellDone => 2,
        }
    }

    /// Parses a catalog severity label.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "critical" => Some(Self::Critical),
            "suggestion" => Some(Self::Suggestion),
            "well-done" | "welldone" => Some(Self::WellDone),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Critical => write!(f, "critical"),
            Self::Suggestion => write!(f, "suggestion"),
            Self::WellDone => write!(f, "well-done"),
        }
    }
}

/// Rule category as declared in the rule catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Layer direction and module cycles.
    Architecture,
    /// Identifier casing conventions.
    Naming,
    /// Method length and nesting limits.
    Complexity,
    /// Async usage (blocking waits).
    Async,
    /// Test naming conventions.
    Testing,
}

impl Category {
    /// Parses a catalog category label.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "architecture" => Some(Self::Architecture),
            "naming" => Some(Self::Naming),
            "complexity" => Some(Self::Complexity),
            "async" => Some(Self::Async),
            "testing" => Some(Self::Testing),
            _ => None,
        }
    }

    /// Review priority used when the catalog does not set one explicitly.
    #[must_use]
    pub fn default_priority(self) -> ReviewPriority {
        match self {
            Self::Architecture => ReviewPriority::Architecture,
            Self::Async => ReviewPriority::Correctness,
            Self::Naming | Self::Complexity | Self::Testing => ReviewPriority::Maintainability,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Architecture => "architecture",
            Self::Naming => "naming",
            Self::Complexity => "complexity",
            Self::Async => "async",
            Self::Testing => "testing",
        };
        f.write_str(label)
    }
}

/// Review priority order: architecture > performance > correctness > maintainability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewPriority {
    /// Structural problems.
    Architecture,
    /// Throughput and resource usage.
    Performance,
    /// Behavioural risks such as deadlocks.
    Correctness,
    /// Readability and upkeep.
    Maintainability,
}

impl ReviewPriority {
    /// Sort rank used by the reporter (lower sorts first).
    #[must_use]
    pub fn rank(self) -> u8 {
        match self {
            Self::Architecture => 0,
            Self::Performance => 1,
            Self::Correctness => 2,
            Self::Maintainability => 3,
        }
    }

    /// Parses a catalog priority label.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "architecture" => Some(Self::Architecture),
            "performance" => Some(Self::Performance),
            "correctness" => Some(Self::Correctness),
            "maintainability" => Some(Self::Maintainability),
            _ => None,
        }
    }
}

impl fmt::Display for ReviewPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Architecture => "architecture",
            Self::Performance => "performance",
            Self::Correctness => "correctness",
            Self::Maintainability => "maintainability",
        };
        f.write_str(label)
    }
}

/// A module-to-module edge attached to graph findings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeRef {
    /// Depending module.
    pub from: String,
    /// Depended-upon module.
    pub to: String,
}

/// A single rule violation (or recognition) produced by an analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Catalog rule id (e.g., "complexity-nesting").
    pub rule: String,
    /// Severity of this finding.
    pub severity: Severity,
    /// Category of the rule that produced it.
    pub category: Category,
    /// Review priority of the rule that produced it.
    pub priority: ReviewPriority,
    /// Offending identifier: a symbol id, or a module id for module-level findings.
    pub subject: String,
    /// Module owning the subject.
    pub module: String,
    /// Module edge for dependency findings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge: Option<EdgeRef>,
    /// Rendered human-readable message.
    pub message: String,
    /// How to fix it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    /// Reference to a guideline document (e.g., "ARCHITECTURE.md#layers").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_ref: Option<String>,
}

impl Finding {
    /// Creates a new finding.
    #[must_use]
    pub fn new(
        rule: impl Into<String>,
        severity: Severity,
        category: Category,
        subject: impl Into<String>,
        module: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            rule: rule.into(),
            severity,
            category,
            priority: category.default_priority(),
            subject: subject.into(),
            module: module.into(),
            edge: None,
            message: message.into(),
            help: None,
            doc_ref: None,
        }
    }

    /// Overrides the review priority.
    #[must_use]
    pub fn with_priority(mut self, priority: ReviewPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Attaches the module edge this finding is about.
    #[must_use]
    pub fn with_edge(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.edge = Some(EdgeRef {
            from: from.into(),
            to: to.into(),
        });
        self
    }

    /// Adds help text.
    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Adds a design document reference.
    #[must_use]
    pub fn with_doc_ref(mut self, doc_ref: impl Into<String>) -> Self {
        self.doc_ref = Some(doc_ref.into());
        self
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} [{}] {}",
            self.subject, self.severity, self.rule, self.message
        )?;
        if let Some(doc_ref) = &self.doc_ref {
            write!(f, " (see: {doc_ref})")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_finding(severity: Severity) -> Finding {
        Finding::new(
            "naming",
            severity,
            Category::Naming,
            "Shop.Application.OrderService.getOrder",
            "Shop.Application",
            "`getOrder` should be PascalCase",
        )
    }

    #[test]
    fn severity_rank_follows_declaration_order() {
        assert!(Severity::Critical < Severity::Suggestion);
        assert!(Severity::Suggestion < Severity::WellDone);
        assert_eq!(Severity::Critical.rank(), 0);
        assert_eq!(Severity::WellDone.rank(), 2);
    }

    #[test]
    fn severity_parse_accepts_catalog_labels() {
        assert_eq!(Severity::parse("critical"), Some(Severity::Critical));
        assert_eq!(Severity::parse("well-done"), Some(Severity::WellDone));
        assert_eq!(Severity::parse("error"), None);
    }

    #[test]
    fn category_default_priorities() {
        assert_eq!(
            Category::Architecture.default_priority(),
            ReviewPriority::Architecture
        );
        assert_eq!(Category::Async.default_priority(), ReviewPriority::Correctness);
        assert_eq!(
            Category::Naming.default_priority(),
            ReviewPriority::Maintainability
        );
    }

    #[test]
    fn priority_rank_orders_performance_before_correctness() {
        assert!(ReviewPriority::Performance.rank() < ReviewPriority::Correctness.rank());
    }

    #[test]
    fn finding_new_uses_category_priority() {
        let f = make_finding(Severity::Suggestion);
        assert_eq!(f.priority, ReviewPriority::Maintainability);
        assert!(f.edge.is_none());
    }

    #[test]
    fn finding_display_is_single_line() {
        let f = make_finding(Severity::Suggestion).with_edge("A", "B");
        let display = format!("{f}");
        assert!(!display.contains('\n'));
        assert!(display.starts_with("Shop.Application.OrderService.getOrder: suggestion [naming]"));
    }
}
