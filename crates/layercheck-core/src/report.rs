//! Severity classification and the final, ordered report.

use std::cmp::Ordering;

use serde::Serialize;

use crate::types::{Finding, Severity};

/// Exit status for a run without critical findings.
pub const EXIT_OK: i32 = 0;

/// Exit status for a run with at least one critical finding.
pub const EXIT_CRITICAL: i32 = 1;

/// Total order over findings.
///
/// Severity rank, then review priority rank, then subject id, then rule id
/// and message as final tie-breakers.
#[must_use]
pub fn compare(a: &Finding, b: &Finding) -> Ordering {
    a.severity
        .rank()
        .cmp(&b.severity.rank())
        .then(a.priority.rank().cmp(&b.priority.rank()))
        .then_with(|| a.subject.cmp(&b.subject))
        .then_with(|| a.rule.cmp(&b.rule))
        .then_with(|| a.message.cmp(&b.message))
}

/// The result of a completed run: ordered findings, summary counts and the
/// aggregate exit status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    findings: Vec<Finding>,
    modules_checked: usize,
    symbols_checked: usize,
    exit_status: i32,
}

impl Report {
    /// Classifies and orders an unordered union of findings.
    #[must_use]
    pub fn new(mut findings: Vec<Finding>, modules_checked: usize, symbols_checked: usize) -> Self {
        findings.sort_by(compare);
        let exit_status = if findings.iter().any(|f| f.severity == Severity::Critical) {
            EXIT_CRITICAL
        } else {
            EXIT_OK
        };
        Self {
            findings,
            modules_checked,
            symbols_checked,
            exit_status,
        }
    }

    /// Findings in report order.
    #[must_use]
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    /// Number of modules in the analyzed model.
    #[must_use]
    pub fn modules_checked(&self) -> usize {
        self.modules_checked
    }

    /// Number of symbols in the analyzed model.
    #[must_use]
    pub fn symbols_checked(&self) -> usize {
        self.symbols_checked
    }

    /// Aggregate exit status: 1 if any finding is critical, else 0.
    #[must_use]
    pub fn exit_status(&self) -> i32 {
        self.exit_status
    }

    /// Returns findings produced by one rule.
    #[must_use]
    pub fn by_rule(&self, rule: &str) -> Vec<&Finding> {
        self.findings.iter().filter(|f| f.rule == rule).collect()
    }

    /// Counts findings as (critical, suggestion, well-done).
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        self.findings
            .iter()
            .fold((0, 0, 0), |(c, s, w), f| match f.severity {
                Severity::Critical => (c + 1, s, w),
                Severity::Suggestion => (c, s + 1, w),
                Severity::WellDone => (c, s, w + 1),
            })
    }

    /// One-line summary for terminal output.
    #[must_use]
    pub fn summary(&self) -> String {
        let (critical, suggestions, well_done) = self.count_by_severity();
        format!(
            "{} module(s), {} symbol(s) checked: {critical} critical, {suggestions} suggestion(s), {well_done} well-done",
            self.modules_checked, self.symbols_checked
        )
    }
}
