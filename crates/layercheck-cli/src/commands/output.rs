//! Shared output formatting for reports.

use anyhow::Result;
use layercheck::{Report, Severity};

use crate::OutputFormat;

/// Print a report in the specified format.
pub fn print(report: &Report, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(report),
        OutputFormat::Json => return print_json(report),
        OutputFormat::Compact => print_compact(report),
    }
    Ok(())
}

fn print_text(report: &Report) {
    let (critical, _, _) = report.count_by_severity();

    for finding in report.findings() {
        let severity_indicator = match finding.severity {
            Severity::Critical => "\x1b[31mcritical\x1b[0m",
            Severity::Suggestion => "\x1b[33msuggestion\x1b[0m",
            Severity::WellDone => "\x1b[32mwell-done\x1b[0m",
        };

        println!(
            "{} [{}/{}] at {}",
            finding.rule, finding.category, finding.priority, finding.subject
        );
        println!("  {}: {}", severity_indicator, finding.message);
        if let Some(edge) = &finding.edge {
            println!("  = edge: {} -> {}", edge.from, edge.to);
        }
        if let Some(help) = &finding.help {
            println!("  = help: {help}");
        }
        if let Some(doc_ref) = &finding.doc_ref {
            println!("  = see: {doc_ref}");
        }
        println!();
    }

    let summary_color = if critical > 0 {
        "\x1b[31m"
    } else {
        "\x1b[32m"
    };
    println!("{}{}\x1b[0m", summary_color, report.summary());
}

fn print_json(report: &Report) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    println!("{json}");
    Ok(())
}

fn print_compact(report: &Report) {
    for finding in report.findings() {
        println!("{finding}");
    }
}
