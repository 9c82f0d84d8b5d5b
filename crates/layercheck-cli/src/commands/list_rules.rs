//! List rules command implementation.

use anyhow::{Context, Result};
use layercheck::graph::LayerPolicy;
use layercheck::rules::Preset;
use layercheck::{Layer, Pipeline};
use std::path::Path;

use crate::config_file::ConfigSource;

/// Runs the list-rules command over the effective catalog.
pub fn run(catalog: Option<&Path>, source: &ConfigSource) -> Result<()> {
    let mut builder = Pipeline::builder().config(source.load()?);
    if let Some(path) = catalog {
        builder = builder.catalog_path(path);
    }
    let pipeline = builder.build().context("Failed to load rule catalog")?;
    let catalog = pipeline.catalog();

    println!("Rules (catalog version {}):\n", catalog.version());
    println!(
        "{:<20} {:<11} {:<13} {:<8} Description",
        "Id", "Severity", "Category", "Enabled"
    );
    println!("{}", "-".repeat(90));

    for rule in catalog.rules() {
        println!(
            "{:<20} {:<11} {:<13} {:<8} {}",
            rule.id(),
            rule.severity().to_string(),
            rule.category().to_string(),
            if rule.is_enabled() { "yes" } else { "no" },
            rule.description()
        );
    }

    println!("\nLayer order:");
    for row in layer_rows(&LayerPolicy::standard()) {
        println!("  {row}");
    }

    println!("\nPresets:");
    for preset in Preset::ALL {
        let summary = match preset {
            Preset::Recommended => "all built-in rules with catalog defaults (default)",
            Preset::Strict => "max_lines 30, max_depth 2, naming promoted to critical",
            Preset::Architecture => "dependency-graph rules only",
        };
        println!("  {:<13} - {}", preset.name(), summary);
    }

    println!("\nUse --rules to filter specific rules, e.g.:");
    println!("  layercheck check --rules architecture,async-blocking");

    Ok(())
}

/// One `From -> allowed targets` line per layer.
fn layer_rows(policy: &LayerPolicy) -> Vec<String> {
    Layer::ALL
        .iter()
        .map(|&layer| {
            let targets = policy
                .allowed_targets(layer)
                .map(Layer::as_str)
                .collect::<Vec<_>>();
            let targets = if targets.is_empty() {
                "(none)".to_string()
            } else {
                targets.join(", ")
            };
            format!("{:<15} -> {}", layer.as_str(), targets)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_layer_rows() {
        assert_eq!(
            layer_rows(&LayerPolicy::standard()),
            vec![
                "Domain          -> (none)",
                "Application     -> Domain",
                "Infrastructure  -> Domain, Application",
                "API             -> Application, Infrastructure",
            ]
        );
    }
}
