//! Init command implementation.

use anyhow::{bail, Context, Result};
use layercheck::catalog::BUILTIN_CATALOG;
use std::path::Path;

const CONFIG_FILE: &str = "layercheck.toml";
const CATALOG_FILE: &str = "layercheck-rules.toml";

const DEFAULT_CONFIG: &str = r#"# layercheck configuration

# Preset: "recommended" (default), "strict" or "architecture"
# preset = "recommended"

# Custom rule catalog, relative to this file (default: built-in catalog)
# catalog = "layercheck-rules.toml"

[analyzer]
# Module-id globs skipped by the symbol rules. Excluded modules still count
# as dependencies in the module graph.
exclude = []

# Module-id globs marking test modules
test_modules = ["*.Tests", "*.Tests.*", "*.UnitTests", "*.IntegrationTests"]

# Worker threads (default: one per CPU)
# parallelism = 4

# Rule configurations
# Each rule can be enabled/disabled and have its severity overridden

[rules.complexity-length]
enabled = true
# severity = "critical"  # Override default severity
max_lines = 50

[rules.complexity-nesting]
max_depth = 3

# [rules.clean-dependencies]
# enabled = false
"#;

/// Runs the init command in `dir`.
pub fn run(dir: &Path, force: bool, with_catalog: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILE);
    let catalog_path = dir.join(CATALOG_FILE);

    for path in std::iter::once(&config_path).chain(with_catalog.then_some(&catalog_path)) {
        if path.exists() && !force {
            bail!(
                "{} already exists. Use --force to overwrite.",
                path.display()
            );
        }
    }

    if with_catalog {
        let config = DEFAULT_CONFIG.replace(
            &format!("# catalog = \"{CATALOG_FILE}\""),
            &format!("catalog = \"{CATALOG_FILE}\""),
        );
        std::fs::write(&config_path, config)
            .with_context(|| format!("Failed to write {}", config_path.display()))?;
        std::fs::write(&catalog_path, BUILTIN_CATALOG)
            .with_context(|| format!("Failed to write {}", catalog_path.display()))?;
        println!("Created {CONFIG_FILE} and {CATALOG_FILE}");
    } else {
        std::fs::write(&config_path, DEFAULT_CONFIG)
            .with_context(|| format!("Failed to write {}", config_path.display()))?;
        println!("Created {CONFIG_FILE}");
    }

    println!("\nNext steps:");
    println!("  1. Edit {CONFIG_FILE} to configure rules");
    println!("  2. Run: layercheck check <model.json>");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use layercheck::{Config, RuleCatalog};
    use tempfile::TempDir;

    #[test]
    fn writes_parseable_config() {
        let tmp = TempDir::new().unwrap();
        run(tmp.path(), false, false).unwrap();

        let config = Config::from_file(&tmp.path().join(CONFIG_FILE)).unwrap();
        assert!(config.catalog.is_none());
        assert_eq!(config.rule_int("complexity-length", "max_lines", 0), 50);
        assert!(!tmp.path().join(CATALOG_FILE).exists());
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let tmp = TempDir::new().unwrap();
        run(tmp.path(), false, false).unwrap();
        assert!(run(tmp.path(), false, false).is_err());
        assert!(run(tmp.path(), true, false).is_ok());
    }

    #[test]
    fn catalog_copy_is_referenced_and_loadable() {
        let tmp = TempDir::new().unwrap();
        run(tmp.path(), false, true).unwrap();

        let config = Config::from_file(&tmp.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config.catalog, Some(CATALOG_FILE.into()));

        let catalog = RuleCatalog::from_file(&tmp.path().join(CATALOG_FILE)).unwrap();
        assert_eq!(catalog, RuleCatalog::builtin().unwrap());
    }
}
