//! Locating and loading `layercheck.toml`.
//!
//! The `--config` flag wins. Otherwise the working directory is searched for
//! `layercheck.toml`, then `.layercheck.toml`, and finally the global
//! `config.toml` under `$LAYERCHECK_CONFIG_DIR` (or `~/.layercheck`). When no
//! file is found the built-in defaults apply.

use anyhow::{Context, Result};
use layercheck::Config;
use std::path::{Path, PathBuf};

const PROJECT_FILES: [&str; 2] = ["layercheck.toml", ".layercheck.toml"];
const GLOBAL_FILE: &str = "config.toml";

/// How the config file was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    /// Named by `--config`; not checked for existence.
    Flag,
    /// In the working directory.
    Project,
    /// In the global config directory.
    Global,
}

/// The config file a run reads, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigSource {
    found: Option<(Lookup, PathBuf)>,
}

impl ConfigSource {
    /// Locates the config file for a run started in `cwd`.
    #[must_use]
    pub fn locate(cwd: &Path, flag: Option<&Path>) -> Self {
        Self::locate_in(cwd, flag, global_dir().as_deref())
    }

    fn locate_in(cwd: &Path, flag: Option<&Path>, global: Option<&Path>) -> Self {
        let found = flag
            .map(|path| (Lookup::Flag, path.to_path_buf()))
            .or_else(|| {
                PROJECT_FILES
                    .iter()
                    .map(|name| cwd.join(name))
                    .find(|path| path.is_file())
                    .map(|path| (Lookup::Project, path))
            })
            .or_else(|| {
                global
                    .map(|dir| dir.join(GLOBAL_FILE))
                    .filter(|path| path.is_file())
                    .map(|path| (Lookup::Global, path))
            });

        if let Some((lookup, path)) = &found {
            tracing::debug!("Config file ({:?}): {}", lookup, path.display());
        }
        Self { found }
    }

    /// Reads the located file, or returns the defaults when there is none.
    ///
    /// A relative `catalog` path in the file is taken relative to the file's
    /// own directory, not the working directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(&self) -> Result<Config> {
        let Some((lookup, path)) = &self.found else {
            return Ok(Config::default());
        };
        if *lookup == Lookup::Global {
            tracing::info!("Using global config: {}", path.display());
        }

        let mut config = Config::from_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        config.catalog = config.catalog.map(|catalog| base.join(catalog));
        Ok(config)
    }
}

fn global_dir() -> Option<PathBuf> {
    std::env::var_os("LAYERCHECK_CONFIG_DIR")
        .map(PathBuf::from)
        .or_else(|| home::home_dir().map(|home| home.join(".layercheck")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn lookup(source: &ConfigSource) -> Option<Lookup> {
        source.found.as_ref().map(|(lookup, _)| *lookup)
    }

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn lookup_order() {
        let cwd = TempDir::new().unwrap();
        let global = TempDir::new().unwrap();
        write(global.path(), GLOBAL_FILE, "");
        let locate = || ConfigSource::locate_in(cwd.path(), None, Some(global.path()));

        assert_eq!(lookup(&locate()), Some(Lookup::Global));
        write(cwd.path(), ".layercheck.toml", "");
        assert_eq!(lookup(&locate()), Some(Lookup::Project));
        let preferred = write(cwd.path(), "layercheck.toml", "preset = \"strict\"\n");
        assert_eq!(locate().load().unwrap().preset.as_deref(), Some("strict"));

        let flagged = ConfigSource::locate_in(cwd.path(), Some(&preferred), Some(global.path()));
        assert_eq!(lookup(&flagged), Some(Lookup::Flag));
    }

    #[test]
    fn missing_flag_file_fails_on_load() {
        let source = ConfigSource::locate_in(Path::new("."), Some(Path::new("/no/such.toml")), None);
        let err = source.load().unwrap_err();
        assert!(err.to_string().starts_with("Failed to load config"));
    }

    #[test]
    fn nothing_found_uses_defaults() {
        let cwd = TempDir::new().unwrap();
        let source = ConfigSource::locate_in(cwd.path(), None, None);
        assert_eq!(source, ConfigSource::default());
        assert!(source.load().unwrap().rules.is_empty());
    }

    #[test]
    fn catalog_path_is_relative_to_the_config_file() {
        let tmp = TempDir::new().unwrap();
        let path = write(tmp.path(), "layercheck.toml", "catalog = \"rules/catalog.toml\"\n");

        let config = ConfigSource::locate_in(tmp.path(), Some(&path), None)
            .load()
            .unwrap();
        assert_eq!(config.catalog, Some(tmp.path().join("rules/catalog.toml")));
    }
}
