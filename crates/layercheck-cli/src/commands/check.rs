//! Check command implementation.

use anyhow::{Context, Result};
use layercheck::model::{self, dto::SymbolModelDto};
use layercheck::{LoadModelError, Pipeline, SymbolModel};
use miette::Diagnostic;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::config_file::ConfigSource;
use crate::{OutputFormat, EXIT_FATAL};

/// Options of the check command.
#[derive(Debug, Default)]
pub struct CheckOptions {
    /// Output format.
    pub format: OutputFormat,
    /// Comma-separated catalog ids to run.
    pub rules: Option<String>,
    /// Extra module-id globs to skip.
    pub exclude: Vec<String>,
    /// Catalog path overriding the config file.
    pub catalog: Option<PathBuf>,
    /// Seconds before the run is cancelled.
    pub timeout: Option<u64>,
}

/// Runs the check command and returns the process exit status.
pub fn run(path: &Path, options: &CheckOptions, source: &ConfigSource) -> Result<u8> {
    let mut config = source.load()?;
    config
        .analyzer
        .exclude
        .extend(options.exclude.iter().cloned());

    let mut builder = Pipeline::builder().config(config);
    if let Some(catalog) = &options.catalog {
        builder = builder.catalog_path(catalog);
    }
    if let Some(filter) = &options.rules {
        builder = builder.only(parse_rule_filter(filter));
    }
    let pipeline = match builder.build() {
        Ok(pipeline) => pipeline,
        Err(e) => return Ok(fatal(e)),
    };

    let model = match load_model(path) {
        Ok(model) => model,
        Err(e) => return Ok(fatal(e)),
    };

    tracing::info!(
        "Checking {} with {} rules",
        path.display(),
        pipeline.engine().rule_count()
    );

    let cancel = CancellationToken::new();
    if let Some(secs) = options.timeout {
        spawn_watchdog(cancel.clone(), Duration::from_secs(secs))?;
    }

    let report = match pipeline.run(model, &cancel) {
        Ok(report) => report,
        Err(e) => return Ok(fatal(e)),
    };

    super::output::print(&report, options.format)?;

    Ok(u8::try_from(report.exit_status()).unwrap_or(EXIT_FATAL))
}

/// Splits `a, b,c` into trimmed, non-empty ids.
fn parse_rule_filter(filter: &str) -> Vec<String> {
    filter
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

/// Loads a model file, or merges every `*.json` shard under a directory.
fn load_model(path: &Path) -> Result<SymbolModel, LoadModelError> {
    if !path.is_dir() {
        return model::from_file(path);
    }

    let paths = shard_paths(path)?;
    if paths.is_empty() {
        return Err(LoadModelError::NoShards {
            path: path.to_path_buf(),
        });
    }

    let mut shards = Vec::new();
    for shard in paths {
        tracing::debug!("Reading model shard: {}", shard.display());
        let content = std::fs::read_to_string(&shard).map_err(|source| LoadModelError::Io {
            path: shard.clone(),
            source,
        })?;
        shards.push(SymbolModelDto::from_json(&content)?);
    }
    model::load_shards(shards)
}

/// Finds `*.json` files under `root`, honouring ignore files, in name order.
fn shard_paths(root: &Path) -> Result<Vec<PathBuf>, LoadModelError> {
    let mut builder = ignore::WalkBuilder::new(root);
    builder.sort_by_file_name(|a, b| a.cmp(b));

    let mut paths = Vec::new();
    for entry in builder.build() {
        let entry = entry.map_err(|e| LoadModelError::Io {
            path: root.to_path_buf(),
            source: std::io::Error::other(e),
        })?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            paths.push(path.to_path_buf());
        }
    }
    Ok(paths)
}

/// Cancels `token` once `after` elapses.
fn spawn_watchdog(token: CancellationToken, after: Duration) -> Result<()> {
    std::thread::Builder::new()
        .name("layercheck-watchdog".to_string())
        .spawn(move || {
            std::thread::sleep(after);
            if !token.is_cancelled() {
                tracing::warn!("Timeout after {}s, cancelling analysis", after.as_secs());
                token.cancel();
            }
        })
        .context("Failed to start timeout watchdog")?;
    Ok(())
}

/// Renders a fatal diagnostic and returns the fatal exit status.
fn fatal<E: Diagnostic + Send + Sync + 'static>(err: E) -> u8 {
    eprintln!("{:?}", miette::Report::new(err));
    EXIT_FATAL
}
