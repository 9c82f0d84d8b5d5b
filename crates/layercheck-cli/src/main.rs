//! layercheck CLI tool.
//!
//! Usage:
//! ```bash
//! layercheck check [OPTIONS] [MODEL]
//! layercheck list-rules
//! layercheck init
//! ```
//!
//! Exit status: 0 when no critical finding, 1 when at least one, 2 on a fatal
//! error (unreadable or invalid model, catalog or configuration).

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_file;

/// Exit status for fatal errors.
pub const EXIT_FATAL: u8 = 2;

/// Layered-architecture and code-quality conformance checks
#[derive(Parser)]
#[command(name = "layercheck")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "LAYERCHECK_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a symbol model
    Check {
        /// Model file, or directory of `*.json` shards
        #[arg(default_value = "layercheck-model.json")]
        path: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Only run specific rules (comma-separated catalog ids)
        #[arg(long)]
        rules: Option<String>,

        /// Module-id globs to skip (can be specified multiple times)
        #[arg(short, long)]
        exclude: Vec<String>,

        /// Custom rule catalog (overrides the config file)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Cancel the run after this many seconds
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// List the rules of the effective catalog
    ListRules {
        /// Custom rule catalog (overrides the config file)
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Initialize configuration file
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,

        /// Also write a copy of the built-in rule catalog
        #[arg(long)]
        catalog: bool,
    },
}

/// Output format for reports.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One-line-per-finding compact format.
    Compact,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(EXIT_FATAL)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let cwd = std::env::current_dir()?;
    let source = config_file::ConfigSource::locate(&cwd, cli.config.as_deref());

    match cli.command {
        Commands::Check {
            path,
            format,
            rules,
            exclude,
            catalog,
            timeout,
        } => {
            let options = commands::check::CheckOptions {
                format,
                rules,
                exclude,
                catalog,
                timeout,
            };
            commands::check::run(&path, &options, &source).map(ExitCode::from)
        }
        Commands::ListRules { catalog } => {
            commands::list_rules::run(catalog.as_deref(), &source)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Init { force, catalog } => {
            commands::init::run(&cwd, force, catalog)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
