//! CLI argument parsing using clap derive API
//!
//! Purely declarative: no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// logroute -- render fluentd routing config from container log options.
///
/// Use `logroute <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "logroute", version, about, long_about = None)]
pub struct Cli {
    /// Path to the logroute.toml configuration file
    /// (default: ./logroute.toml if present, otherwise built-in defaults).
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Translate a task file and render the fluentd configuration.
    Render(RenderArgs),

    /// Translate a task file and report destinations without rendering.
    Validate(ValidateArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

/// ECS metadata overrides. Unset flags fall back to the `[metadata]` section.
#[derive(Args, Debug, Default, Clone)]
pub struct MetadataArgs {
    /// Cluster name.
    #[arg(long)]
    pub cluster: Option<String>,

    /// Task ARN (required for CloudWatch wildcard streams).
    #[arg(long)]
    pub task_arn: Option<String>,

    /// Task definition family.
    #[arg(long)]
    pub family: Option<String>,

    /// Task definition revision.
    #[arg(long)]
    pub revision: Option<String>,
}

// ---- render ----

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Task file listing containers and their log options (.toml or .json).
    pub task_file: PathBuf,

    #[command(flatten)]
    pub metadata: MetadataArgs,

    /// Write the rendered config to this file instead of stdout.
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Template override file (TOML fragments).
    #[arg(long)]
    pub template: Option<PathBuf>,
}

// ---- validate ----

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Task file listing containers and their log options (.toml or .json).
    pub task_file: PathBuf,

    #[command(flatten)]
    pub metadata: MetadataArgs,
}

// ---- config ----

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, metadata, render).
        #[arg(long)]
        section: Option<String>,
    },
}
