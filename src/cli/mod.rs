//! CLI argument parsing for rulediff.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Rulediff: find the rules changed on the current git branch.
///
/// Compares every rule file touched between the base branch and HEAD and
/// reports each rule as added, modified, removed, moved or unchanged, with
/// the exact lines a linter should look at.
#[derive(Parser, Debug)]
#[command(name = "rulediff")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for rulediff.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Discover changed rules between the base branch and HEAD.
    ///
    /// Flags override values from the config file.
    Discover(DiscoverArgs),

    /// Print the effective configuration as YAML.
    Config(ConfigArgs),
}

/// Report format for `discover`.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// One line per rule.
    #[default]
    Text,
    /// A JSON array of entries.
    Json,
}

/// Arguments for the `discover` command.
#[derive(Parser, Debug)]
pub struct DiscoverArgs {
    /// Branch to compare HEAD against.
    #[arg(long)]
    pub base_branch: Option<String>,

    /// Fail when the branch has more commits than this.
    #[arg(long)]
    pub max_commits: Option<usize>,

    /// Only check files matching this regex (repeatable).
    #[arg(long)]
    pub include: Vec<String>,

    /// Never check files matching this regex (repeatable).
    #[arg(long)]
    pub exclude: Vec<String>,

    /// Parse the base branch version of matching files leniently (repeatable).
    #[arg(long)]
    pub relaxed: Vec<String>,

    /// Config file (default: .rulediff.yaml in the repository root).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Report format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Repository to inspect (default: current directory).
    #[arg(long)]
    pub repo: Option<PathBuf>,

    /// Append discovery events as NDJSON to this file.
    #[arg(long)]
    pub events: Option<PathBuf>,
}

/// Arguments for the `config` command.
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Config file (default: .rulediff.yaml in the repository root).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Repository to inspect (default: current directory).
    #[arg(long)]
    pub repo: Option<PathBuf>,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
