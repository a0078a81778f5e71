//! Subcommand handlers.

mod config;
mod discover;

use crate::cli::Command;
use crate::error::{DiscoveryError, Result};
use std::path::{Path, PathBuf};

pub use discover::{apply_overrides, render_json, render_text, run_discover};

/// Run the handler for `command`.
pub fn dispatch(command: Command) -> Result<()> {
    match command {
        Command::Discover(args) => discover::cmd_discover(args),
        Command::Config(args) => config::cmd_config(args),
    }
}

/// Directory to run in: `--repo` when given, the current directory otherwise.
fn working_dir(repo: Option<&Path>) -> Result<PathBuf> {
    match repo {
        Some(path) => Ok(path.to_path_buf()),
        None => std::env::current_dir().map_err(|e| {
            DiscoveryError::Config(format!("failed to determine current directory: {}", e))
        }),
    }
}
