//! Implementation of the `rulediff config` command.

use super::working_dir;
use crate::cli::ConfigArgs;
use crate::config::Config;
use crate::error::Result;
use crate::git::get_repo_root;

/// Execute the `rulediff config` command.
///
/// Prints the configuration `discover` would start from, before any flag
/// overrides. Outside of a git repository only `--config` is consulted.
pub fn cmd_config(args: ConfigArgs) -> Result<()> {
    let cwd = working_dir(args.repo.as_deref())?;
    let root = get_repo_root(&cwd).unwrap_or(cwd);

    let config = Config::discover(args.config.as_deref(), &root)?;
    print!("{}", config.to_yaml()?);
    Ok(())
}
