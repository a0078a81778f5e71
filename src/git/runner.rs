//! Spawning git and capturing what it prints.

use crate::error::{DiscoveryError, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Captured output of a git command that exited successfully.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitOutput {
    /// Trimmed stdout.
    pub stdout: String,
    /// Trimmed stderr.
    pub stderr: String,
    /// Standard output exactly as produced, for file contents.
    pub raw: Vec<u8>,
}

impl GitOutput {
    fn from_output(output: &Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            raw: output.stdout.clone(),
        }
    }

    /// Build an output from stdout text, as a runner that does not spawn
    /// processes would.
    pub fn from_stdout(stdout: impl Into<String>) -> Self {
        let stdout = stdout.into();
        Self {
            stdout: stdout.trim().to_string(),
            stderr: String::new(),
            raw: stdout.into_bytes(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.stdout.is_empty()
    }

    /// Non-empty lines of stdout.
    pub fn lines(&self) -> Vec<&str> {
        self.stdout.lines().filter(|l| !l.is_empty()).collect()
    }
}

/// Executes git subcommands.
///
/// Implementations receive arguments without the leading `git` and return
/// the captured output, or [`DiscoveryError::Git`] when the command fails.
pub trait CommandRunner {
    fn run(&self, args: &[&str]) -> Result<GitOutput>;
}

/// Runs the `git` binary inside a fixed working directory.
#[derive(Debug, Clone)]
pub struct GitCli {
    cwd: PathBuf,
}

impl GitCli {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self { cwd: cwd.into() }
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }
}

impl CommandRunner for GitCli {
    fn run(&self, args: &[&str]) -> Result<GitOutput> {
        run_git(&self.cwd, args)
    }
}

/// Run `git <args>` in `cwd`.
///
/// A spawn failure or a non-zero exit becomes [`DiscoveryError::Git`], with
/// stderr (or stdout when stderr is empty) in the message.
pub fn run_git<P: AsRef<Path>>(cwd: P, args: &[&str]) -> Result<GitOutput> {
    let cwd = cwd.as_ref();
    tracing::trace!(cwd = %cwd.display(), args = %args.join(" "), "running git");

    let output = Command::new("git")
        .current_dir(cwd)
        .args(args)
        .output()
        .map_err(|e| DiscoveryError::Git(format!("cannot spawn git {}: {}", subcommand(args), e)))?;

    let captured = GitOutput::from_output(&output);
    if output.status.success() {
        return Ok(captured);
    }

    let detail = match captured.stderr.as_str() {
        "" => captured.stdout.as_str(),
        stderr => stderr,
    };
    let code = output
        .status
        .code()
        .map_or_else(|| "signal".to_string(), |c| c.to_string());
    Err(DiscoveryError::Git(format!(
        "git {} exited with {}: {}",
        subcommand(args),
        code,
        detail
    )))
}

/// First argument that is not a `-c key=value` option.
fn subcommand<'a>(args: &[&'a str]) -> &'a str {
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if *arg == "-c" {
            iter.next();
            continue;
        }
        return *arg;
    }
    ""
}

/// Top-level directory of the work tree containing `cwd`.
///
/// Outside of a repository this is a [`DiscoveryError::Config`] error, since
/// the user pointed us at the wrong place.
pub fn get_repo_root<P: AsRef<Path>>(cwd: P) -> Result<PathBuf> {
    let cwd = cwd.as_ref();
    match run_git(cwd, &["rev-parse", "--show-toplevel"]) {
        Ok(output) => Ok(PathBuf::from(&output.stdout)),
        Err(DiscoveryError::Git(msg)) if msg.contains("not a git repository") => {
            Err(DiscoveryError::Config(format!(
                "'{}' is not inside a git repository. Run this command from within a git repository.",
                cwd.display()
            )))
        }
        Err(e) => Err(e),
    }
}
