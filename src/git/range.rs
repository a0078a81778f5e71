//! Commit range and commit message lookups.

use super::runner::CommandRunner;
use crate::error::{DiscoveryError, Result};
use serde::Serialize;

/// Commits on HEAD that are not on the base branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitRange {
    /// Oldest commit in the range.
    pub from: String,
    /// Newest commit in the range.
    pub to: String,
    /// Every commit in the range, oldest first.
    pub commits: Vec<String>,
}

impl CommitRange {
    /// Revision the range is diffed against (parent of the oldest commit).
    pub fn base(&self) -> String {
        format!("{}^", self.from)
    }
}

/// Resolve the commits between `base_branch` and HEAD.
///
/// Runs `git log --format=%H --no-abbrev-commit --reverse {base}..HEAD`.
/// An empty range is an error: there is nothing to compare.
pub fn commit_range(runner: &dyn CommandRunner, base_branch: &str) -> Result<CommitRange> {
    let range = format!("{}..HEAD", base_branch);
    let output = runner.run(&["log", "--format=%H", "--no-abbrev-commit", "--reverse", &range])?;

    let commits: Vec<String> = output
        .lines()
        .into_iter()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    let (Some(from), Some(to)) = (commits.first().cloned(), commits.last().cloned()) else {
        return Err(DiscoveryError::Git(format!(
            "empty commit range: no commits on HEAD since {}",
            base_branch
        )));
    };

    Ok(CommitRange { from, to, commits })
}

/// Full message of one commit.
///
/// Runs `git show -s --format=%B {commit}`.
pub fn commit_message(runner: &dyn CommandRunner, commit: &str) -> Result<String> {
    let output = runner.run(&["show", "-s", "--format=%B", commit])?;
    Ok(output.stdout)
}
