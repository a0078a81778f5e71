//! File-level changes over a commit range.

use super::range::CommitRange;
use super::runner::CommandRunner;
use crate::diff::{ChangedFile, added_lines_by_file, parse_name_status};
use crate::error::Result;
use serde::Serialize;

/// Git file mode of a symbolic link.
const SYMLINK_MODE: &str = "120000 ";

/// A path on one side of a change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PathInfo {
    /// Repository-relative path (forward slashes).
    pub name: String,
    /// Repository-relative target when the path is a symlink.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symlink_target: Option<String>,
}

impl PathInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            symlink_target: None,
        }
    }

    /// Path the content was actually read from.
    pub fn effective_path(&self) -> &str {
        self.symlink_target.as_deref().unwrap_or(&self.name)
    }
}

/// One changed file over a commit range.
///
/// Added files have an empty `body_before`, deleted files an empty
/// `body_after`; both sides always carry a path name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileChange {
    pub before: PathInfo,
    pub after: PathInfo,
    pub body_before: Vec<u8>,
    pub body_after: Vec<u8>,
    /// Lines of the after body added or changed over the range, ascending.
    pub modified_lines: Vec<usize>,
    /// Commits in the range touching this file, newest first.
    pub commits: Vec<String>,
}

/// List every file changed over `range` with both bodies.
///
/// The range is diffed from the parent of its oldest commit to its newest
/// commit, with rename detection so moved files keep their history.
pub fn changes(runner: &dyn CommandRunner, range: &CommitRange) -> Result<Vec<FileChange>> {
    let base = range.base();

    let status = runner.run(&[
        "-c",
        "core.quotepath=off",
        "diff",
        "--name-status",
        "-M",
        "--no-color",
        &base,
        &range.to,
    ])?;
    let files = parse_name_status(&status.stdout)?;
    if files.is_empty() {
        return Ok(Vec::new());
    }

    let diff = runner.run(&[
        "-c",
        "core.quotepath=off",
        "diff",
        "-U0",
        "-M",
        "--no-color",
        &base,
        &range.to,
    ])?;
    let mut added = added_lines_by_file(&String::from_utf8_lossy(&diff.raw));

    let mut result = Vec::with_capacity(files.len());
    for file in files {
        let (before, body_before) = match &file.before {
            Some(path) => read_path(runner, &base, path)?,
            None => (
                PathInfo::new(file.after.clone().unwrap_or_default()),
                Vec::new(),
            ),
        };
        let (after, body_after) = match &file.after {
            Some(path) => read_path(runner, &range.to, path)?,
            None => (PathInfo::new(before.name.clone()), Vec::new()),
        };

        let modified_lines = file
            .after
            .as_ref()
            .and_then(|path| added.remove(path))
            .unwrap_or_default();
        let commits = touching_commits(runner, &base, &range.to, &file)?;

        result.push(FileChange {
            before,
            after,
            body_before,
            body_after,
            modified_lines,
            commits,
        });
    }

    Ok(result)
}

/// Read a path at a revision, following a symlink one level.
fn read_path(runner: &dyn CommandRunner, rev: &str, path: &str) -> Result<(PathInfo, Vec<u8>)> {
    let listing = runner.run(&["ls-tree", rev, "--", path])?;
    let blob = runner.run(&["cat-file", "blob", &format!("{}:{}", rev, path)])?;

    if !listing.stdout.starts_with(SYMLINK_MODE) {
        return Ok((PathInfo::new(path), blob.raw));
    }

    let Some(target) = resolve_link_target(path, &blob.stdout) else {
        tracing::warn!(%path, link = %blob.stdout, "symlink points outside of the repository");
        return Ok((PathInfo::new(path), Vec::new()));
    };

    let info = PathInfo {
        name: path.to_string(),
        symlink_target: Some(target.clone()),
    };
    match runner.run(&["cat-file", "blob", &format!("{}:{}", rev, target)]) {
        Ok(content) => Ok((info, content.raw)),
        Err(e) => {
            tracing::warn!(%path, %target, error = %e, "symlink target cannot be read");
            Ok((info, Vec::new()))
        }
    }
}

/// Commits in `base..to` touching either side of the change.
fn touching_commits(
    runner: &dyn CommandRunner,
    base: &str,
    to: &str,
    file: &ChangedFile,
) -> Result<Vec<String>> {
    let range = format!("{}..{}", base, to);
    let mut args: Vec<&str> = vec!["log", "--format=%H", range.as_str(), "--"];
    for path in [&file.before, &file.after].into_iter().flatten() {
        if !args.contains(&path.as_str()) {
            args.push(path);
        }
    }

    let output = runner.run(&args)?;
    Ok(output.lines().into_iter().map(str::to_string).collect())
}

/// Resolve a relative symlink target against the link's directory.
///
/// Returns `None` for absolute targets and targets escaping the repository.
///
/// ```
/// use rulediff::git::resolve_link_target;
///
/// assert_eq!(
///     resolve_link_target("rules/link.yml", "../shared/real.yml"),
///     Some("shared/real.yml".to_string())
/// );
/// assert_eq!(resolve_link_target("link.yml", "../outside.yml"), None);
/// ```
pub fn resolve_link_target(link_path: &str, target: &str) -> Option<String> {
    if target.starts_with('/') {
        return None;
    }

    let mut parts: Vec<&str> = link_path.split('/').collect();
    parts.pop();

    for component in target.trim().split('/') {
        match component {
            "" | "." => {}
            ".." => {
                parts.pop()?;
            }
            name => parts.push(name),
        }
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}
