//! Changed file listing from `git diff --name-status`.

use super::helpers::unquote_path;
use crate::error::{DiscoveryError, Result};

/// Kind of change git reports for a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Added,
    Modified,
    Deleted,
    Renamed,
    Copied,
    /// File type changed, e.g. regular file to symlink.
    TypeChanged,
}

/// One file from a name-status listing.
///
/// `before` is unset for added files and `after` is unset for deleted files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangedFile {
    pub status: FileStatus,
    pub before: Option<String>,
    pub after: Option<String>,
}

/// Parse `git diff --name-status` output.
///
/// Format: one file per line, tab separated:
/// - "M\tpath", "A\tpath", "D\tpath", "T\tpath"
/// - "R087\told\tnew", "C100\tsource\tcopy"
///
/// Paths may be C-quoted; tabs inside names are escaped, so splitting on
/// tabs is safe.
pub fn parse_name_status(output: &str) -> Result<Vec<ChangedFile>> {
    let mut files = Vec::new();

    for line in output.lines() {
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split('\t').collect();
        let status = fields[0];
        let first = fields.get(1).map(|p| unquote_path(p));
        let second = fields.get(2).map(|p| unquote_path(p));

        let changed = match (status.chars().next(), first, second) {
            (Some('A'), Some(path), None) => ChangedFile {
                status: FileStatus::Added,
                before: None,
                after: Some(path),
            },
            (Some('M'), Some(path), None) => ChangedFile {
                status: FileStatus::Modified,
                before: Some(path.clone()),
                after: Some(path),
            },
            (Some('T'), Some(path), None) => ChangedFile {
                status: FileStatus::TypeChanged,
                before: Some(path.clone()),
                after: Some(path),
            },
            (Some('D'), Some(path), None) => ChangedFile {
                status: FileStatus::Deleted,
                before: Some(path),
                after: None,
            },
            (Some('R'), Some(old), Some(new)) => ChangedFile {
                status: FileStatus::Renamed,
                before: Some(old),
                after: Some(new),
            },
            (Some('C'), Some(source), Some(copy)) => ChangedFile {
                status: FileStatus::Copied,
                before: Some(source),
                after: Some(copy),
            },
            _ => {
                return Err(DiscoveryError::ChangeList(format!(
                    "unexpected name-status line: '{}'",
                    line
                )));
            }
        };

        files.push(changed);
    }

    Ok(files)
}
