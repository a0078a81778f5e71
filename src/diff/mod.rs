//! Diff parsing primitives for rulediff.
//!
//! This module parses git output needed to describe a commit range:
//! - Changed files with their status from `git diff --name-status -M`
//! - Added lines with line numbers from `git diff -U0 -M`
//!
//! The parsing is deterministic and supports:
//! - New files (from /dev/null) and deleted files (to /dev/null)
//! - File renames and copies (added lines belong to the new path)
//! - Hunk line counts, so removed lines that look like headers are not misread

mod helpers;
mod parser;
mod status;


// Re-export public API
pub use helpers::{normalize_path, unquote_path};
pub use parser::{AddedLine, added_lines_by_file, parse_added_lines_from_diff};
pub use status::{ChangedFile, FileStatus, parse_name_status};
