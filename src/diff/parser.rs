//! Added line extraction from unified diffs.

use std::collections::BTreeMap;

use super::helpers::{parse_diff_git_line, parse_hunk_header, unquote_path};

/// A `+` line of a hunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddedLine {
    /// Repository-relative file path (forward slashes).
    pub file_path: String,
    /// Line number in the new file (1-based).
    pub line_number: usize,
    /// The content of the added line (without leading '+').
    pub content: String,
}

/// Every added line in `diff_output`, in diff order.
///
/// Works on unified diffs with or without context lines; `-U0` output is
/// what discovery feeds it. Lines of deleted files are never reported.
pub fn parse_added_lines_from_diff(diff_output: &str) -> Vec<AddedLine> {
    let mut result = Vec::new();
    let mut current_file: Option<String> = None;
    let mut new_line: usize = 0;
    let mut old_remaining: usize = 0;
    let mut new_remaining: usize = 0;

    for line in diff_output.lines() {
        if old_remaining > 0 || new_remaining > 0 {
            match line.as_bytes().first() {
                Some(b'+') => {
                    if let Some(file) = &current_file {
                        result.push(AddedLine {
                            file_path: file.clone(),
                            line_number: new_line,
                            content: line[1..].to_string(),
                        });
                    }
                    new_line += 1;
                    new_remaining = new_remaining.saturating_sub(1);
                    continue;
                }
                Some(b'-') => {
                    old_remaining = old_remaining.saturating_sub(1);
                    continue;
                }
                Some(b' ') => {
                    new_line += 1;
                    new_remaining = new_remaining.saturating_sub(1);
                    old_remaining = old_remaining.saturating_sub(1);
                    continue;
                }
                // "\ No newline at end of file"
                Some(b'\\') => continue,
                // Hunk shorter than announced, treat the line as a header.
                _ => {
                    old_remaining = 0;
                    new_remaining = 0;
                }
            }
        }

        if let Some(rest) = line.strip_prefix("diff --git ") {
            current_file = parse_diff_git_line(rest);
            new_line = 0;
            continue;
        }

        // Deleted files have no new side.
        if let Some(rest) = line.strip_prefix("+++ ") {
            if rest == "/dev/null" {
                current_file = None;
            } else if let Some(path) = unquote_path(rest).strip_prefix("b/") {
                current_file = Some(path.to_string());
            }
            continue;
        }

        if line.starts_with("@@ ")
            && let Some(header) = parse_hunk_header(line)
        {
            new_line = header.new_start;
            old_remaining = header.old_len;
            new_remaining = header.new_len;
        }
    }

    result
}

/// Added line numbers grouped by file path, ascending within each file.
pub fn added_lines_by_file(diff_output: &str) -> BTreeMap<String, Vec<usize>> {
    let mut by_file: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for added in parse_added_lines_from_diff(diff_output) {
        by_file
            .entry(added.file_path)
            .or_default()
            .push(added.line_number);
    }
    for lines in by_file.values_mut() {
        lines.sort_unstable();
        lines.dedup();
    }
    by_file
}
