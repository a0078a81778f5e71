//! Rule entries and their change states.

use crate::rules::Rule;
use serde::{Deserialize, Serialize};

/// How a rule changed between the base branch and HEAD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ChangeState {
    /// Not classified yet.
    #[default]
    Unknown,
    /// Rule only exists on HEAD.
    Added,
    /// Rule exists on both sides with different content.
    Modified,
    /// Rule only exists on the base branch.
    Removed,
    /// Rule content is unchanged but it now lives in a different file.
    Moved,
    /// Rule content and location are unchanged, nothing to check.
    Excluded,
}

impl std::fmt::Display for ChangeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChangeState::Unknown => write!(f, "unknown"),
            ChangeState::Added => write!(f, "added"),
            ChangeState::Modified => write!(f, "modified"),
            ChangeState::Removed => write!(f, "removed"),
            ChangeState::Moved => write!(f, "moved"),
            ChangeState::Excluded => write!(f, "excluded"),
        }
    }
}

/// One rule observed at one path at one point in history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entry {
    /// Path the rule was read from (symlink target for symlinked files).
    pub source_path: String,
    /// Path shown to the user.
    pub reported_path: String,
    pub rule: Rule,
    pub state: ChangeState,
    /// Lines to report for this rule.
    ///
    /// Starts as the rule's own line range and is narrowed by classification.
    pub modified_lines: Vec<usize>,
    /// Set when the path could not be resolved. Such entries are never paired
    /// by name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_error: Option<String>,
}

impl Entry {
    pub fn new(
        source_path: impl Into<String>,
        reported_path: impl Into<String>,
        rule: Rule,
    ) -> Self {
        let modified_lines = rule.lines().expand();
        Self {
            source_path: source_path.into(),
            reported_path: reported_path.into(),
            rule,
            state: ChangeState::Unknown,
            modified_lines,
            path_error: None,
        }
    }

    pub fn with_path_error(mut self, error: impl Into<String>) -> Self {
        self.path_error = Some(error.into());
        self
    }
}
