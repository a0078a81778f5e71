//! The `Config` type and its defaults.

use serde::{Deserialize, Serialize};

/// Default config file name, looked up in the repository root.
pub const DEFAULT_CONFIG_FILE: &str = ".rulediff.yaml";

/// Configuration for rule change discovery.
///
/// Mirrors `.rulediff.yaml`; every key is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // git
    /// Branch HEAD is compared against (default: "main").
    #[serde(default = "default_base_branch")]
    pub base_branch: String,

    /// Maximum number of commits between the base branch and HEAD.
    #[serde(default = "default_max_commits")]
    pub max_commits: usize,

    // paths
    /// Regexes a changed file path must match to be checked.
    #[serde(default)]
    pub include: Vec<String>,

    /// Regexes excluding changed file paths. Exclusion wins over inclusion.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Regexes of paths whose base branch version is parsed leniently.
    #[serde(default)]
    pub relaxed: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_branch: default_base_branch(),
            max_commits: default_max_commits(),
            include: Vec::new(),
            exclude: Vec::new(),
            relaxed: Vec::new(),
        }
    }
}

pub(crate) fn default_base_branch() -> String {
    "main".to_string()
}

pub(crate) fn default_max_commits() -> usize {
    20
}
