//! Include/exclude path filtering.
//!
//! Rules:
//! - No patterns at all: every path is allowed
//! - A path matching any exclude pattern is rejected (exclude wins)
//! - Otherwise a path must match at least one include pattern

use crate::error::{DiscoveryError, Result};
use regex::Regex;

/// Compiled list of regex patterns.
///
/// Patterns are unanchored, as with [`Regex::is_match`].
#[derive(Clone, Default)]
pub struct PatternList {
    /// The compiled regex patterns paired with their original string representations.
    patterns: Vec<(Regex, String)>,
}

impl std::fmt::Debug for PatternList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.patterns.iter().map(|(_, s)| s))
            .finish()
    }
}

impl PatternList {
    /// Compile patterns; `field_name` names the setting in error messages.
    pub fn compile(patterns: &[String], field_name: &str) -> Result<Self> {
        let mut compiled = Vec::with_capacity(patterns.len());

        for pattern in patterns {
            let regex = Regex::new(pattern).map_err(|e| {
                DiscoveryError::Config(format!(
                    "invalid regex pattern in {}: '{}' - {}",
                    field_name, pattern, e
                ))
            })?;
            compiled.push((regex, pattern.clone()));
        }

        Ok(Self { patterns: compiled })
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Returns the first pattern matching `path`.
    pub fn first_match(&self, path: &str) -> Option<&str> {
        self.patterns
            .iter()
            .find(|(regex, _)| regex.is_match(path))
            .map(|(_, pattern)| pattern.as_str())
    }

    pub fn matches_any(&self, path: &str) -> bool {
        self.first_match(path).is_some()
    }
}

/// Decides which changed files take part in discovery.
///
/// ```
/// use rulediff::discovery::PathFilter;
///
/// let filter = PathFilter::new(
///     &["rules/.*".to_string()],
///     &[r".*\.bak$".to_string()],
/// )
/// .unwrap();
///
/// assert!(filter.is_allowed("rules/a.yml"));
/// assert!(!filter.is_allowed("rules/a.bak"));
/// assert!(!filter.is_allowed("other/a.yml"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct PathFilter {
    include: PatternList,
    exclude: PatternList,
}

impl PathFilter {
    pub fn new(include: &[String], exclude: &[String]) -> Result<Self> {
        Ok(Self {
            include: PatternList::compile(include, "include")?,
            exclude: PatternList::compile(exclude, "exclude")?,
        })
    }

    /// Returns true if `path` should be checked.
    pub fn is_allowed(&self, path: &str) -> bool {
        if self.include.is_empty() && self.exclude.is_empty() {
            return true;
        }

        if self.exclude.matches_any(path) {
            return false;
        }

        self.include.matches_any(path)
    }
}
