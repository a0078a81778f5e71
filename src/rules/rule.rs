//! Rule, rule kind and line range types.

use serde::{Deserialize, Serialize};

/// Kind of a parsed rule.
///
/// Two rules with the same name but different kinds are never considered
/// the same rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    /// Rule with an `alert:` key.
    Alerting,
    /// Rule with a `record:` key.
    Recording,
    /// Rule item with neither key.
    Invalid,
}

impl std::fmt::Display for RuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuleKind::Alerting => write!(f, "alerting"),
            RuleKind::Recording => write!(f, "recording"),
            RuleKind::Invalid => write!(f, "invalid"),
        }
    }
}

/// Inclusive, 1-based range of source lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRange {
    pub first: usize,
    pub last: usize,
}

impl LineRange {
    /// Create a range covering `first..=last`.
    ///
    /// Arguments given in the wrong order are swapped.
    pub fn new(first: usize, last: usize) -> Self {
        if first <= last {
            Self { first, last }
        } else {
            Self {
                first: last,
                last: first,
            }
        }
    }

    /// Every line number in the range, ascending.
    pub fn expand(&self) -> Vec<usize> {
        (self.first..=self.last).collect()
    }

    pub fn contains(&self, line: usize) -> bool {
        line >= self.first && line <= self.last
    }
}

impl std::fmt::Display for LineRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.first == self.last {
            write!(f, "{}", self.first)
        } else {
            write!(f, "{}-{}", self.first, self.last)
        }
    }
}

/// A single rule read from a rule file.
///
/// The parsed body is kept for content comparison only and is not part of
/// the serialized form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rule {
    name: String,
    kind: RuleKind,
    lines: LineRange,
    #[serde(skip)]
    body: serde_yaml::Value,
}

impl Rule {
    pub fn new(
        name: impl Into<String>,
        kind: RuleKind,
        lines: LineRange,
        body: serde_yaml::Value,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            lines,
            body,
        }
    }

    /// Rule name (`alert` or `record` value). Empty for anonymous rules.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> RuleKind {
        self.kind
    }

    /// Lines this rule occupies in its file.
    pub fn lines(&self) -> LineRange {
        self.lines
    }

    pub fn body(&self) -> &serde_yaml::Value {
        &self.body
    }

    /// Returns true if both rules have the same kind, name and content.
    ///
    /// Source position is ignored, so a rule moved to another line or
    /// another file is still identical to its old self.
    pub fn is_identical(&self, other: &Rule) -> bool {
        self.kind == other.kind && self.name == other.name && self.body == other.body
    }
}
