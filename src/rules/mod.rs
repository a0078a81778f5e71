//! Rule model and rule file parsing.
//!
//! Discovery treats rules as opaque values with a small set of capabilities:
//! a name, a kind, a source line range and a content equality check. This
//! module provides that model plus a parser for Prometheus-style YAML rule
//! files (`groups[].rules[]` items keyed by `alert:` or `record:`).

mod parser;
mod rule;


// Re-export public API
pub use parser::{ParseError, RuleParser, YamlRuleParser};
pub use rule::{LineRange, Rule, RuleKind};
