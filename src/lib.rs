//! Rulediff: rule-level change discovery between git branches.
//!
//! Given a base branch and the current branch of a repository holding
//! Prometheus-style YAML rule files, rulediff works out which rules were
//! added, modified, removed or moved, and which lines of each a linter
//! needs to look at.
//!
//! The library entry point is [`discovery::GitBranchFinder`]; the `rulediff`
//! binary wraps it in a CLI.

pub mod cli;
pub mod commands;
pub mod config;
pub mod diff;
pub mod discovery;
pub mod error;
pub mod events;
pub mod exit_codes;
pub mod git;
pub mod logging;
pub mod rules;

#[cfg(test)]
mod test_support;
