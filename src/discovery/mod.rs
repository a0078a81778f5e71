//! Rule change discovery between a base branch and HEAD.
//!
//! This module turns file-level git changes into per-rule change records:
//! - Entry matching: pairs "before" and "after" rules of one file change
//! - Classification: assigns added/modified/removed/moved/excluded states
//!   and the exact lines to report
//! - Path filtering: include/exclude regexes, exclude wins
//! - Symlink aliasing: rules reachable through symlinks are reported there too
//!
//! [`GitBranchFinder`] drives the whole pipeline.

mod classify;
mod entry;
mod filter;
mod finder;
pub mod lines;
mod matcher;
mod symlinks;

#[cfg(test)]
mod tests;

// Re-export public API
pub use classify::classify;
pub use entry::{ChangeState, Entry};
pub use filter::{PathFilter, PatternList};
pub use finder::{GitBranchFinder, SKIP_MARKERS};
pub use matcher::{PairResult, pair_entries, partition_by_name_kind};
pub use symlinks::{FsSymlinkResolver, NoSymlinks, Symlink, SymlinkResolver};
